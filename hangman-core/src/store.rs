use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use hangman_types::{GameError, Word};
use tracing::info;
use uuid::Uuid;

use crate::session::{GameSession, GuessOutcome};

pub type SessionId = Uuid;

/// Defensive copy of a session's state; handed to the access guard and the
/// response builders so callers never touch the live session.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub word: Word,
    pub masked_word: String,
    pub guessed_letters: Vec<char>,
    pub wrong_letters: Vec<char>,
    pub max_attempts: usize,
    pub remaining_attempts: usize,
    pub complete: bool,
    pub success: bool,
}

impl SessionSnapshot {
    fn of(session: &GameSession) -> Self {
        Self {
            word: session.word().clone(),
            masked_word: session.masked_word(),
            guessed_letters: session.guessed_letters(),
            wrong_letters: session.wrong_letters(),
            max_attempts: GameSession::MAX_ATTEMPTS,
            remaining_attempts: session.remaining_attempts(),
            complete: session.is_complete(),
            success: session.is_success(),
        }
    }
}

#[derive(Debug)]
struct StoredSession {
    session: GameSession,
    last_activity: Instant,
}

impl StoredSession {
    fn new(word: Word) -> Self {
        Self {
            session: GameSession::new(word),
            last_activity: Instant::now(),
        }
    }

    fn update_activity(&mut self) {
        self.last_activity = Instant::now();
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Holds every live game session, keyed by session id. The only shared
/// mutable state in the core: each session mutates under its own map entry
/// guard, so concurrent guesses against one session serialize while
/// different sessions proceed independently.
pub struct SessionStore {
    sessions: DashMap<SessionId, StoredSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Allocates an identifier unique among live sessions and stores a fresh
    /// session for `word`. Insertion goes through the vacant-entry API, so a
    /// collision regenerates instead of overwriting a live session.
    pub fn create(&self, word: Word) -> SessionId {
        loop {
            let id = Uuid::new_v4();
            match self.sessions.entry(id) {
                Entry::Vacant(entry) => {
                    entry.insert(StoredSession::new(word));
                    return id;
                }
                Entry::Occupied(_) => continue,
            }
        }
    }

    pub fn snapshot(&self, id: SessionId) -> Result<SessionSnapshot, GameError> {
        let stored = self.sessions.get(&id).ok_or(GameError::SessionNotFound)?;
        Ok(SessionSnapshot::of(&stored.session))
    }

    /// Applies a guess atomically with respect to the session's letter sets
    /// and terminal-status recomputation.
    pub fn guess(
        &self,
        id: SessionId,
        letter: char,
    ) -> Result<(GuessOutcome, SessionSnapshot), GameError> {
        let mut stored = self
            .sessions
            .get_mut(&id)
            .ok_or(GameError::SessionNotFound)?;

        let outcome = stored.session.guess(letter)?;
        stored.update_activity();
        Ok((outcome, SessionSnapshot::of(&stored.session)))
    }

    pub fn forfeit(&self, id: SessionId) -> Result<SessionSnapshot, GameError> {
        let mut stored = self
            .sessions
            .get_mut(&id)
            .ok_or(GameError::SessionNotFound)?;

        stored.session.forfeit();
        stored.update_activity();
        Ok(SessionSnapshot::of(&stored.session))
    }

    /// Evicts a session; called once its terminal history record has been
    /// recorded, or by the idle reaper.
    pub fn remove(&self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Sweeps sessions idle beyond `timeout`. Abandoned in-progress games
    /// would otherwise accumulate without bound.
    pub fn remove_idle(&self, timeout: Duration) -> Vec<SessionId> {
        let expired: Vec<SessionId> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().is_expired(timeout))
            .map(|entry| *entry.key())
            .collect();

        for id in &expired {
            if self.sessions.remove(id).is_some() {
                info!("Removed idle game session {}", id);
            }
        }

        expired
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
