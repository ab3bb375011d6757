use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::info;
use uuid::Uuid;

use hangman_core::{
    HistoryRecord, HistoryScope, SessionSnapshot, SessionStore, WordScope,
    authorize_session_access, authorize_student_history_access, pick_random_word,
};
use hangman_persistence::repositories::{HistoryRepository, UserRepository, WordRepository};
use hangman_types::{
    GameError, GameHistoryEntry, GameStartRequest, GameStartResponse, GameStateResponse, User,
};

/// Orchestrates the session lifecycle: word selection, guarded mutation, and
/// the terminal hand-off to the history store.
pub struct GameService {
    sessions: Arc<SessionStore>,
    words: Arc<WordRepository>,
    users: Arc<UserRepository>,
    history: Arc<HistoryRepository>,
}

impl GameService {
    pub fn new(
        sessions: Arc<SessionStore>,
        words: Arc<WordRepository>,
        users: Arc<UserRepository>,
        history: Arc<HistoryRepository>,
    ) -> Self {
        Self {
            sessions,
            words,
            users,
            history,
        }
    }

    pub async fn start_game(
        &self,
        user: &User,
        request: &GameStartRequest,
    ) -> Result<GameStartResponse, GameError> {
        let scope = WordScope::resolve(user, request.course_id, request.teacher_id)?;
        let candidates = self.words.find_in_scope(scope).await?;
        let word = pick_random_word(candidates)?;

        let word_length = word.text.chars().count() as u32;
        let session_id = self.sessions.create(word);
        let snapshot = self.sessions.snapshot(session_id)?;

        info!(
            "Started game session {} for user {}",
            session_id, user.username
        );

        Ok(GameStartResponse {
            session_id,
            word_length,
            masked_word: snapshot.masked_word,
            max_attempts: snapshot.max_attempts as u32,
            remaining_attempts: snapshot.remaining_attempts as u32,
        })
    }

    pub async fn guess_letter(
        &self,
        user: &User,
        session_id: Uuid,
        letter: char,
    ) -> Result<GameStateResponse, GameError> {
        if !letter.is_ascii_alphabetic() {
            return Err(GameError::invalid_request("Guess must be a letter A-Z"));
        }

        let snapshot = self.sessions.snapshot(session_id)?;
        authorize_session_access(user, &snapshot.word)?;

        let (_, snapshot) = self.sessions.guess(session_id, letter)?;
        if snapshot.complete {
            self.record_terminal_session(user, session_id, &snapshot)
                .await?;
        }

        Ok(state_response(&snapshot))
    }

    pub async fn forfeit_game(
        &self,
        user: &User,
        session_id: Uuid,
    ) -> Result<GameStateResponse, GameError> {
        let snapshot = self.sessions.snapshot(session_id)?;
        authorize_session_access(user, &snapshot.word)?;

        // A terminal session already has its history record; report it as-is.
        if snapshot.complete {
            return Ok(state_response(&snapshot));
        }

        let snapshot = self.sessions.forfeit(session_id)?;
        self.record_terminal_session(user, session_id, &snapshot)
            .await?;

        Ok(state_response(&snapshot))
    }

    pub async fn current_status(
        &self,
        user: &User,
        session_id: Uuid,
    ) -> Result<GameStateResponse, GameError> {
        let snapshot = self.sessions.snapshot(session_id)?;
        authorize_session_access(user, &snapshot.word)?;
        Ok(state_response(&snapshot))
    }

    /// The caller's own slice of the play history, scoped by role.
    pub async fn history(&self, user: &User) -> Result<Vec<GameHistoryEntry>, GameError> {
        let records = records_for_scope(&self.history, HistoryScope::for_user(user)).await?;
        Ok(records.iter().map(history_entry).collect())
    }

    pub async fn student_history(
        &self,
        user: &User,
        student_id: Uuid,
    ) -> Result<Vec<GameHistoryEntry>, GameError> {
        let student = self.load_student(student_id).await?;
        authorize_student_history_access(user, &student)?;

        let records = self.history.find_by_student(student_id).await?;
        Ok(records.iter().map(history_entry).collect())
    }

    pub async fn student_history_between(
        &self,
        user: &User,
        student_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<GameHistoryEntry>, GameError> {
        let student = self.load_student(student_id).await?;
        authorize_student_history_access(user, &student)?;

        let end_date = end_date
            .succ_opt()
            .ok_or_else(|| GameError::invalid_request("End date out of range"))?;
        let start = start_date.and_time(NaiveTime::MIN).and_utc();
        let end = end_date.and_time(NaiveTime::MIN).and_utc();

        let records = self
            .history
            .find_by_student_between(student_id, start, end)
            .await?;
        Ok(records.iter().map(history_entry).collect())
    }

    async fn load_student(&self, student_id: Uuid) -> Result<User, GameError> {
        self.users
            .find_by_id(student_id)
            .await?
            .ok_or(GameError::StudentNotFound)
    }

    /// Appends the terminal record, then evicts the session. The response is
    /// built from the snapshot, so eviction is invisible to this request.
    async fn record_terminal_session(
        &self,
        user: &User,
        session_id: Uuid,
        snapshot: &SessionSnapshot,
    ) -> Result<(), GameError> {
        let record = HistoryRecord::from_terminal_session(user.id, snapshot);
        self.history.append(&record).await?;
        self.sessions.remove(session_id);

        info!(
            "Recorded {} game session {} for user {}",
            if snapshot.success { "won" } else { "lost" },
            session_id,
            user.username
        );
        Ok(())
    }
}

/// Role-scoped history fetch shared by the game and statistics services.
pub(crate) async fn records_for_scope(
    history: &HistoryRepository,
    scope: HistoryScope,
) -> Result<Vec<HistoryRecord>, GameError> {
    let records = match scope {
        HistoryScope::All => history.find_all().await?,
        HistoryScope::TeacherStudents(teacher_id) => {
            history.find_by_teacher_students(teacher_id).await?
        }
        HistoryScope::Student(student_id) => history.find_by_student(student_id).await?,
    };
    Ok(records)
}

fn state_response(snapshot: &SessionSnapshot) -> GameStateResponse {
    GameStateResponse {
        masked_word: snapshot.masked_word.clone(),
        remaining_attempts: snapshot.remaining_attempts as u32,
        guessed_letters: snapshot.guessed_letters.clone(),
        wrong_letters: snapshot.wrong_letters.clone(),
        complete: snapshot.complete,
        success: snapshot.success,
    }
}

fn history_entry(record: &HistoryRecord) -> GameHistoryEntry {
    GameHistoryEntry {
        id: record.id,
        word: record.word.clone(),
        success: record.success,
        attempts: record.wrong_attempts as u32,
        wrong_letters: record.wrong_letters.clone(),
        played_at: record.played_at.to_rfc3339(),
    }
}
