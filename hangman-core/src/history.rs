use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::store::SessionSnapshot;

/// Durable log entry for one terminal session. Written exactly once, never
/// for an in-progress game. Word text and category are denormalized onto the
/// record at append time.
#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub word_id: Uuid,
    pub word: String,
    pub category: String,
    pub success: bool,
    pub wrong_attempts: i32,
    /// Comma-joined, in guess order, e.g. "X,Y,Z".
    pub wrong_letters: String,
    pub played_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Builds the record for a session that just reached a terminal state.
    pub fn from_terminal_session(student_id: Uuid, snapshot: &SessionSnapshot) -> Self {
        let wrong_letters = snapshot
            .wrong_letters
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            id: Uuid::new_v4(),
            student_id,
            word_id: snapshot.word.id,
            word: snapshot.word.text.clone(),
            category: snapshot.word.category.clone(),
            success: snapshot.success,
            wrong_attempts: snapshot.wrong_letters.len() as i32,
            wrong_letters,
            played_at: Utc::now(),
        }
    }
}
