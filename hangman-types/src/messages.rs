use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStartRequest {
    /// Teachers may name a course to draw words from.
    pub course_id: Option<Uuid>,
    /// Admins may name a teacher whose words to draw from.
    pub teacher_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameGuessRequest {
    pub letter: char,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStartResponse {
    pub session_id: Uuid,
    pub word_length: u32,
    pub masked_word: String,
    pub max_attempts: u32,
    pub remaining_attempts: u32,
}

/// State of a session after a guess, a forfeit, or a status query.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStateResponse {
    pub masked_word: String,
    pub remaining_attempts: u32,
    pub guessed_letters: Vec<char>,
    pub wrong_letters: Vec<char>,
    pub complete: bool,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameHistoryEntry {
    pub id: Uuid,
    pub word: String,
    pub success: bool,
    pub attempts: u32,
    /// Comma-joined, in guess order, e.g. "X,Y,Z".
    pub wrong_letters: String,
    pub played_at: String, // ISO 8601 string
}
