use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A catalog word as supplied by a teacher for their course.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Word {
    pub id: Uuid,
    pub text: String,
    pub category: String,
    /// 1 (easiest) through 5 (hardest).
    pub difficulty: i32,
    pub course_id: Uuid,
    pub teacher_id: Uuid,
}
