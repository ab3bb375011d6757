use hangman_types::{Role, User, Word};
use uuid::Uuid;

/// Creates a test word owned by the given course and teacher.
pub fn create_word_for(text: &str, course_id: Uuid, teacher_id: Uuid) -> Word {
    Word {
        id: Uuid::new_v4(),
        text: text.to_string(),
        category: "animals".to_string(),
        difficulty: 1,
        course_id,
        teacher_id,
    }
}

/// Creates a test word with fresh course/teacher ids.
pub fn create_word(text: &str) -> Word {
    create_word_for(text, Uuid::new_v4(), Uuid::new_v4())
}

/// Creates a student enrolled with the given course and teacher.
pub fn create_student(course_id: Uuid, teacher_id: Uuid) -> User {
    User {
        id: Uuid::new_v4(),
        username: "student".to_string(),
        role: Role::Student,
        course_id: Some(course_id),
        teacher_id: Some(teacher_id),
        created_at: String::new(),
    }
}
