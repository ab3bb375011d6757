use hangman_types::{GameError, Role, User, Word};
use uuid::Uuid;

/// Which slice of the word catalog a game start may draw from. Resolved once
/// from the caller's role so adding a role touches only this match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordScope {
    /// All words owned by one teacher (admin starting on a teacher's behalf).
    Teacher(Uuid),
    /// All words of one course (teacher starting within their course).
    Course(Uuid),
    /// Words of the student's own course and teacher.
    CourseAndTeacher { course_id: Uuid, teacher_id: Uuid },
}

impl WordScope {
    pub fn resolve(
        user: &User,
        course_id: Option<Uuid>,
        teacher_id: Option<Uuid>,
    ) -> Result<WordScope, GameError> {
        match user.role {
            Role::Admin => teacher_id.map(WordScope::Teacher).ok_or_else(|| {
                GameError::invalid_request("An admin must name a teacher to start a game")
            }),
            Role::Teacher => course_id.map(WordScope::Course).ok_or_else(|| {
                GameError::invalid_request("A teacher must name a course to start a game")
            }),
            Role::Student => match (user.course_id, user.teacher_id) {
                (Some(course_id), Some(teacher_id)) => Ok(WordScope::CourseAndTeacher {
                    course_id,
                    teacher_id,
                }),
                _ => Err(GameError::invalid_request(
                    "Student has no course or teacher assigned",
                )),
            },
        }
    }
}

/// Which slice of the play history a caller may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryScope {
    /// Every record (admin).
    All,
    /// Records of the students assigned to this teacher.
    TeacherStudents(Uuid),
    /// The caller's own records.
    Student(Uuid),
}

impl HistoryScope {
    pub fn for_user(user: &User) -> HistoryScope {
        match user.role {
            Role::Admin => HistoryScope::All,
            Role::Teacher => HistoryScope::TeacherStudents(user.id),
            Role::Student => HistoryScope::Student(user.id),
        }
    }
}

/// A student may only act on a session whose word belongs to their own
/// course. Teachers and admins are unrestricted at the session level; their
/// course scoping is enforced at the history/statistics layer instead.
pub fn authorize_session_access(user: &User, word: &Word) -> Result<(), GameError> {
    if user.role == Role::Student && user.course_id != Some(word.course_id) {
        return Err(GameError::access_denied(
            "Not authorized to access this game",
        ));
    }
    Ok(())
}

/// Only teachers and admins may view another identity's history, and a
/// teacher only for students recorded as theirs.
pub fn authorize_student_history_access(requester: &User, student: &User) -> Result<(), GameError> {
    match requester.role {
        Role::Admin => Ok(()),
        Role::Teacher => {
            if student.teacher_id == Some(requester.id) {
                Ok(())
            } else {
                Err(GameError::access_denied(
                    "Not authorized to access this student's data",
                ))
            }
        }
        Role::Student => Err(GameError::access_denied(
            "Only teachers can access student histories",
        )),
    }
}

/// Course statistics are for teachers of record and admins. `is_assigned`
/// is the result of the course-assignment existence query, which the caller
/// performs; the guard itself stays pure.
pub fn authorize_course_statistics_access(
    requester: &User,
    is_assigned: bool,
) -> Result<(), GameError> {
    match requester.role {
        Role::Admin => Ok(()),
        Role::Teacher => {
            if is_assigned {
                Ok(())
            } else {
                Err(GameError::access_denied(
                    "Not authorized to access this class's statistics",
                ))
            }
        }
        Role::Student => Err(GameError::access_denied(
            "Only teachers can access class statistics",
        )),
    }
}
