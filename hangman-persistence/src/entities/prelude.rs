pub use super::courses::Entity as Courses;
pub use super::game_histories::Entity as GameHistories;
pub use super::teacher_course_assignments::Entity as TeacherCourseAssignments;
pub use super::users::Entity as Users;
pub use super::words::Entity as Words;
