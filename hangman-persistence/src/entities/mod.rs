pub mod courses;
pub mod game_histories;
pub mod prelude;
pub mod teacher_course_assignments;
pub mod users;
pub mod words;
