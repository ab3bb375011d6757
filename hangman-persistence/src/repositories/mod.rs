pub mod course_repository;
pub mod history_repository;
pub mod user_repository;
pub mod word_repository;

pub use course_repository::CourseRepository;
pub use history_repository::HistoryRepository;
pub use user_repository::UserRepository;
pub use word_repository::WordRepository;
