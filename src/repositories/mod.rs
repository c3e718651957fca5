pub mod project_repository;
pub mod question_repository;
pub mod session_repository;

pub use project_repository::{MongoProjectRepository, ProjectRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use session_repository::{MongoSessionRepository, SessionRepository};
