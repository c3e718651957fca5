pub mod answer_grader;
pub mod model_service;
pub mod project_service;
pub mod prompt_builder;
pub mod question_parser;
pub mod question_service;
pub mod review_scheduler;
pub mod session_service;

pub use project_service::ProjectService;
pub use question_service::QuestionService;
pub use session_service::SessionService;
