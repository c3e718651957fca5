pub mod project;
pub mod question;
pub mod review_state;
pub mod scheduled_question;
pub mod session;
pub use project::{Project, ProjectProfile};
pub use question::{GeneratedQuestion, GenerationMode, Question, QuestionSource, QuestionType};
pub use review_state::ReviewState;
pub use scheduled_question::ScheduledQuestion;
pub use session::Session;
