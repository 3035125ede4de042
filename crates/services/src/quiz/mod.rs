mod view;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizServiceError;
pub use view::{QuestionView, ResultView};
pub use workflow::{AnswerResult, QuizLoopService};
