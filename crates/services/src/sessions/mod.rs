mod runner;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use exam_core::model::{Direction, SessionProgress};
pub use runner::ExamRunner;
pub use view::{ExamView, OptionView, QuestionView};
pub use workflow::ExamLoopService;
