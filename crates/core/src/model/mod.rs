mod answers;
mod ids;
mod question;
mod question_set;
mod result;
mod session;

pub use ids::{AttemptId, ParseIdError, QuestionId, QuestionSetId};

pub use answers::AnswerRecord;
pub use question::{AnswerOption, OptionLabel, ParseOptionLabelError, Question, QuestionError};
pub use question_set::{QuestionSet, QuestionSetError};
pub use result::{AnsweredQuestion, DetailKind, SessionResult, percentage};
pub use session::{Direction, ExamError, ExamSession, SessionProgress, SessionStatus};
