use thiserror::Error;

use crate::model::{ParseIdError, QuestionError, QuestionSetError};

/// Validation failures raised while building question content.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuestionSet(#[from] QuestionSetError),
}
