#![forbid(unsafe_code)]

pub mod file;
pub mod repository;

pub use file::{FileRepository, parse_question_set};
pub use repository::{InMemoryRepository, QuestionSetRepository, QuestionSetSummary, StorageError};
