use async_trait::async_trait;
use exam_core::model::{QuestionSet, QuestionSetId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by question-set sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid question content: {0}")]
    Invalid(#[from] exam_core::Error),
}

/// Lightweight listing entry for a question set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSetSummary {
    pub id: QuestionSetId,
    pub title: String,
    pub question_count: usize,
}

impl QuestionSetSummary {
    #[must_use]
    pub fn from_set(set: &QuestionSet) -> Self {
        Self {
            id: set.id().clone(),
            title: set.title().to_owned(),
            question_count: set.len(),
        }
    }
}

/// Repository contract for loading question sets.
///
/// Sets come back shared: sessions hold the same `Arc` for their whole life.
#[async_trait]
pub trait QuestionSetRepository: Send + Sync {
    /// Fetch a question set by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_question_set(&self, id: &QuestionSetId)
    -> Result<Arc<QuestionSet>, StorageError>;

    /// List available question sets ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source cannot be read.
    async fn list_question_sets(&self) -> Result<Vec<QuestionSetSummary>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sets: Arc<Mutex<BTreeMap<QuestionSetId, Arc<QuestionSet>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a question set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn upsert_question_set(&self, set: QuestionSet) -> Result<(), StorageError> {
        let mut guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(set.id().clone(), Arc::new(set));
        Ok(())
    }
}

#[async_trait]
impl QuestionSetRepository for InMemoryRepository {
    async fn get_question_set(
        &self,
        id: &QuestionSetId,
    ) -> Result<Arc<QuestionSet>, StorageError> {
        let guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_question_sets(&self) -> Result<Vec<QuestionSetSummary>, StorageError> {
        let guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .values()
            .map(|set| QuestionSetSummary::from_set(set))
            .collect())
    }
}
