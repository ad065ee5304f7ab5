use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{QuestionId, QuestionSetId};
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionSetError {
    #[error("question set title must not be empty")]
    EmptyTitle,

    #[error("duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),
}

/// An ordered, immutable collection of questions presented as one attempt.
///
/// An empty set is valid; sessions over it have no content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSet {
    id: QuestionSetId,
    title: String,
    questions: Vec<Question>,
}

impl QuestionSet {
    /// # Errors
    ///
    /// Returns `QuestionSetError::EmptyTitle` for a blank title and
    /// `QuestionSetError::DuplicateQuestion` if two questions share an id.
    pub fn new(
        id: QuestionSetId,
        title: impl Into<String>,
        questions: Vec<Question>,
    ) -> Result<Self, QuestionSetError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuestionSetError::EmptyTitle);
        }

        {
            let mut seen = HashSet::with_capacity(questions.len());
            for question in &questions {
                if !seen.insert(question.id()) {
                    return Err(QuestionSetError::DuplicateQuestion(question.id().clone()));
                }
            }
        }

        Ok(Self {
            id,
            title,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionSetId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn find(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == id)
    }
}
