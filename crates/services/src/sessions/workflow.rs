use std::sync::Arc;

use exam_core::model::QuestionSetId;
use storage::repository::{QuestionSetRepository, QuestionSetSummary};
use tracing::{info, warn};

use super::runner::ExamRunner;
use crate::Clock;
use crate::config::EngineConfig;
use crate::error::SessionError;

/// Orchestrates loading question sets and starting exam attempts.
#[derive(Clone)]
pub struct ExamLoopService {
    clock: Clock,
    config: EngineConfig,
    question_sets: Arc<dyn QuestionSetRepository>,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        config: EngineConfig,
        question_sets: Arc<dyn QuestionSetRepository>,
    ) -> Self {
        Self {
            clock,
            config,
            question_sets,
        }
    }

    /// List the question sets that can be practiced.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn list_question_sets(&self) -> Result<Vec<QuestionSetSummary>, SessionError> {
        Ok(self.question_sets.list_question_sets().await?)
    }

    /// Load the set and start a ticking attempt over it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the set has no questions, or
    /// `SessionError::Storage` if it cannot be loaded.
    pub async fn start_exam(&self, set_id: &QuestionSetId) -> Result<ExamRunner, SessionError> {
        let questions = self.question_sets.get_question_set(set_id).await?;
        if questions.is_empty() {
            warn!(set_id = %set_id, "question set has no questions");
            return Err(SessionError::Empty);
        }

        info!(set_id = %set_id, title = questions.title(), "starting exam");
        Ok(ExamRunner::start(questions, self.clock, &self.config))
    }
}
