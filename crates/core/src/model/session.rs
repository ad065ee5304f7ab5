use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::model::answers::AnswerRecord;
use crate::model::ids::{AttemptId, QuestionId};
use crate::model::question::{OptionLabel, ParseOptionLabelError, Question};
use crate::model::question_set::QuestionSet;
use crate::model::result::{AnsweredQuestion, DetailKind, SessionResult};
use crate::time::Clock;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Contract violations rejected by `ExamSession`. State is never modified
/// when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("question set has no questions")]
    NoContent,

    #[error("session already submitted")]
    AlreadySubmitted,

    #[error("session not submitted yet")]
    NotSubmitted,

    #[error("question {0} is not part of this set")]
    UnknownQuestion(QuestionId),

    #[error(transparent)]
    UnknownOption(#[from] ParseOptionLabelError),
}

//
// ─── STATUS / NAVIGATION ──────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Snapshot of session progress for a rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub index: Option<usize>,
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub elapsed_secs: u64,
    pub status: SessionStatus,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a question set.
///
/// Drives answer recording, navigation, the advisory elapsed counter and
/// scoring. The question set is shared and never mutated; `retry` starts a new
/// attempt over the same `Arc`.
///
/// A session over an empty set has no current question. Navigation, answering,
/// ticking and submitting are all no-ops or rejected for it.
#[derive(Clone)]
pub struct ExamSession {
    questions: Arc<QuestionSet>,
    clock: Clock,
    attempt_id: AttemptId,
    started_at: DateTime<Utc>,
    current: usize,
    answers: AnswerRecord,
    elapsed_secs: u64,
    status: SessionStatus,
    result: Option<SessionResult>,
    detail: Option<DetailKind>,
}

impl ExamSession {
    /// Start a new attempt over `questions`.
    #[must_use]
    pub fn new(questions: Arc<QuestionSet>, clock: Clock) -> Self {
        Self {
            questions,
            clock,
            attempt_id: AttemptId::generate(),
            started_at: clock.now(),
            current: 0,
            answers: AnswerRecord::new(),
            elapsed_secs: 0,
            status: SessionStatus::InProgress,
            result: None,
            detail: None,
        }
    }

    #[must_use]
    pub fn question_set(&self) -> &Arc<QuestionSet> {
        &self.questions
    }

    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.questions.is_empty()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Index of the question on screen, `None` when the set is empty.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.has_content().then_some(self.current)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn answer_for(&self, question_id: &QuestionId) -> Option<OptionLabel> {
        self.answers.get(question_id)
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.status == SessionStatus::Submitted
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The frozen result, present once the attempt is submitted.
    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// The review partition currently open, if any.
    #[must_use]
    pub fn detail(&self) -> Option<DetailKind> {
        self.detail
    }

    #[must_use]
    pub fn detail_entries(&self) -> Option<&[AnsweredQuestion]> {
        let kind = self.detail?;
        self.result.as_ref().map(|result| result.detail(kind))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.total_questions();
        let answered = self.answered_count();
        SessionProgress {
            index: self.current_index(),
            total,
            answered,
            remaining: total.saturating_sub(answered),
            elapsed_secs: self.elapsed_secs,
            status: self.status,
        }
    }

    /// Record `label` as the answer to `question_id`, replacing any earlier
    /// selection. Returns the replaced selection.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NoContent` for an empty set,
    /// `ExamError::AlreadySubmitted` after submission and
    /// `ExamError::UnknownQuestion` for ids outside the set.
    pub fn select_answer(
        &mut self,
        question_id: &QuestionId,
        label: OptionLabel,
    ) -> Result<Option<OptionLabel>, ExamError> {
        self.ensure_answerable()?;
        let question = self
            .questions
            .find(question_id)
            .ok_or_else(|| ExamError::UnknownQuestion(question_id.clone()))?;
        Ok(self.answers.record(question.id().clone(), label))
    }

    /// Like `select_answer`, for a raw option id coming from a UI.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::UnknownOption` if `raw` is not one of A–D, plus the
    /// errors of `select_answer`.
    pub fn select_answer_str(
        &mut self,
        question_id: &QuestionId,
        raw: &str,
    ) -> Result<Option<OptionLabel>, ExamError> {
        let label: OptionLabel = raw.parse()?;
        self.select_answer(question_id, label)
    }

    /// Answer the question at the current index.
    ///
    /// # Errors
    ///
    /// Same as `select_answer`.
    pub fn select_current(&mut self, label: OptionLabel) -> Result<Option<OptionLabel>, ExamError> {
        let Some(question_id) = self.current_question().map(|q| q.id().clone()) else {
            return Err(ExamError::NoContent);
        };
        self.select_answer(&question_id, label)
    }

    /// Move one question forward or back. Stops at either end.
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        let last = self.last_index()?;
        self.current = match direction {
            Direction::Next => (self.current + 1).min(last),
            Direction::Prev => self.current.saturating_sub(1),
        };
        Some(self.current)
    }

    /// Jump straight to `index`; indices past the end land on the last question.
    pub fn jump_to(&mut self, index: usize) -> Option<usize> {
        let last = self.last_index()?;
        self.current = index.min(last);
        Some(self.current)
    }

    /// Advance the elapsed counter by one second. Returns whether it counted.
    pub fn tick(&mut self) -> bool {
        if self.is_submitted() || !self.has_content() {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    /// Finish the attempt and freeze its result.
    ///
    /// Repeated calls return the already frozen result. Returns `None` for an
    /// empty set.
    pub fn submit(&mut self) -> Option<&SessionResult> {
        if !self.has_content() {
            return None;
        }
        if self.result.is_none() {
            self.status = SessionStatus::Submitted;
            self.result = Some(SessionResult::compute(
                &self.questions,
                &self.answers,
                self.attempt_id,
                self.elapsed_secs,
                self.clock.now(),
            ));
        }
        self.result.as_ref()
    }

    /// Start over on the same question set. Only valid after submission.
    pub fn retry(&mut self) -> bool {
        if !self.is_submitted() {
            return false;
        }
        *self = Self::new(Arc::clone(&self.questions), self.clock);
        true
    }

    /// Open the `kind` review partition, or close it if it is already open.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotSubmitted` before submission.
    pub fn reveal_detail(&mut self, kind: DetailKind) -> Result<Option<DetailKind>, ExamError> {
        if !self.is_submitted() {
            return Err(ExamError::NotSubmitted);
        }
        self.detail = if self.detail == Some(kind) {
            None
        } else {
            Some(kind)
        };
        Ok(self.detail)
    }

    fn last_index(&self) -> Option<usize> {
        self.total_questions().checked_sub(1)
    }

    fn ensure_answerable(&self) -> Result<(), ExamError> {
        if !self.has_content() {
            return Err(ExamError::NoContent);
        }
        if self.is_submitted() {
            return Err(ExamError::AlreadySubmitted);
        }
        Ok(())
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("question_set", self.questions.id())
            .field("questions_len", &self.questions.len())
            .field("attempt_id", &self.attempt_id)
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("elapsed_secs", &self.elapsed_secs)
            .field("status", &self.status)
            .field("detail", &self.detail)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
