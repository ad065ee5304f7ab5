use chrono::{DateTime, Utc};
use serde::Serialize;

use exam_core::model::{
    AnswerOption, AttemptId, DetailKind, ExamSession, OptionLabel, Question, QuestionId,
    QuestionSetId, SessionProgress, SessionResult,
};

/// Presentation-agnostic snapshot of an exam attempt.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no markup processing of question bodies
///
/// Correct options are only exposed once the attempt is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamView {
    pub set_id: QuestionSetId,
    pub title: String,
    pub attempt_id: AttemptId,
    pub started_at: DateTime<Utc>,
    pub progress: SessionProgress,
    pub current: Option<QuestionView>,
    pub result: Option<SessionResult>,
    pub detail: Option<DetailKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub body: String,
    pub options: Vec<OptionView>,
    pub selected: Option<OptionLabel>,
    pub correct: Option<OptionLabel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub id: OptionLabel,
    pub text: String,
}

impl From<&AnswerOption> for OptionView {
    fn from(option: &AnswerOption) -> Self {
        Self {
            id: option.id,
            text: option.text.clone(),
        }
    }
}

impl QuestionView {
    fn from_question(question: &Question, session: &ExamSession) -> Self {
        Self {
            id: question.id().clone(),
            body: question.body().to_owned(),
            options: question.options().iter().map(OptionView::from).collect(),
            selected: session.answer_for(question.id()),
            correct: session.is_submitted().then_some(question.correct_option()),
        }
    }
}

impl ExamView {
    #[must_use]
    pub fn from_session(session: &ExamSession) -> Self {
        let questions = session.question_set();
        Self {
            set_id: questions.id().clone(),
            title: questions.title().to_owned(),
            attempt_id: session.attempt_id(),
            started_at: session.started_at(),
            progress: session.progress(),
            current: session
                .current_question()
                .map(|question| QuestionView::from_question(question, session)),
            result: session.result().cloned(),
            detail: session.detail(),
        }
    }
}
