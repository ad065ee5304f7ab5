use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answers::AnswerRecord;
use crate::model::ids::{AttemptId, QuestionId};
use crate::model::question::OptionLabel;
use crate::model::question_set::QuestionSet;

/// Which review partition the learner is looking at after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    Correct,
    Incorrect,
}

/// One answered question as shown in the review partitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_id: QuestionId,
    pub selected: OptionLabel,
    pub correct: OptionLabel,
}

impl AnsweredQuestion {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected == self.correct
    }
}

/// Frozen outcome of a submitted attempt.
///
/// Both partitions follow question order. Unanswered questions appear in
/// neither and do not count toward the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    attempt_id: AttemptId,
    score: u32,
    total: u32,
    percentage: u8,
    elapsed_secs: u64,
    submitted_at: DateTime<Utc>,
    correctly_answered: Vec<AnsweredQuestion>,
    incorrectly_answered: Vec<AnsweredQuestion>,
}

impl SessionResult {
    pub(crate) fn compute(
        questions: &QuestionSet,
        answers: &AnswerRecord,
        attempt_id: AttemptId,
        elapsed_secs: u64,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        let (correctly_answered, incorrectly_answered): (Vec<_>, Vec<_>) = questions
            .questions()
            .iter()
            .filter_map(|question| {
                answers.get(question.id()).map(|selected| AnsweredQuestion {
                    question_id: question.id().clone(),
                    selected,
                    correct: question.correct_option(),
                })
            })
            .partition(AnsweredQuestion::is_correct);

        let score = u32::try_from(correctly_answered.len()).unwrap_or(u32::MAX);
        let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);

        Self {
            attempt_id,
            score,
            total,
            percentage: percentage(score, total),
            elapsed_secs,
            submitted_at,
            correctly_answered,
            incorrectly_answered,
        }
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn correctly_answered(&self) -> &[AnsweredQuestion] {
        &self.correctly_answered
    }

    #[must_use]
    pub fn incorrectly_answered(&self) -> &[AnsweredQuestion] {
        &self.incorrectly_answered
    }

    #[must_use]
    pub fn detail(&self, kind: DetailKind) -> &[AnsweredQuestion] {
        match kind {
            DetailKind::Correct => &self.correctly_answered,
            DetailKind::Incorrect => &self.incorrectly_answered,
        }
    }

    /// Number of questions that had an answer at submission.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.correctly_answered.len() + self.incorrectly_answered.len()
    }
}

/// `score / total` as a whole percentage, rounding halves up.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score.min(total));
    let total = u64::from(total);
    let rounded = (score * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}
