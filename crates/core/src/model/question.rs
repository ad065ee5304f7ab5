use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown option label: {raw:?}")]
pub struct ParseOptionLabelError {
    pub raw: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has option {found} where {expected} was expected")]
    OptionOrder {
        id: QuestionId,
        expected: OptionLabel,
        found: OptionLabel,
    },

    #[error("question {id} must have exactly one correct option, found {count}")]
    CorrectCount { id: QuestionId, count: usize },
}

//
// ─── OPTION LABEL ─────────────────────────────────────────────────────────────
//

/// Label of one of the four answer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Position of the label within a question's options.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
            OptionLabel::D => 3,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionLabel {
    type Err = ParseOptionLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            "D" | "d" => Ok(Self::D),
            _ => Err(ParseOptionLabelError { raw: s.to_owned() }),
        }
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionLabel,
    pub text: String,
    pub is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: OptionLabel, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }
}

/// A multiple-choice question with four options, exactly one of them correct.
///
/// The body is opaque markup; nothing here inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    body: String,
    options: [AnswerOption; 4],
    correct: OptionLabel,
}

impl Question {
    /// Build a question from options listed in A–D order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::OptionOrder` if the labels are not A, B, C, D in order.
    /// Returns `QuestionError::CorrectCount` unless exactly one option is correct.
    pub fn new(
        id: QuestionId,
        body: impl Into<String>,
        options: [AnswerOption; 4],
    ) -> Result<Self, QuestionError> {
        for (expected, option) in OptionLabel::ALL.into_iter().zip(options.iter()) {
            if option.id != expected {
                return Err(QuestionError::OptionOrder {
                    id,
                    expected,
                    found: option.id,
                });
            }
        }

        let mut correct = options.iter().filter(|option| option.is_correct);
        let (Some(first), None) = (correct.next(), correct.next()) else {
            let count = options.iter().filter(|option| option.is_correct).count();
            return Err(QuestionError::CorrectCount { id, count });
        };
        let correct = first.id;

        Ok(Self {
            id,
            body: body.into(),
            options,
            correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption; 4] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, label: OptionLabel) -> &AnswerOption {
        &self.options[label.index()]
    }

    /// Label of the single correct option.
    #[must_use]
    pub fn correct_option(&self) -> OptionLabel {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, label: OptionLabel) -> bool {
        self.option(label).is_correct
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
