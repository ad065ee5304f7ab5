use exam_core::model::{
    AnswerOption, OptionLabel, Question, QuestionId, QuestionSet, QuestionSetId,
};
use serde::Deserialize;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn invalid<E: Into<exam_core::Error>>(e: E) -> StorageError {
    StorageError::Invalid(e.into())
}

/// On-disk shape of a question set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct QuestionSetRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct QuestionRecord {
    pub id: String,
    pub body: String,
    /// Label of the correct option; alternative to per-option `is_correct`.
    #[serde(default)]
    pub answer: Option<String>,
    pub options: Vec<OptionRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct OptionRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl QuestionSetRecord {
    pub(crate) fn into_question_set(self) -> Result<QuestionSet, StorageError> {
        let id = QuestionSetId::new(self.id).map_err(invalid)?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        QuestionSet::new(id, self.title, questions).map_err(invalid)
    }
}

impl QuestionRecord {
    fn into_question(self) -> Result<Question, StorageError> {
        let id = QuestionId::new(self.id).map_err(invalid)?;
        let answer = self
            .answer
            .as_deref()
            .map(str::parse::<OptionLabel>)
            .transpose()
            .map_err(ser)?;

        let count = self.options.len();
        let options = self
            .options
            .into_iter()
            .map(|option| {
                let label: OptionLabel = option.id.parse().map_err(ser)?;
                let is_correct = match answer {
                    Some(answer) if option.is_correct && answer != label => {
                        return Err(StorageError::Serialization(format!(
                            "question {id}: option {label} is flagged correct but answer is {answer}"
                        )));
                    }
                    Some(answer) => answer == label,
                    None => option.is_correct,
                };
                Ok(AnswerOption::new(label, option.text, is_correct))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let options: [AnswerOption; 4] = options.try_into().map_err(|_| {
            StorageError::Serialization(format!(
                "question {id} must have 4 options, found {count}"
            ))
        })?;

        Question::new(id, self.body, options).map_err(invalid)
    }
}
