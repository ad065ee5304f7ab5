use std::collections::HashMap;

use crate::model::ids::QuestionId;
use crate::model::question::OptionLabel;

/// The learner's current selection per question.
///
/// Single-valued: recording an answer for a question that already has one
/// replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    selections: HashMap<QuestionId, OptionLabel>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `label` for `question_id`, returning the previous selection.
    pub fn record(&mut self, question_id: QuestionId, label: OptionLabel) -> Option<OptionLabel> {
        self.selections.insert(question_id, label)
    }

    #[must_use]
    pub fn get(&self, question_id: &QuestionId) -> Option<OptionLabel> {
        self.selections.get(question_id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_selection_replaces_earlier_one() {
        let mut record = AnswerRecord::new();
        let q1 = QuestionId::new("q1").unwrap();

        assert_eq!(record.record(q1.clone(), OptionLabel::B), None);
        assert_eq!(record.record(q1.clone(), OptionLabel::C), Some(OptionLabel::B));

        assert_eq!(record.len(), 1);
        assert_eq!(record.get(&q1), Some(OptionLabel::C));
    }
}
