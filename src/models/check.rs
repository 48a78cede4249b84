use serde::{Deserialize, Serialize};

use super::question::{CorrectAnswer, Feedback, Question, QuestionId, Selection};

/// A single quick-check question embedded in body content.
///
/// Quick checks are always index-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineCheck {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub explanation: String,
}

impl InlineCheck {
    /// Correct iff `selected == correct_index` and both are in range.
    pub fn evaluate(&self, selected: usize) -> Feedback<'_> {
        let in_range = self.correct_index < self.options.len() && selected < self.options.len();
        Feedback {
            is_correct: in_range && selected == self.correct_index,
            explanation: &self.explanation,
        }
    }

    pub fn to_question(&self) -> Question {
        Question::new(
            QuestionId::Text(self.id.clone()),
            self.question.clone(),
            self.options.iter().cloned(),
            CorrectAnswer::ByIndex(self.correct_index),
            self.explanation.clone(),
        )
    }
}

impl From<InlineCheck> for Question {
    fn from(check: InlineCheck) -> Self {
        Question::new(
            QuestionId::Text(check.id),
            check.question,
            check.options,
            CorrectAnswer::ByIndex(check.correct_index),
            check.explanation,
        )
    }
}

/// Ephemeral answer state for one quick check.
///
/// The first selection locks the attempt; later selections are ignored
/// until `reset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckAttempt {
    selected: Option<usize>,
}

impl CheckAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection and return feedback for the locked-in answer.
    pub fn select<'a>(&mut self, check: &'a InlineCheck, index: usize) -> Feedback<'a> {
        let locked = *self.selected.get_or_insert(index);
        check.evaluate(locked)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    /// Feedback for the recorded answer, if there is one.
    pub fn feedback<'a>(&self, check: &'a InlineCheck) -> Option<Feedback<'a>> {
        self.selected.map(|index| check.evaluate(index))
    }

    pub fn reset(&mut self) {
        self.selected = None;
    }
}
