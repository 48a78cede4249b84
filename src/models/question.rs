use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a question, unique within its containing list.
///
/// Authored content uses both numeric (`1`, `2`, ...) and slug-style
/// (`"coshh-stands-for"`) identifiers, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{}", n),
            QuestionId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        QuestionId::Number(n)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId::Text(s.to_string())
    }
}

/// How a question designates its correct option.
///
/// Each question declares its convention explicitly; nothing is inferred
/// from the shape of the data at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CorrectAnswer {
    /// 0-based index into `options`.
    ByIndex(usize),
    /// Literal text of the correct option.
    ByValue(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
}

/// A single-answer multiple choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct: CorrectAnswer,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// The option a learner picked, either by position or by its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Index(usize),
    Value(&'a str),
}

/// Result of evaluating one selection against one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback<'a> {
    pub is_correct: bool,
    pub explanation: &'a str,
}

impl Question {
    pub fn new<I, S>(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        options: I,
        correct: CorrectAnswer,
        explanation: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct,
            explanation: explanation.into(),
            section: None,
            difficulty: None,
            category: None,
            topic: None,
        }
    }

    /// Resolve the correctness reference to an option index.
    ///
    /// Returns `None` when the reference is malformed: an index past the
    /// end of `options`, or a value that matches no option or more than one.
    pub fn correct_index(&self) -> Option<usize> {
        match &self.correct {
            CorrectAnswer::ByIndex(index) => (*index < self.options.len()).then_some(*index),
            CorrectAnswer::ByValue(value) => {
                let mut matches = self
                    .options
                    .iter()
                    .enumerate()
                    .filter(|(_, option)| *option == value);
                match (matches.next(), matches.next()) {
                    (Some((index, _)), None) => Some(index),
                    _ => None,
                }
            }
        }
    }

    /// Evaluate a selection. Pure: the same pair always gives the same result.
    ///
    /// Unresolvable selections and malformed questions are never correct.
    pub fn evaluate(&self, selection: Selection<'_>) -> Feedback<'_> {
        let is_correct = match (&self.correct, selection) {
            (CorrectAnswer::ByValue(expected), Selection::Value(picked)) => {
                picked == expected.as_str() && self.correct_index().is_some()
            }
            (_, Selection::Index(picked)) => {
                picked < self.options.len() && self.correct_index() == Some(picked)
            }
            (CorrectAnswer::ByIndex(_), Selection::Value(picked)) => self
                .correct_index()
                .is_some_and(|index| self.options[index] == picked),
        };

        Feedback {
            is_correct,
            explanation: &self.explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacitance() -> Question {
        Question::new(
            3u64,
            "What is the unit of capacitance?",
            ["Henry (H)", "Farad (F)", "Ohm (Ω)", "Siemens (S)"],
            CorrectAnswer::ByValue("Farad (F)".to_string()),
            "Capacitance is measured in farads.",
        )
    }

    fn insulation() -> Question {
        Question::new(
            1u64,
            "Minimum insulation resistance for a 230V circuit?",
            ["0.5 MΩ", "1 MΩ", "2 MΩ", "5 MΩ"],
            CorrectAnswer::ByIndex(1),
            "BS 7671 requires at least 1 MΩ.",
        )
    }

    #[test]
    fn by_index_only_designated_option_is_correct() {
        let q = insulation();
        for index in 0..q.options.len() {
            let feedback = q.evaluate(Selection::Index(index));
            assert_eq!(feedback.is_correct, index == 1, "option {}", index);
        }
    }

    #[test]
    fn by_value_matches_option_text() {
        let q = capacitance();
        assert!(q.evaluate(Selection::Value("Farad (F)")).is_correct);
        assert!(!q.evaluate(Selection::Value("Henry (H)")).is_correct);
    }

    #[test]
    fn by_value_resolves_index_selection() {
        let q = capacitance();
        assert!(q.evaluate(Selection::Index(1)).is_correct);
        assert!(!q.evaluate(Selection::Index(0)).is_correct);
        assert!(!q.evaluate(Selection::Index(3)).is_correct);
    }

    #[test]
    fn by_index_resolves_value_selection() {
        let q = insulation();
        assert!(q.evaluate(Selection::Value("1 MΩ")).is_correct);
        assert!(!q.evaluate(Selection::Value("2 MΩ")).is_correct);
    }

    #[test]
    fn explanation_is_the_same_either_way() {
        let q = insulation();
        let right = q.evaluate(Selection::Index(1));
        let wrong = q.evaluate(Selection::Index(2));
        assert_eq!(right.explanation, wrong.explanation);
        assert!(!right.explanation.is_empty());
    }

    #[test]
    fn out_of_range_selection_fails_closed() {
        let q = insulation();
        assert!(!q.evaluate(Selection::Index(4)).is_correct);
        assert!(!q.evaluate(Selection::Index(usize::MAX)).is_correct);
        assert!(!q.evaluate(Selection::Value("10 MΩ")).is_correct);
    }

    #[test]
    fn malformed_reference_is_never_correct() {
        let mut q = insulation();
        q.correct = CorrectAnswer::ByIndex(7);
        assert_eq!(q.correct_index(), None);
        assert!((0..8).all(|i| !q.evaluate(Selection::Index(i)).is_correct));

        let mut q = capacitance();
        q.correct = CorrectAnswer::ByValue("Coulomb (C)".to_string());
        assert!(!q.evaluate(Selection::Value("Coulomb (C)")).is_correct);
        assert!((0..4).all(|i| !q.evaluate(Selection::Index(i)).is_correct));
    }

    #[test]
    fn ambiguous_value_does_not_resolve() {
        let q = Question::new(
            "dup",
            "Pick one",
            ["Yes", "Yes", "No"],
            CorrectAnswer::ByValue("Yes".to_string()),
            "Duplicated option text.",
        );
        assert_eq!(q.correct_index(), None);
        assert!(!q.evaluate(Selection::Value("Yes")).is_correct);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let q = capacitance();
        let before = q.clone();
        let first = q.evaluate(Selection::Index(1));
        for _ in 0..5 {
            assert_eq!(q.evaluate(Selection::Index(1)), first);
        }
        assert_eq!(q, before);
    }

    #[test]
    fn deserializes_authored_json() {
        let json = r#"{
            "id": 7,
            "question": "Unit of capacitance?",
            "options": ["Henry (H)", "Farad (F)"],
            "correctAnswer": { "byValue": "Farad (F)" },
            "explanation": "Farads.",
            "difficulty": "basic",
            "category": "Science"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, QuestionId::Number(7));
        assert_eq!(q.correct_index(), Some(1));
        assert_eq!(q.difficulty, Some(Difficulty::Basic));

        let json = r#"{
            "id": "slug-id",
            "question": "Pick",
            "options": ["a", "b"],
            "correctAnswer": { "byIndex": 0 },
            "explanation": "a"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id, QuestionId::Text("slug-id".to_string()));
        assert_eq!(q.correct, CorrectAnswer::ByIndex(0));
    }
}
