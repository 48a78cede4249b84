mod check;
mod document;
mod question;

pub use check::{CheckAttempt, InlineCheck};
pub use document::{Document, ExamConfig, MockExam, QuizSet, Section};
pub use question::{CorrectAnswer, Difficulty, Feedback, Question, QuestionId, Selection};

/// Which screen the terminal front end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Welcome,
    Check,
    Quiz,
    Result,
}
