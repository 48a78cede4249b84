use serde::{Deserialize, Serialize};

use super::check::InlineCheck;
use super::question::Question;

/// An ordered run of questions presented as one assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

impl QuizSet {
    pub fn new(title: Option<String>, questions: Vec<Question>) -> Self {
        Self { title, questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Assessable content of one course section page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub quick_checks: Vec<InlineCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamConfig {
    pub exam_id: String,
    pub exam_title: String,
    pub total_questions: usize,
    /// Time allowed in seconds.
    #[serde(default = "default_time_limit")]
    pub time_limit: u64,
    /// Percentage needed to pass, 0-100.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u8,
    #[serde(default)]
    pub categories: Vec<String>,
}

fn default_time_limit() -> u64 {
    1800
}

fn default_pass_threshold() -> u8 {
    80
}

/// A mock examination: a question bank plus the rules for drawing from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockExam {
    pub config: ExamConfig,
    pub bank: Vec<Question>,
}

/// A content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Document {
    Section(Section),
    MockExam(MockExam),
}

impl Document {
    pub fn id(&self) -> &str {
        match self {
            Document::Section(section) => &section.id,
            Document::MockExam(exam) => &exam.config.exam_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Document::Section(section) => &section.title,
            Document::MockExam(exam) => &exam.config.exam_title,
        }
    }

    /// Short description of what the document holds, for listings.
    pub fn summary(&self) -> String {
        match self {
            Document::Section(section) => format!(
                "{} quick checks, {} quiz questions",
                section.quick_checks.len(),
                section.quiz.as_ref().map_or(0, QuizSet::len)
            ),
            Document::MockExam(exam) => format!(
                "{} of {} bank questions, pass {}%",
                exam.config.total_questions,
                exam.bank.len(),
                exam.config.pass_threshold
            ),
        }
    }
}
