use std::collections::HashSet;
use std::fmt;

use crate::models::{CorrectAnswer, Document, InlineCheck, MockExam, Question, QuizSet, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// An authoring defect found in a content document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Question or check id, when the issue belongs to one.
    pub location: Option<String>,
    pub message: String,
}

impl ValidationIssue {
    fn error(location: Option<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location,
            message: message.into(),
        }
    }

    fn warning(location: Option<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        match &self.location {
            Some(location) => write!(f, "[{}] {}: {}", location, label, self.message),
            None => write!(f, "{}: {}", label, self.message),
        }
    }
}

pub fn validate_document(document: &Document) -> Vec<ValidationIssue> {
    match document {
        Document::Section(section) => validate_section(section),
        Document::MockExam(exam) => validate_exam(exam),
    }
}

pub fn validate_section(section: &Section) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if section.title.trim().is_empty() {
        issues.push(ValidationIssue::error(None, "section title is empty"));
    }

    let mut seen = HashSet::new();
    for check in &section.quick_checks {
        if !seen.insert(check.id.as_str()) {
            issues.push(ValidationIssue::error(
                Some(check.id.clone()),
                "duplicate quick check id",
            ));
        }
        check_inline(check, &mut issues);
    }

    if let Some(quiz) = &section.quiz {
        validate_quiz(quiz, &mut issues);
    }

    issues
}

pub fn validate_exam(exam: &MockExam) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let config = &exam.config;

    check_question_list(&exam.bank, &mut issues);

    if config.total_questions == 0 {
        issues.push(ValidationIssue::error(None, "exam asks for zero questions"));
    }
    if config.total_questions > exam.bank.len() {
        issues.push(ValidationIssue::error(
            None,
            format!(
                "exam asks for {} questions but the bank holds {}",
                config.total_questions,
                exam.bank.len()
            ),
        ));
    }
    if config.pass_threshold > 100 {
        issues.push(ValidationIssue::error(
            None,
            format!("pass threshold {}% is above 100", config.pass_threshold),
        ));
    }

    if !config.categories.is_empty() {
        for question in &exam.bank {
            let listed = question
                .category
                .as_ref()
                .is_some_and(|c| config.categories.contains(c));
            if !listed {
                issues.push(ValidationIssue::warning(
                    Some(question.id.to_string()),
                    format!(
                        "category {:?} is not one of the exam categories",
                        question.category.as_deref().unwrap_or("")
                    ),
                ));
            }
        }
    }

    issues
}

fn validate_quiz(quiz: &QuizSet, issues: &mut Vec<ValidationIssue>) {
    if quiz.is_empty() {
        issues.push(ValidationIssue::error(None, "quiz has no questions"));
    }
    check_question_list(&quiz.questions, issues);
}

fn check_question_list(questions: &[Question], issues: &mut Vec<ValidationIssue>) {
    let mut seen = HashSet::new();
    for question in questions {
        if !seen.insert(&question.id) {
            issues.push(ValidationIssue::error(
                Some(question.id.to_string()),
                "duplicate question id",
            ));
        }
        check_question(question, issues);
    }
}

fn check_question(question: &Question, issues: &mut Vec<ValidationIssue>) {
    let location = Some(question.id.to_string());
    check_common(
        &location,
        &question.prompt,
        &question.options,
        &question.explanation,
        issues,
    );

    match &question.correct {
        CorrectAnswer::ByIndex(index) if *index >= question.options.len() => {
            issues.push(ValidationIssue::error(
                location,
                format!(
                    "correct answer index {} is out of range for {} options",
                    index,
                    question.options.len()
                ),
            ));
        }
        CorrectAnswer::ByValue(value) => {
            let matches = question.options.iter().filter(|o| *o == value).count();
            if matches != 1 {
                issues.push(ValidationIssue::error(
                    location,
                    format!(
                        "correct answer {:?} matches {} options, expected exactly one",
                        value, matches
                    ),
                ));
            }
        }
        CorrectAnswer::ByIndex(_) => {}
    }
}

fn check_inline(check: &InlineCheck, issues: &mut Vec<ValidationIssue>) {
    let location = Some(check.id.clone());
    check_common(
        &location,
        &check.question,
        &check.options,
        &check.explanation,
        issues,
    );

    if check.correct_index >= check.options.len() {
        issues.push(ValidationIssue::error(
            location,
            format!(
                "correct index {} is out of range for {} options",
                check.correct_index,
                check.options.len()
            ),
        ));
    }
}

fn check_common(
    location: &Option<String>,
    prompt: &str,
    options: &[String],
    explanation: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if prompt.trim().is_empty() {
        issues.push(ValidationIssue::error(location.clone(), "question text is empty"));
    }
    if options.len() < 2 {
        issues.push(ValidationIssue::error(
            location.clone(),
            format!("needs at least 2 options, found {}", options.len()),
        ));
    }
    if explanation.trim().is_empty() {
        issues.push(ValidationIssue::error(location.clone(), "explanation is empty"));
    }

    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.as_str()) {
            issues.push(ValidationIssue::warning(
                location.clone(),
                format!("option {:?} appears more than once", option),
            ));
        }
    }
}
