//! # course-quiz
//!
//! Self-assessment engine for course content: quick checks embedded in a
//! section, end-of-section quizzes and mock exams drawn from a question bank.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use course_quiz::{Session, QuizError, StartMode};
//!
//! fn main() -> Result<(), QuizError> {
//!     // Load and validate a section file
//!     let session = Session::from_section_file("sections/capacitance.json", StartMode::Gated)?;
//!
//!     // Work through it in the terminal
//!     session.run()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! The evaluator and the run state machine can be used without a terminal:
//!
//! ```rust
//! use course_quiz::{CorrectAnswer, Question, QuizRunner, QuizSet, Selection, StartMode};
//!
//! let question = Question::new(
//!     1u64,
//!     "What is the unit of capacitance?",
//!     ["Henry (H)", "Farad (F)"],
//!     CorrectAnswer::ByValue("Farad (F)".to_string()),
//!     "Capacitance is measured in farads.",
//! );
//! assert!(question.evaluate(Selection::Value("Farad (F)")).is_correct);
//!
//! let mut runner = QuizRunner::new(QuizSet::new(None, vec![question]), StartMode::Immediate)
//!     .with_observer(|score: &course_quiz::Score| println!("scored {}", score));
//! let outcome = runner.answer(Selection::Index(1)).unwrap();
//! assert_eq!(outcome.completed.map(|s| s.fraction()), Some(1.0));
//! ```

mod app;
mod data;
pub mod exam;
mod models;
pub mod runner;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::Rng;
use thiserror::Error;

pub use app::App;
pub use data::{
    LoadError, Severity, ValidationIssue, json_files_in, load_directory, load_document,
    parse_document_str, read_document, validate_document, validate_exam, validate_section,
};
pub use models::{
    AppState, CheckAttempt, CorrectAnswer, Difficulty, Document, ExamConfig, Feedback,
    InlineCheck, MockExam, Question, QuestionId, QuizSet, Section, Selection,
};
pub use runner::{
    AnswerOutcome, AnswerRecord, CompletionObserver, QuizRunner, RunState, RunnerError, Score,
    StartMode,
};

/// Error type for quiz sessions.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("failed to load content: {0}")]
    Load(#[from] LoadError),

    #[error("expected a {expected} document, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn kind_name(document: &Document) -> &'static str {
    match document {
        Document::Section(_) => "section",
        Document::MockExam(_) => "mock exam",
    }
}

/// An interactive terminal session over a section or an exam paper.
pub struct Session {
    app: App,
}

impl Session {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    /// Load a section file: quick checks followed by the section quiz.
    pub fn from_section_file<P: AsRef<Path>>(path: P, mode: StartMode) -> Result<Self, QuizError> {
        match load_document(path)? {
            Document::Section(section) => Ok(Self::new(App::for_section(section, mode))),
            other => Err(QuizError::WrongKind {
                expected: "section",
                found: kind_name(&other),
            }),
        }
    }

    /// Load a mock exam file and draw a paper of `count` questions
    /// (the configured size when `None`).
    pub fn from_exam_file<P: AsRef<Path>, R: Rng + ?Sized>(
        path: P,
        count: Option<usize>,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        match load_document(path)? {
            Document::MockExam(exam) => {
                let count = count.unwrap_or(exam.config.total_questions);
                let paper = exam.assemble_with_count(count, rng);
                Ok(Self::new(App::for_exam(paper, exam.config.pass_threshold)))
            }
            other => Err(QuizError::WrongKind {
                expected: "mock exam",
                found: kind_name(&other),
            }),
        }
    }

    /// Run in the terminal until the learner quits.
    pub fn run(mut self) -> Result<(), QuizError> {
        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut self.app);
        terminal::restore()?;
        result
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::QuizTerminal, app: &mut App) -> Result<(), QuizError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) {
        return true;
    }

    match app.state {
        AppState::Welcome => {
            if key == KeyCode::Enter {
                app.begin();
            }
        }
        AppState::Check => match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
            KeyCode::Enter | KeyCode::Char(' ') => app.submit_check(),
            _ => {}
        },
        AppState::Quiz => match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
            KeyCode::Left | KeyCode::Char('h') => app.previous_question(),
            KeyCode::Right | KeyCode::Char('l') => app.next_question(),
            KeyCode::Enter | KeyCode::Char(' ') => app.submit_answer(),
            _ => {}
        },
        AppState::Result => match key {
            KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
            KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
            KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
            _ => {}
        },
    }

    false
}
