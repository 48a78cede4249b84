//! Quiz run state machine.
//!
//! A [`QuizRunner`] walks a [`QuizSet`] from `NotStarted` through
//! `InProgress` to `Completed`. Answer state lives only as long as the
//! runner; restarting a quiz means building a new runner.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{Question, QuizSet, Selection};

/// Lifecycle of a single quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    InProgress,
    Completed,
}

/// Whether a run waits for an explicit start action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StartMode {
    /// Begin in `NotStarted`; `start()` must be called.
    #[default]
    Gated,
    /// Begin directly in `InProgress`.
    Immediate,
}

/// Final tally of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// Fraction answered correctly, in `[0, 1]`. An empty run scores 0.
    pub fn fraction(&self) -> f64 {
        if self.total > 0 {
            self.correct as f64 / self.total as f64
        } else {
            0.0
        }
    }

    pub fn percentage(&self) -> f64 {
        self.fraction() * 100.0
    }

    /// True when the percentage reaches `threshold` (0-100).
    pub fn passes(&self, threshold: u8) -> bool {
        // Integer comparison avoids float rounding at the boundary.
        self.correct * 100 >= usize::from(threshold) * self.total
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} ({:.0}%)",
            self.correct,
            self.total,
            self.percentage()
        )
    }
}

/// Notified once when a run reaches `Completed`.
pub trait CompletionObserver {
    fn on_complete(&mut self, score: &Score);
}

impl<F> CompletionObserver for F
where
    F: FnMut(&Score),
{
    fn on_complete(&mut self, score: &Score) {
        self(score)
    }
}

/// Misuse of the runner by its caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    #[error("quiz has not been started")]
    NotStarted,
    #[error("quiz is already completed")]
    AlreadyCompleted,
    #[error("question {0} has already been answered")]
    AlreadyAnswered(usize),
    #[error("no question at index {0}")]
    NoSuchQuestion(usize),
}

/// What was recorded for one answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Index of the chosen option, `None` if the selection matched no option.
    pub selected: Option<usize>,
    pub is_correct: bool,
}

/// Feedback returned from [`QuizRunner::answer`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub is_correct: bool,
    pub explanation: String,
    /// Set when this answer completed the run.
    pub completed: Option<Score>,
}

pub struct QuizRunner {
    id: Uuid,
    quiz: Rc<QuizSet>,
    state: RunState,
    cursor: usize,
    answers: Vec<Option<AnswerRecord>>,
    score: Option<Score>,
    observer: Option<Box<dyn CompletionObserver>>,
    notified: bool,
}

impl fmt::Debug for QuizRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRunner")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("answers", &self.answers)
            .field("score", &self.score)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl QuizRunner {
    pub fn new(quiz: impl Into<Rc<QuizSet>>, mode: StartMode) -> Self {
        let quiz = quiz.into();
        let answers = vec![None; quiz.len()];
        let mut runner = Self {
            id: Uuid::new_v4(),
            quiz,
            state: RunState::NotStarted,
            cursor: 0,
            answers,
            score: None,
            observer: None,
            notified: false,
        };
        if mode == StartMode::Immediate {
            runner.start();
        }
        runner
    }

    /// Attach an observer notified when the run completes.
    ///
    /// A run that has already completed (an empty quiz started immediately)
    /// notifies the observer as it is attached.
    pub fn with_observer(mut self, observer: impl CompletionObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self.notify();
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn quiz(&self) -> &QuizSet {
        &self.quiz
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.len()
    }

    pub fn current_index(&self) -> usize {
        self.cursor
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.questions.get(self.cursor)
    }

    pub fn answers(&self) -> &[Option<AnswerRecord>] {
        &self.answers
    }

    pub fn answer_for(&self, index: usize) -> Option<AnswerRecord> {
        self.answers.get(index).copied().flatten()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.answers
            .iter()
            .flatten()
            .filter(|record| record.is_correct)
            .count()
    }

    /// Available once the run is `Completed`.
    pub fn score(&self) -> Option<Score> {
        self.score
    }

    /// `NotStarted -> InProgress`. Does nothing once started.
    pub fn start(&mut self) {
        if self.state != RunState::NotStarted {
            return;
        }
        self.state = RunState::InProgress;
        debug!(run = %self.id, questions = self.quiz.len(), "quiz started");

        if self.quiz.is_empty() {
            self.complete();
        }
    }

    /// Answer the question under the cursor.
    pub fn answer(&mut self, selection: Selection<'_>) -> Result<AnswerOutcome, RunnerError> {
        self.answer_at(self.cursor, selection)
    }

    /// Answer the question at `index`. Answers cannot be changed.
    pub fn answer_at(
        &mut self,
        index: usize,
        selection: Selection<'_>,
    ) -> Result<AnswerOutcome, RunnerError> {
        self.ensure_in_progress()?;

        let question = self
            .quiz
            .questions
            .get(index)
            .ok_or(RunnerError::NoSuchQuestion(index))?;
        if self.answers[index].is_some() {
            return Err(RunnerError::AlreadyAnswered(index));
        }

        let feedback = question.evaluate(selection);
        let selected = match selection {
            Selection::Index(i) => (i < question.options.len()).then_some(i),
            Selection::Value(v) => question.options.iter().position(|o| o == v),
        };
        let is_correct = feedback.is_correct;
        let explanation = feedback.explanation.to_string();

        self.answers[index] = Some(AnswerRecord {
            selected,
            is_correct,
        });
        debug!(run = %self.id, question = index, is_correct, "answer recorded");

        if self.answers.iter().all(Option::is_some) {
            self.complete();
        }

        Ok(AnswerOutcome {
            question_index: index,
            is_correct,
            explanation,
            completed: self.score,
        })
    }

    pub fn next(&mut self) -> Result<(), RunnerError> {
        self.go_to(self.cursor + 1)
    }

    pub fn previous(&mut self) -> Result<(), RunnerError> {
        match self.cursor.checked_sub(1) {
            Some(index) => self.go_to(index),
            None => Err(RunnerError::NoSuchQuestion(0)),
        }
    }

    /// Move the cursor to any question while the run is in progress.
    pub fn go_to(&mut self, index: usize) -> Result<(), RunnerError> {
        self.ensure_in_progress()?;
        if index >= self.quiz.len() {
            return Err(RunnerError::NoSuchQuestion(index));
        }
        self.cursor = index;
        Ok(())
    }

    /// First unanswered question at or after the cursor, wrapping around.
    pub fn next_unanswered(&self) -> Option<usize> {
        let len = self.answers.len();
        (0..len)
            .map(|offset| (self.cursor + offset) % len)
            .find(|&index| self.answers[index].is_none())
    }

    fn ensure_in_progress(&self) -> Result<(), RunnerError> {
        match self.state {
            RunState::NotStarted => Err(RunnerError::NotStarted),
            RunState::Completed => Err(RunnerError::AlreadyCompleted),
            RunState::InProgress => Ok(()),
        }
    }

    fn complete(&mut self) {
        let score = Score {
            correct: self.correct_count(),
            total: self.quiz.len(),
        };
        self.state = RunState::Completed;
        self.score = Some(score);
        info!(run = %self.id, correct = score.correct, total = score.total, "quiz completed");
        self.notify();
    }

    fn notify(&mut self) {
        if self.notified {
            return;
        }
        if let (Some(score), Some(observer)) = (self.score, self.observer.as_mut()) {
            observer.on_complete(&score);
            self.notified = true;
        }
    }
}
