use std::rc::Rc;

use tracing::debug;

use crate::models::{AppState, CheckAttempt, Feedback, InlineCheck, Question, QuizSet, Section, Selection};
use crate::runner::{AnswerRecord, QuizRunner, RunState, Score, StartMode};

/// Presentation state for one learner working through a section or exam.
pub struct App {
    pub state: AppState,
    title: String,
    checks: Vec<InlineCheck>,
    check_index: usize,
    check_attempt: CheckAttempt,
    check_results: Vec<Option<bool>>,
    quiz: Rc<QuizSet>,
    start_mode: StartMode,
    runner: QuizRunner,
    pass_threshold: Option<u8>,
    selected_option: usize,
    result_scroll: usize,
}

impl App {
    /// A bare quiz with no quick checks.
    pub fn with_quiz(title: impl Into<String>, quiz: QuizSet, start_mode: StartMode) -> Self {
        Self::build(title.into(), Vec::new(), quiz, start_mode)
    }

    /// Quick checks first, then the end-of-section quiz.
    pub fn for_section(section: Section, start_mode: StartMode) -> Self {
        let quiz = section.quiz.unwrap_or_default();
        Self::build(section.title, section.quick_checks, quiz, start_mode)
    }

    /// A drawn exam paper, graded against `pass_threshold` percent.
    pub fn for_exam(quiz: QuizSet, pass_threshold: u8) -> Self {
        let title = quiz.title.clone().unwrap_or_else(|| "Mock Exam".to_string());
        let mut app = Self::build(title, Vec::new(), quiz, StartMode::Gated);
        app.pass_threshold = Some(pass_threshold);
        app
    }

    fn build(title: String, checks: Vec<InlineCheck>, quiz: QuizSet, start_mode: StartMode) -> Self {
        let quiz = Rc::new(quiz);
        let mut app = Self {
            state: AppState::Welcome,
            title,
            check_results: vec![None; checks.len()],
            checks,
            check_index: 0,
            check_attempt: CheckAttempt::new(),
            runner: QuizRunner::new(Rc::clone(&quiz), StartMode::Gated),
            quiz,
            start_mode,
            pass_threshold: None,
            selected_option: 0,
            result_scroll: 0,
        };
        if start_mode == StartMode::Immediate {
            app.begin();
        }
        app
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn pass_threshold(&self) -> Option<u8> {
        self.pass_threshold
    }

    pub fn runner(&self) -> &QuizRunner {
        &self.runner
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn checks(&self) -> &[InlineCheck] {
        &self.checks
    }

    pub fn check_results(&self) -> &[Option<bool>] {
        &self.check_results
    }

    pub fn current_check(&self) -> Option<&InlineCheck> {
        self.checks.get(self.check_index)
    }

    pub fn current_check_number(&self) -> usize {
        self.check_index + 1
    }

    pub fn check_feedback(&self) -> Option<Feedback<'_>> {
        self.current_check()
            .and_then(|check| self.check_attempt.feedback(check))
    }

    pub fn check_selection(&self) -> Option<usize> {
        self.check_attempt.selected()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.runner.current_question()
    }

    pub fn current_question_number(&self) -> usize {
        self.runner.current_index() + 1
    }

    pub fn total_questions(&self) -> usize {
        self.quiz.len()
    }

    pub fn current_answer(&self) -> Option<AnswerRecord> {
        self.runner.answer_for(self.runner.current_index())
    }

    pub fn score(&self) -> Option<Score> {
        self.runner.score()
    }

    /// Leave the welcome screen.
    pub fn begin(&mut self) {
        if self.checks.is_empty() {
            self.start_quiz();
        } else {
            self.state = AppState::Check;
        }
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    /// Answer the current check, or move past it once answered.
    pub fn submit_check(&mut self) {
        let Some(check) = self.checks.get(self.check_index) else {
            self.start_quiz();
            return;
        };

        if !self.check_attempt.is_answered() {
            let feedback = self.check_attempt.select(check, self.selected_option);
            self.check_results[self.check_index] = Some(feedback.is_correct);
            debug!(check = %check.id, is_correct = feedback.is_correct, "quick check answered");
            return;
        }

        self.check_index += 1;
        self.check_attempt.reset();
        self.selected_option = 0;
        if self.check_index >= self.checks.len() {
            self.start_quiz();
        }
    }

    /// Answer the current question, or move on once it is answered.
    pub fn submit_answer(&mut self) {
        if self.current_answer().is_none() {
            if let Err(err) = self.runner.answer(Selection::Index(self.selected_option)) {
                debug!(%err, "answer ignored");
            }
            return;
        }

        if self.runner.state() == RunState::Completed {
            self.state = AppState::Result;
            return;
        }

        if let Some(index) = self.runner.next_unanswered() {
            self.move_to_question(index);
        }
    }

    pub fn next_question(&mut self) {
        let index = self.runner.current_index() + 1;
        self.move_to_question(index);
    }

    pub fn previous_question(&mut self) {
        if let Some(index) = self.runner.current_index().checked_sub(1) {
            self.move_to_question(index);
        }
    }

    pub fn scroll_results_down(&mut self) {
        let rows = self.checks.len() + self.quiz.len();
        if self.result_scroll + 1 < rows {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Throw away all answers and start a fresh run.
    pub fn restart(&mut self) {
        self.runner = QuizRunner::new(Rc::clone(&self.quiz), StartMode::Gated);
        self.check_index = 0;
        self.check_attempt.reset();
        self.check_results = vec![None; self.checks.len()];
        self.selected_option = 0;
        self.result_scroll = 0;
        self.state = AppState::Welcome;
        if self.start_mode == StartMode::Immediate {
            self.begin();
        }
    }

    fn start_quiz(&mut self) {
        self.runner.start();
        self.selected_option = 0;
        self.state = if self.runner.state() == RunState::Completed {
            AppState::Result
        } else {
            AppState::Quiz
        };
    }

    fn move_to_question(&mut self, index: usize) {
        if self.runner.go_to(index).is_ok() {
            self.selected_option = self
                .current_answer()
                .and_then(|record| record.selected)
                .unwrap_or(0);
        }
    }

    fn option_count(&self) -> usize {
        match self.state {
            AppState::Check => self.current_check().map_or(0, |c| c.options.len()),
            AppState::Quiz => self.current_question().map_or(0, |q| q.options.len()),
            AppState::Welcome | AppState::Result => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CorrectAnswer;

    fn section() -> Section {
        Section {
            id: "m1s1".to_string(),
            title: "What is COSHH?".to_string(),
            description: None,
            quick_checks: vec![InlineCheck {
                id: "coshh-stands-for".to_string(),
                question: "What does COSHH stand for?".to_string(),
                options: vec!["Harmful to Humans".to_string(), "Hazardous to Health".to_string()],
                correct_index: 1,
                explanation: "Control of Substances Hazardous to Health.".to_string(),
            }],
            quiz: Some(QuizSet::new(
                Some("Section 1 Knowledge Check".to_string()),
                vec![
                    Question::new(1u64, "Q1", ["a", "b", "c"], CorrectAnswer::ByIndex(2), "c"),
                    Question::new(2u64, "Q2", ["a", "b"], CorrectAnswer::ByValue("a".into()), "a"),
                ],
            )),
        }
    }

    #[test]
    fn section_walkthrough() {
        let mut app = App::for_section(section(), StartMode::Gated);
        assert_eq!(app.state, AppState::Welcome);

        app.begin();
        assert_eq!(app.state, AppState::Check);
        app.select_next_option();
        app.submit_check();
        assert_eq!(app.check_feedback().map(|f| f.is_correct), Some(true));
        app.submit_check();
        assert_eq!(app.state, AppState::Quiz);

        // Q1: pick option c (wraps backwards from a).
        app.select_previous_option();
        assert_eq!(app.selected_option(), 2);
        app.submit_answer();
        assert_eq!(app.current_answer().map(|r| r.is_correct), Some(true));
        app.submit_answer();
        assert_eq!(app.current_question_number(), 2);

        // Q2: pick b, which is wrong.
        app.select_next_option();
        app.submit_answer();
        assert_eq!(app.state, AppState::Quiz);
        app.submit_answer();
        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.score(), Some(Score { correct: 1, total: 2 }));
        assert_eq!(app.check_results(), &[Some(true)]);
    }

    #[test]
    fn immediate_mode_skips_welcome() {
        let quiz = section().quiz.unwrap();
        let app = App::with_quiz("Quiz", quiz, StartMode::Immediate);
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.runner().state(), RunState::InProgress);
    }

    #[test]
    fn section_without_quiz_ends_after_checks() {
        let mut s = section();
        s.quiz = None;
        let mut app = App::for_section(s, StartMode::Immediate);
        app.submit_check();
        app.submit_check();
        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.score(), Some(Score { correct: 0, total: 0 }));
    }

    #[test]
    fn navigation_restores_previous_selection() {
        let quiz = section().quiz.unwrap();
        let mut app = App::with_quiz("Quiz", quiz, StartMode::Immediate);
        app.select_next_option();
        app.submit_answer();
        app.next_question();
        assert_eq!(app.selected_option(), 0);
        app.previous_question();
        assert_eq!(app.selected_option(), 1);
    }

    #[test]
    fn restart_is_a_fresh_run() {
        let quiz = section().quiz.unwrap();
        let mut app = App::for_exam(quiz, 50);
        let first_run = app.runner().id();
        app.begin();
        app.submit_answer();
        app.restart();

        assert_eq!(app.state, AppState::Welcome);
        assert_ne!(app.runner().id(), first_run);
        assert_eq!(app.runner().answered_count(), 0);
        assert_eq!(app.pass_threshold(), Some(50));
    }
}
