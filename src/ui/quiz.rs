use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{Feedback, Selection};

use super::{render_controls, render_feedback, render_options};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(question) = app.current_question() else {
        return;
    };
    let answer = app.current_answer();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(if answer.is_some() { 6 } else { 0 }),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_question_text(frame, chunks[1], &question.prompt);

    let answered = answer.map(|record| (record.selected, question.correct_index()));
    render_options(
        frame,
        chunks[2],
        &question.options,
        app.selected_option(),
        answered,
    );

    if let Some(record) = answer {
        let feedback = match record.selected {
            Some(index) => question.evaluate(Selection::Index(index)),
            None => Feedback {
                is_correct: record.is_correct,
                explanation: &question.explanation,
            },
        };
        render_feedback(frame, chunks[3], feedback);
        render_controls(frame, chunks[4], "enter continue  ·  h/l prev/next  ·  q quit");
    } else {
        render_controls(
            frame,
            chunks[4],
            "j/k navigate  ·  enter select  ·  h/l prev/next  ·  q quit",
        );
    }
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let title = app.runner().quiz().title.as_deref().unwrap_or(app.title());
    let progress = format!(
        "{}  {}/{}  ({} answered)",
        title,
        app.current_question_number(),
        app.total_questions(),
        app.runner().answered_count()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}
