use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;

use super::{render_controls, render_feedback, render_options};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(check) = app.current_check() else {
        return;
    };
    let feedback = app.check_feedback();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(if feedback.is_some() { 6 } else { 0 }),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    let progress = format!(
        "Quick Check {}/{}",
        app.current_check_number(),
        app.checks().len()
    );
    frame.render_widget(
        Paragraph::new(progress)
            .alignment(Alignment::Right)
            .fg(Color::DarkGray),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(check.question.as_str())
            .wrap(Wrap { trim: true })
            .fg(Color::White)
            .bold(),
        chunks[1],
    );

    let answered = app
        .check_selection()
        .map(|picked| (Some(picked), Some(check.correct_index)));
    render_options(
        frame,
        chunks[2],
        &check.options,
        app.selected_option(),
        answered,
    );

    if let Some(feedback) = feedback {
        render_feedback(frame, chunks[3], feedback);
        render_controls(frame, chunks[4], "enter continue  ·  q quit");
    } else {
        render_controls(frame, chunks[4], "j/k navigate  ·  enter select  ·  q quit");
    }
}
