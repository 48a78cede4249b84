use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .horizontal_margin(4)
    .split(area);

    let mut details = Vec::new();
    if !app.checks().is_empty() {
        details.push(format!("{} Quick Checks", app.checks().len()));
    }
    details.push(format!("{} Questions", app.total_questions()));
    if let Some(threshold) = app.pass_threshold() {
        details.push(format!("Pass Mark {}%", threshold));
    }

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.title().to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            details.join(" · "),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start".fg(Color::DarkGray)),
        Line::from(""),
        Line::from("q to quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );

    frame.render_widget(widget, chunks[1]);
}
