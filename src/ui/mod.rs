mod check;
mod quiz;
mod result;
mod welcome;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{AppState, Feedback};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state {
        AppState::Welcome => welcome::render(frame, area, app),
        AppState::Check => check::render(frame, area, app),
        AppState::Quiz => quiz::render(frame, area, app),
        AppState::Result => result::render(frame, area, app),
    }
}

/// Letter shown next to the option at `index`: A, B, C, ...
fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .filter(u8::is_ascii_uppercase)
        .map_or('?', char::from)
}

/// Option list with a cursor. Once answered, the chosen option and the
/// correct one are coloured instead.
fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &[String],
    cursor: usize,
    answered: Option<(Option<usize>, Option<usize>)>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let (style, marker) = match answered {
            None if index == cursor => (Style::default().fg(Color::Cyan).bold(), ">"),
            None => (Style::default().fg(Color::Gray), " "),
            Some((_, Some(correct))) if index == correct => {
                (Style::default().fg(Color::Green).bold(), "+")
            }
            Some((Some(picked), _)) if index == picked => {
                (Style::default().fg(Color::Red).bold(), "-")
            }
            Some(_) => (Style::default().fg(Color::DarkGray), " "),
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_feedback(frame: &mut Frame, area: Rect, feedback: Feedback<'_>) {
    let (verdict, color) = if feedback.is_correct {
        ("Correct", Color::Green)
    } else {
        ("Incorrect", Color::Red)
    };

    let content = vec![
        Line::from(Span::styled(verdict, Style::default().fg(color).bold())),
        Line::from(Span::styled(
            feedback.explanation,
            Style::default().fg(Color::Gray),
        )),
    ];

    let widget = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(color)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
