use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::runner::Score;

use super::render_controls;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let score = app.score().unwrap_or(Score {
        correct: app.runner().correct_count(),
        total: app.total_questions(),
    });

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], app, score);
    render_breakdown(frame, chunks[2], app);
    render_controls(frame, chunks[3], "j/k scroll  ·  r restart  ·  q quit");
}

fn grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, app: &App, score: Score) {
    let color = grade_color(score.percentage());

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            score.to_string(),
            Style::default().fg(color).bold(),
        )),
    ];

    if let Some(threshold) = app.pass_threshold() {
        let (verdict, verdict_color) = if score.passes(threshold) {
            ("PASS", Color::Green)
        } else {
            ("FAIL", Color::Red)
        };
        content.push(Line::from(vec![
            Span::styled(verdict, Style::default().fg(verdict_color).bold()),
            Span::styled(
                format!("  (pass mark {}%)", threshold),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let checks = app.check_results();
    if !checks.is_empty() {
        let right = checks.iter().filter(|r| **r == Some(true)).count();
        content.push(Line::from(Span::styled(
            format!("Quick checks: {} / {}", right, checks.len()),
            Style::default().fg(Color::Gray),
        )));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_breakdown(frame: &mut Frame, area: Rect, app: &App) {
    let check_lines = app
        .checks()
        .iter()
        .zip(app.check_results())
        .map(|(check, result)| breakdown_line("QC", &check.question, *result));

    let question_lines = app
        .runner()
        .quiz()
        .questions
        .iter()
        .zip(app.runner().answers())
        .enumerate()
        .map(|(index, (question, record))| {
            breakdown_line(
                &format!("{:2}", index + 1),
                &question.prompt,
                record.map(|r| r.is_correct),
            )
        });

    let lines: Vec<Line> = check_lines.chain(question_lines).collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((app.result_scroll() as u16, 0));
    frame.render_widget(widget, area);
}

fn breakdown_line(label: &str, text: &str, result: Option<bool>) -> Line<'static> {
    let (symbol, color) = match result {
        Some(true) => ("+", Color::Green),
        Some(false) => ("-", Color::Red),
        None => ("?", Color::DarkGray),
    };

    Line::from(vec![
        Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
        Span::styled(format!("{}. ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(truncate_question(text), Style::default().fg(Color::Gray)),
    ])
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_prompts_are_truncated() {
        let long = "x".repeat(60);
        assert_eq!(truncate_question(&long).chars().count(), QUESTION_PREVIEW_LENGTH + 3);
        assert_eq!(truncate_question("short"), "short");
    }

    #[test]
    fn grade_colours() {
        assert_eq!(grade_color(100.0), Color::Green);
        assert_eq!(grade_color(75.0), Color::Cyan);
        assert_eq!(grade_color(50.0), Color::Yellow);
        assert_eq!(grade_color(0.0), Color::Red);
    }
}
