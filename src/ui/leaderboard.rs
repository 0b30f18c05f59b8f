use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::screen::{Region, Screen};

pub fn draw_leaderboard(f: &mut Frame, area: Rect, screen: &Screen) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Leaderboard",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if screen.is_visible(Region::LastScore) {
        if let Some(score) = screen.last_score {
            lines.push(Line::from(vec![
                Span::raw("Your score: "),
                Span::styled(
                    score.to_string(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(""));
        }
    }

    match &screen.leaderboard_fetched_at {
        None if screen.leaderboard_unavailable => lines.push(Line::from(Span::styled(
            "Leaderboard unavailable",
            Style::default().fg(Color::Red),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Loading ...",
            Style::default().fg(Color::Yellow),
        ))),
        Some(_) if screen.leaderboard.is_empty() => {
            lines.push(Line::from("No scores yet."));
        }
        Some(fetched_at) => {
            for (i, entry) in screen.leaderboard_lines().into_iter().enumerate() {
                lines.push(Line::from(format!("{:>3}. {}", i + 1, entry)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("as of {}", fetched_at),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("[ {} ]", screen.back_label),
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(widget, area);
}
