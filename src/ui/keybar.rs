use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::screen::{Panel, Screen};

pub fn draw_keybar(f: &mut Frame, area: Rect, screen: &Screen) {
    let bindings: Vec<(&str, &str)> = match screen.panel {
        Panel::Question => vec![
            ("a-z", "answer"),
            ("↑/↓", "move"),
            ("Space", "toggle"),
            ("Enter", "submit"),
            ("Ctrl+Q", "quit"),
        ],
        Panel::Info => vec![
            ("Enter", "start quiz"),
            ("l", "leaderboard"),
            ("Ctrl+Q", "quit"),
        ],
        Panel::Leaderboard => vec![("Enter", "back"), ("Ctrl+Q", "quit")],
        Panel::Status => vec![("Ctrl+Q", "quit")],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let line = Line::from(spans);
    let widget = Paragraph::new(line).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(widget, area);
}
