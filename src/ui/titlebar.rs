use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::screen::{Panel, Screen};

pub fn draw_titlebar(f: &mut Frame, area: Rect, screen: &Screen) {
    let title_text = format!("[ {} ]", screen.title);
    let title_span = Span::styled(
        title_text.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    // Timer and score only mean something while a quiz question is up
    let stats = match (screen.panel, &screen.timer_value, screen.score_value) {
        (Panel::Question, Some(timer), Some(score)) => format!(" {}   score {} ", timer, score),
        _ => String::new(),
    };
    let low_time = screen
        .timer_value
        .as_deref()
        .and_then(|t| t.trim_end_matches(" s").parse::<i64>().ok())
        .map(|secs| secs <= 10)
        .unwrap_or(false);
    let stats_span = if low_time {
        Span::styled(
            stats.clone(),
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(stats.clone(), Style::default().fg(Color::Rgb(200, 200, 120)))
    };

    // Center the title: pad left so title sits in the middle of the full width
    let available = area.width as usize;
    let title_len = title_text.chars().count();
    let center_pad = available.saturating_sub(title_len) / 2;
    let right_pad = available.saturating_sub(center_pad + title_len + stats.chars().count());

    let line = Line::from(vec![
        Span::raw(" ".repeat(center_pad)),
        title_span,
        Span::raw(" ".repeat(right_pad)),
        stats_span,
    ]);

    let widget = Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
