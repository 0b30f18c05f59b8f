use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::screen::Screen;

pub fn draw_statusbar(f: &mut Frame, area: Rect, screen: &Screen) {
    let line = match &screen.notice {
        Some(notice) => Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("⚠ {}", notice), Style::default().fg(Color::Red)),
        ]),
        None => Line::from(""),
    };

    let widget = Paragraph::new(line).style(Style::default().bg(Color::Rgb(30, 30, 30)));
    f.render_widget(widget, area);
}
