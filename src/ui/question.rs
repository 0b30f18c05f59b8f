use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::screen::{Feedback, Region, Screen, HINT_TEXT};

fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            result.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        result.push(current);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}

pub fn draw_question(f: &mut Frame, area: Rect, screen: &Screen) {
    let mut lines: Vec<Line> = Vec::new();
    let text_width = (area.width as usize).saturating_sub(4); // 2 indent left + 2 margin right

    lines.push(Line::from(""));
    for wline in wrap_text(&screen.question_text, text_width) {
        lines.push(Line::from(Span::styled(
            format!("  {}", wline),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
    }

    if screen.is_visible(Region::Hint) {
        lines.push(Line::from(Span::styled(
            format!("  {}", HINT_TEXT),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));

    // Feedback colors the whole answers region
    let region_style = match screen.feedback {
        Some(Feedback::Correct) => Style::default().bg(Color::Rgb(0, 70, 0)),
        Some(Feedback::Incorrect) => Style::default().bg(Color::Rgb(90, 0, 0)),
        None => Style::default(),
    };

    for (i, control) in screen.controls.iter().enumerate() {
        let letter = (b'a' + (i % 26) as u8) as char;
        let marker = match (screen.multi_choice, control.checked) {
            (true, true) => "[x]",
            (true, false) => "[ ]",
            (false, true) => "(●)",
            (false, false) => "( )",
        };
        let pointer = if i == screen.cursor { ">" } else { " " };

        let mut style = region_style;
        if control.checked {
            style = style.fg(Color::Green);
        }

        // Prefix: " > (●) a. " = 10 chars
        let prefix = format!(" {} {} {}. ", pointer, marker, letter);
        let prefix_len = prefix.chars().count();
        let wrapped = wrap_text(&control.label, (area.width as usize).saturating_sub(prefix_len + 2));
        for (li, wline) in wrapped.iter().enumerate() {
            let head = if li == 0 {
                prefix.clone()
            } else {
                " ".repeat(prefix_len)
            };
            lines.push(Line::from(vec![
                Span::styled(head, style),
                Span::styled(wline.clone(), style),
            ]));
        }
    }

    lines.push(Line::from(""));
    let feedback_text = match screen.feedback {
        Some(Feedback::Correct) => Span::styled(
            "  ✓ Correct",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Some(Feedback::Incorrect) => Span::styled(
            "  ✗ Incorrect",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        None => Span::raw(""),
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("[ {} ]", screen.submit_label),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        feedback_text,
    ]));

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, area);
}
