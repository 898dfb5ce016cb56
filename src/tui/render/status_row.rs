use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, EditTarget, Mode};
use crate::util::unicode;

const NAVIGATE_HINTS: &str =
    "\u{2190}\u{2192} page  \u{2191}\u{2193} row  [] level  +/- adjust  Enter edit  t title  ? help  q quit";
const EDIT_HINTS: &str = "Enter save  Esc cancel";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let line = match app.mode {
        Mode::Navigate => {
            if let Some(ref msg) = app.status_message {
                Line::from(Span::styled(
                    unicode::truncate_to_width(msg, width),
                    Style::default().fg(app.theme.error).bg(bg),
                ))
            } else if app.config.ui.show_key_hints {
                Line::from(Span::styled(
                    unicode::truncate_to_width(NAVIGATE_HINTS, width),
                    dim,
                ))
            } else {
                Line::from(Span::styled(" ".repeat(width), Style::default().bg(bg)))
            }
        }
        Mode::Edit => {
            let label = match app.edit_target {
                Some(EditTarget::Title) => "title".to_string(),
                Some(EditTarget::Task { row }) => format!("task {}", row + 1),
                Some(EditTarget::Level { row, level }) => {
                    format!("row {} level {} (0-100)", row + 1, level + 1)
                }
                None => String::new(),
            };
            let mut spans = vec![Span::styled(
                format!("Editing {}", label),
                Style::default().fg(app.theme.text).bg(bg),
            )];
            let content_width: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
            let hint_width = EDIT_HINTS.chars().count();
            if content_width + hint_width < width {
                let padding = width - content_width - hint_width;
                spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
                spans.push(Span::styled(EDIT_HINTS, dim));
            }
            Line::from(spans)
        }
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
