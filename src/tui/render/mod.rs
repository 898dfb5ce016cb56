pub mod header;
pub mod help_overlay;
pub mod page_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Block;

use crate::util::unicode;

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    render_at(frame, app, Instant::now());
}

/// Render with an explicit clock so fades can be drawn deterministically
pub fn render_at(frame: &mut Frame, app: &App, now: Instant) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: heading + indicator + title (4 rows) | page | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    page_view::render_page_view(frame, app, chunks[1], now);
    status_row::render_status_row(frame, app, chunks[2]);

    // Help overlay (rendered on top of everything)
    if app.show_help {
        help_overlay::render_help_overlay(frame, app, area);
    }
}

/// Spans for the edit buffer with a block cursor at `cursor`
pub(super) fn edit_spans(buffer: &str, cursor: usize, style: Style) -> Vec<Span<'static>> {
    let mut cursor = cursor.min(buffer.len());
    while !buffer.is_char_boundary(cursor) {
        cursor -= 1;
    }
    let (before, rest) = buffer.split_at(cursor);
    let cursor_end = unicode::next_grapheme_boundary(buffer, cursor).unwrap_or(buffer.len());
    let under = &buffer[cursor..cursor_end];
    let after = &rest[under.len()..];

    vec![
        Span::styled(before.to_string(), style),
        Span::styled(
            if under.is_empty() { " ".to_string() } else { under.to_string() },
            style.add_modifier(Modifier::REVERSED),
        ),
        Span::styled(after.to_string(), style),
    ]
}
