use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{LEVEL_COUNT, Row};
use crate::tui::app::{App, Column, EditTarget, Mode};
use crate::util::unicode;

/// Cells per level column: ` - NNN +★ `
const LEVEL_WIDTH: usize = 10;
/// Leading cursor marker
const MARKER_WIDTH: usize = 2;
const STAR: &str = "\u{2605}";

/// Render the column header and the task rows of the current page
pub fn render_page_view(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let task_width = width
        .saturating_sub(MARKER_WIDTH + LEVEL_WIDTH * LEVEL_COUNT)
        .max(4);

    let header_style = Style::default()
        .fg(app.theme.dim)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let mut header = vec![
        Span::styled(" ".repeat(MARKER_WIDTH), header_style),
        Span::styled(unicode::fit_to_width("Task", task_width), header_style),
    ];
    for i in 0..LEVEL_COUNT {
        header.push(Span::styled(
            unicode::fit_to_width(&format!(" Level {}", i + 1), LEVEL_WIDTH),
            header_style,
        ));
    }

    let mut lines = vec![Line::from(header)];
    let page = app.current_page_index();
    for (r, row) in app.current_page().rows().iter().enumerate() {
        lines.push(Line::from(""));
        let opacity = app.row_opacity(page, r, now);
        lines.push(row_line(app, r, row, task_width, opacity));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn row_line(app: &App, r: usize, row: &Row, task_width: usize, opacity: f32) -> Line<'static> {
    let theme = &app.theme;
    let bg = theme.background;
    let fade = |c: Color| theme.faded(c, opacity);
    let on_row = r == app.cursor_row;
    let focused = |col: Column| on_row && app.mode == Mode::Navigate && app.cursor_col == col;
    let cell_bg = |col: Column| if focused(col) { theme.selection_bg } else { bg };

    let mut spans = Vec::new();
    let marker = if on_row { "\u{25B8} " } else { "  " };
    spans.push(Span::styled(marker, Style::default().fg(fade(theme.text)).bg(bg)));

    // Task label
    if app.edit_target == Some(EditTarget::Task { row: r }) {
        let style = Style::default().fg(theme.text).bg(theme.input_bg);
        let used = unicode::display_width(&app.edit_buffer) + 1;
        spans.extend(super::edit_spans(&app.edit_buffer, app.edit_cursor, style));
        if used < task_width {
            spans.push(Span::styled(" ".repeat(task_width - used), Style::default().bg(bg)));
        }
    } else {
        let (text, color) = if row.task().is_empty() {
            ("\u{2014}", theme.dim)
        } else {
            (row.task(), theme.text)
        };
        spans.push(Span::styled(
            unicode::fit_to_width(text, task_width),
            Style::default().fg(fade(color)).bg(cell_bg(Column::Task)),
        ));
    }

    // Level cells
    for (i, value) in row.levels().into_iter().enumerate() {
        let col_bg = cell_bg(Column::Level(i));
        let slider = Style::default().fg(fade(theme.slider)).bg(col_bg);
        spans.push(Span::styled(" - ", slider));

        if app.edit_target == Some(EditTarget::Level { row: r, level: i }) {
            let style = Style::default().fg(theme.text).bg(theme.input_bg);
            let (text, cursor) = unicode::cursor_window(&app.edit_buffer, app.edit_cursor, 3);
            let cursor_cell = usize::from(cursor == text.len());
            let pad = 3usize.saturating_sub(unicode::display_width(text) + cursor_cell);
            spans.push(Span::styled(" ".repeat(pad), style));
            spans.extend(super::edit_spans(text, cursor, style));
        } else {
            spans.push(Span::styled(
                format!("{:>3}", value),
                Style::default()
                    .fg(fade(theme.text))
                    .bg(col_bg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        spans.push(Span::styled(" +", slider));
        let star = if row.star(i) { STAR } else { " " };
        spans.push(Span::styled(star, Style::default().fg(fade(theme.star)).bg(col_bg)));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    Line::from(spans)
}
