use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Column, LevelStep};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status_message = None;

    // Help overlay intercepts everything until dismissed
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Columns (checked before the plain arrows)
        KeyCode::Left if shift => app.cursor_prev_column(),
        KeyCode::Right if shift => app.cursor_next_column(),
        KeyCode::Char('[') => app.cursor_prev_column(),
        KeyCode::Char(']') => app.cursor_next_column(),

        // Pages
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.prev_page(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.next_page(),

        // Rows
        KeyCode::Up | KeyCode::Char('k') => app.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => app.cursor_down(),

        // Levels
        KeyCode::Char('+') | KeyCode::Char('=') => app.step_focused_level(LevelStep::Up),
        KeyCode::Char('-') => app.step_focused_level(LevelStep::Down),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if matches!(app.cursor_col, Column::Level(_)) {
                app.begin_cell_edit(Some(c));
            }
        }

        // Text
        KeyCode::Enter => app.begin_cell_edit(None),
        KeyCode::Char('t') => app.begin_title_edit(),
        _ => {}
    }
}
