use std::time::Instant;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::model::{AppConfig, PAGE_COUNT, Page, PageRecord, RowData, default_title};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app at the standard terminal size.
pub fn render_app(app: &App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _area| {
        super::render_at(frame, app, Instant::now());
    })
}

/// Default pages backed by a fresh temp data directory. Keep the TempDir
/// alive for as long as the app saves.
pub fn test_app() -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    let pages = (0..PAGE_COUNT)
        .map(|i| Page::new(i, default_title(i)))
        .collect();
    let app = App::new(dir.path().to_path_buf(), AppConfig::default(), pages);
    (dir, app)
}

/// Like `test_app`, with the given rows on the first page.
pub fn app_with_rows(rows: &[(&str, [u8; 3])]) -> (TempDir, App) {
    let (dir, mut app) = test_app();
    app.pages[0].apply_record(&PageRecord {
        title: None,
        rows: rows
            .iter()
            .map(|(task, levels)| RowData::new(*task, *levels))
            .collect(),
    });
    (dir, app)
}
