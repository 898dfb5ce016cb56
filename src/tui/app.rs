use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::read_config;
use crate::io::logging::{LogTarget, init_logging};
use crate::io::page_io::{self, load_pages, resolve_data_dir};
use crate::io::watcher::PageWatcher;
use crate::model::{AppConfig, LEVEL_COUNT, Navigator, Page, PageEvent, ROWS_PER_PAGE};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Edit,
}

/// Which cell of a row the cursor is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Task,
    Level(usize),
}

impl Column {
    pub fn next(self) -> Self {
        match self {
            Column::Task => Column::Level(0),
            Column::Level(i) => Column::Level((i + 1).min(LEVEL_COUNT - 1)),
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Column::Task | Column::Level(0) => Column::Task,
            Column::Level(i) => Column::Level(i - 1),
        }
    }
}

/// What an edit session writes back on commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Title,
    Task { row: usize },
    Level { row: usize, level: usize },
}

/// A completed row fading out before the rows shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fade {
    pub page: usize,
    pub row: usize,
    pub started: Instant,
}

/// Step direction for the focused level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStep {
    Up,
    Down,
}

/// Main application state
pub struct App {
    pub data_dir: PathBuf,
    pub config: AppConfig,
    pub theme: Theme,
    pub pages: Vec<Page>,
    pub nav: Navigator,
    pub mode: Mode,
    pub should_quit: bool,
    /// Cursor row on the current page
    pub cursor_row: usize,
    /// Cursor cell within the row
    pub cursor_col: Column,
    pub edit_target: Option<EditTarget>,
    pub edit_buffer: String,
    /// Byte offset into `edit_buffer`
    pub edit_cursor: usize,
    pub fades: Vec<Fade>,
    pub fade_duration: Duration,
    /// Help overlay visible
    pub show_help: bool,
    /// One-line message for the status row, cleared on the next key press
    pub status_message: Option<String>,
}

impl App {
    pub fn new(data_dir: PathBuf, config: AppConfig, pages: Vec<Page>) -> Self {
        let theme = Theme::from_config(&config.ui);
        let fade_duration = Duration::from_millis(config.ui.fade_ms);
        let nav = Navigator::new(pages.len());

        let mut app = App {
            data_dir,
            config,
            theme,
            pages,
            nav,
            mode: Mode::Navigate,
            should_quit: false,
            cursor_row: 0,
            cursor_col: Column::Task,
            edit_target: None,
            edit_buffer: String::new(),
            edit_cursor: 0,
            fades: Vec::new(),
            fade_duration,
            show_help: false,
            status_message: None,
        };

        // A page saved mid-fade comes back with a complete row; finish it
        let now = Instant::now();
        for index in 0..app.pages.len() {
            app.resume_ready_row(index, now);
        }
        app
    }

    pub fn current_page_index(&self) -> usize {
        self.nav.current()
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.nav.current()]
    }

    pub fn is_fading(&self, page: usize) -> bool {
        self.fades.iter().any(|f| f.page == page)
    }

    /// Opacity of a row at `now`: 1.0 normally, falling to 0.0 over the fade
    pub fn row_opacity(&self, page: usize, row: usize, now: Instant) -> f32 {
        let Some(fade) = self.fades.iter().find(|f| f.page == page && f.row == row) else {
            return 1.0;
        };
        if self.fade_duration.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(fade.started).as_secs_f32();
        (1.0 - elapsed / self.fade_duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    // -----------------------------------------------------------------------
    // Page navigation
    // -----------------------------------------------------------------------

    pub fn next_page(&mut self) {
        if self.nav.next() {
            self.on_page_changed();
        }
    }

    pub fn prev_page(&mut self) {
        if self.nav.prev() {
            self.on_page_changed();
        }
    }

    pub fn swipe_start(&mut self, x: i32) {
        self.nav.touch_down(x);
    }

    pub fn swipe_end(&mut self, x: i32) {
        if self.nav.touch_up(x) {
            self.on_page_changed();
        }
    }

    fn on_page_changed(&mut self) {
        tracing::info!(page = self.nav.current() + 1, "page changed");
    }

    // -----------------------------------------------------------------------
    // Cursor
    // -----------------------------------------------------------------------

    pub fn cursor_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        self.cursor_row = (self.cursor_row + 1).min(ROWS_PER_PAGE - 1);
    }

    pub fn cursor_next_column(&mut self) {
        self.cursor_col = self.cursor_col.next();
    }

    pub fn cursor_prev_column(&mut self) {
        self.cursor_col = self.cursor_col.prev();
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Edits are refused while a row on the page is fading out
    fn editable_page(&mut self) -> Option<usize> {
        let page = self.current_page_index();
        if self.is_fading(page) {
            self.status_message = Some("row is clearing\u{2026}".into());
            return None;
        }
        Some(page)
    }

    pub fn step_focused_level(&mut self, step: LevelStep) {
        let Column::Level(level) = self.cursor_col else {
            return;
        };
        let Some(page) = self.editable_page() else {
            return;
        };
        let row = self.cursor_row;
        let before = self.pages[page].row(row).and_then(|r| r.level(level));
        let event = match step {
            LevelStep::Up => self.pages[page].increment(row, level),
            LevelStep::Down => self.pages[page].decrement(row, level),
        };
        let after = self.pages[page].row(row).and_then(|r| r.level(level));
        if before != after {
            self.after_edit(page, event);
        }
    }

    /// Enter edit mode for the focused cell. `seed` replaces the current
    /// value (used when typing a digit on a level).
    pub fn begin_cell_edit(&mut self, seed: Option<char>) {
        let Some(page) = self.editable_page() else {
            return;
        };
        let row = self.cursor_row;
        let (target, text) = match self.cursor_col {
            Column::Task => (
                EditTarget::Task { row },
                self.pages[page].row(row).map(|r| r.task().to_string()),
            ),
            Column::Level(level) => (
                EditTarget::Level { row, level },
                self.pages[page]
                    .row(row)
                    .and_then(|r| r.level(level))
                    .map(|v| v.to_string()),
            ),
        };
        let text = match seed {
            Some(c) => c.to_string(),
            None => text.unwrap_or_default(),
        };
        self.begin_edit(target, text);
    }

    pub fn begin_title_edit(&mut self) {
        let title = self.current_page().title().to_string();
        self.begin_edit(EditTarget::Title, title);
    }

    fn begin_edit(&mut self, target: EditTarget, text: String) {
        self.edit_cursor = text.len();
        self.edit_buffer = text;
        self.edit_target = Some(target);
        self.mode = Mode::Edit;
    }

    pub fn cancel_edit(&mut self) {
        self.edit_target = None;
        self.edit_buffer.clear();
        self.edit_cursor = 0;
        self.mode = Mode::Navigate;
    }

    /// Write the edit buffer back to the page it was opened on
    pub fn commit_edit(&mut self) {
        let Some(target) = self.edit_target.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        let text = std::mem::take(&mut self.edit_buffer);
        self.edit_cursor = 0;
        self.mode = Mode::Navigate;

        let page = self.current_page_index();
        match target {
            EditTarget::Title => {
                self.pages[page].set_title(text);
                self.after_edit(page, None);
            }
            EditTarget::Task { row } => {
                let Some(page) = self.editable_page() else {
                    return;
                };
                self.pages[page].set_task(row, text);
                self.after_edit(page, None);
            }
            EditTarget::Level { row, level } => {
                let Some(page) = self.editable_page() else {
                    return;
                };
                match self.pages[page].enter_level_text(row, level, &text) {
                    Ok(event) => self.after_edit(page, event),
                    Err(e) => {
                        tracing::debug!(error = %e, "ignored level entry");
                        self.status_message = Some(format!("ignored: {}", e));
                    }
                }
            }
        }
    }

    fn after_edit(&mut self, page: usize, event: Option<PageEvent>) {
        self.save_page(page);
        if let Some(PageEvent::RowReady(row)) = event {
            self.start_fade(page, row, Instant::now());
        }
    }

    fn save_page(&mut self, page: usize) {
        if let Err(e) = page_io::save_page(&self.data_dir, &self.pages[page]) {
            tracing::warn!(error = %e, "could not save page");
            self.status_message = Some(format!("save failed: {}", e));
        }
    }

    // -----------------------------------------------------------------------
    // Completion fades
    // -----------------------------------------------------------------------

    fn start_fade(&mut self, page: usize, row: usize, now: Instant) {
        if self.fades.iter().any(|f| f.page == page && f.row == row) {
            return;
        }
        tracing::info!(page = page + 1, row = row + 1, "row complete");
        self.fades.push(Fade {
            page,
            row,
            started: now,
        });
    }

    fn resume_ready_row(&mut self, page: usize, now: Instant) {
        if let Some(&row) = self.pages[page].ready_rows().first() {
            self.start_fade(page, row, now);
        }
    }

    fn complete_faded_row(&mut self, fade: Fade, now: Instant) {
        if self.pages[fade.page].complete_row(fade.row) {
            tracing::info!(page = fade.page + 1, row = fade.row + 1, "shifted rows up");
            self.save_page(fade.page);
        }
        self.resume_ready_row(fade.page, now);
    }

    /// Shift rows whose fade has run its course. Returns whether any did.
    pub fn tick(&mut self, now: Instant) -> bool {
        let duration = self.fade_duration;
        let (done, pending): (Vec<Fade>, Vec<Fade>) = std::mem::take(&mut self.fades)
            .into_iter()
            .partition(|f| now.saturating_duration_since(f.started) >= duration);
        self.fades = pending;
        let any = !done.is_empty();
        for fade in done {
            self.complete_faded_row(fade, now);
        }
        any
    }

    /// Complete every pending fade immediately (used on exit)
    pub fn finish_all_fades(&mut self) {
        let now = Instant::now();
        while let Some(fade) = self.fades.pop() {
            self.complete_faded_row(fade, now);
        }
    }

    /// Re-read a page that changed on disk, exactly as a fresh start would
    /// load it. Skipped while it is fading.
    pub fn reload_page(&mut self, page: usize) {
        if page >= self.pages.len() || self.is_fading(page) {
            return;
        }
        let mut fresh = Page::new(page, self.config.page_title(page));
        page_io::load_page(&self.data_dir, &mut fresh);
        if fresh != self.pages[page] {
            tracing::debug!(page = page + 1, "reloaded page from disk");
            self.pages[page] = fresh;
            self.resume_ready_row(page, Instant::now());
        }
    }
}

/// Run the TUI application
pub fn run(data_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = resolve_data_dir(data_dir)?;
    fs::create_dir_all(&data_dir)?;
    init_logging(&LogTarget::in_data_dir(&data_dir))?;
    let config = read_config(&data_dir)?;
    let pages = load_pages(&data_dir, &config);

    let mut app = App::new(data_dir.clone(), config, pages);

    let watcher = match PageWatcher::start(&data_dir) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "file watcher unavailable; external edits will not show");
            None
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, watcher.as_ref());

    // Rows mid-fade are shifted and saved rather than left complete on disk
    app.finish_all_fades();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    watcher: Option<&PageWatcher>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key(app, key),
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }

        if let Some(w) = watcher {
            for page in w.changed_pages() {
                app.reload_page(page);
            }
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::page_io::read_record;
    use crate::model::{PageRecord, RowData};
    use crate::tui::render::test_helpers::*;

    #[test]
    fn column_moves_are_clamped() {
        assert_eq!(Column::Task.prev(), Column::Task);
        assert_eq!(Column::Task.next(), Column::Level(0));
        assert_eq!(Column::Level(0).prev(), Column::Task);
        assert_eq!(Column::Level(2).next(), Column::Level(2));
    }

    #[test]
    fn stepping_a_level_saves_the_page() {
        let (dir, mut app) = test_app();
        app.cursor_col = Column::Level(1);
        app.step_focused_level(LevelStep::Up);
        assert_eq!(app.current_page().rows()[0].levels(), [0, 1, 0]);
        let record = read_record(dir.path(), "page_1").unwrap();
        assert_eq!(record.rows[0].levels, [0, 1, 0]);
    }

    #[test]
    fn stepping_at_a_bound_does_not_save() {
        let (dir, mut app) = test_app();
        app.cursor_col = Column::Level(0);
        app.step_focused_level(LevelStep::Down);
        assert!(read_record(dir.path(), "page_1").is_none());
    }

    #[test]
    fn stepping_on_task_column_does_nothing() {
        let (_dir, mut app) = test_app();
        app.step_focused_level(LevelStep::Up);
        assert!(app.current_page().rows()[0].is_empty());
    }

    #[test]
    fn completion_fades_then_shifts() {
        let (dir, mut app) = app_with_rows(&[
            ("A", [100, 100, 99]),
            ("B", [1, 2, 3]),
            ("C", [4, 5, 6]),
        ]);
        app.cursor_col = Column::Level(2);
        app.step_focused_level(LevelStep::Up);

        // Row is complete but not yet shifted
        assert_eq!(app.fades.len(), 1);
        assert_eq!(app.fades[0].row, 0);
        assert_eq!(app.current_page().rows()[0].task(), "A");

        // Edits are refused while fading
        app.step_focused_level(LevelStep::Down);
        assert_eq!(app.current_page().rows()[0].levels(), [100, 100, 100]);
        assert!(app.status_message.is_some());

        let started = app.fades[0].started;
        assert!(!app.tick(started + Duration::from_millis(10)));
        assert!(app.tick(started + app.fade_duration));
        assert!(app.fades.is_empty());

        let tasks: Vec<&str> = app.current_page().rows().iter().map(|r| r.task()).collect();
        assert_eq!(tasks, vec!["B", "C", ""]);
        let record = read_record(dir.path(), "page_1").unwrap();
        assert_eq!(record.rows[0], RowData::new("B", [1, 2, 3]));
        assert_eq!(record.rows[2], RowData::default());
    }

    #[test]
    fn row_opacity_falls_during_fade() {
        let (_dir, mut app) = app_with_rows(&[("A", [100, 100, 99])]);
        app.cursor_col = Column::Level(2);
        app.step_focused_level(LevelStep::Up);
        let started = app.fades[0].started;
        assert_eq!(app.row_opacity(0, 1, started), 1.0);
        assert_eq!(app.row_opacity(0, 0, started), 1.0);
        let half = app.row_opacity(0, 0, started + app.fade_duration / 2);
        assert!(half > 0.4 && half < 0.6);
        assert_eq!(app.row_opacity(0, 0, started + app.fade_duration * 2), 0.0);
    }

    #[test]
    fn ready_rows_resume_on_startup() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut page = Page::new(0, "Page 1");
        page.apply_record(&PageRecord {
            title: None,
            rows: vec![RowData::new("Done", [100, 100, 100]), RowData::new("Next", [5, 5, 5])],
        });
        let pages = vec![page, Page::new(1, "Page 2"), Page::new(2, "Page 3")];
        let mut app = App::new(dir.path().to_path_buf(), AppConfig::default(), pages);
        assert_eq!(app.fades.len(), 1);

        app.finish_all_fades();
        assert_eq!(app.current_page().rows()[0].task(), "Next");
        assert!(app.fades.is_empty());
    }

    #[test]
    fn commit_level_entry() {
        let (_dir, mut app) = test_app();
        app.cursor_col = Column::Level(0);
        app.begin_cell_edit(Some('7'));
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.edit_buffer, "7");
        app.edit_buffer.push('5');
        app.commit_edit();
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.current_page().rows()[0].levels(), [75, 0, 0]);
    }

    #[test]
    fn rejected_level_entry_keeps_value() {
        let (_dir, mut app) = app_with_rows(&[("A", [10, 0, 0])]);
        app.cursor_col = Column::Level(0);
        app.begin_cell_edit(None);
        assert_eq!(app.edit_buffer, "10");
        app.edit_buffer = "lots".into();
        app.commit_edit();
        assert_eq!(app.current_page().rows()[0].levels(), [10, 0, 0]);
        assert_eq!(
            app.status_message.as_deref(),
            Some("ignored: 'lots' is not a number")
        );

        app.begin_cell_edit(None);
        app.edit_buffer = "250".into();
        app.commit_edit();
        assert_eq!(app.current_page().rows()[0].levels(), [10, 0, 0]);
    }

    #[test]
    fn commit_task_and_title() {
        let (dir, mut app) = test_app();
        app.cursor_row = 1;
        app.begin_cell_edit(None);
        app.edit_buffer = "Meditate".into();
        app.commit_edit();
        app.begin_title_edit();
        assert_eq!(app.edit_buffer, "Page 1");
        app.edit_buffer = "Mind".into();
        app.commit_edit();

        let record = read_record(dir.path(), "page_1").unwrap();
        assert_eq!(record.title.as_deref(), Some("Mind"));
        assert_eq!(record.rows[1].task, "Meditate");
    }

    #[test]
    fn cancel_edit_changes_nothing() {
        let (dir, mut app) = test_app();
        app.begin_title_edit();
        app.edit_buffer = "Nope".into();
        app.cancel_edit();
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.current_page().title(), "Page 1");
        assert!(read_record(dir.path(), "page_1").is_none());
    }

    #[test]
    fn pages_are_clamped() {
        let (_dir, mut app) = test_app();
        app.prev_page();
        assert_eq!(app.current_page_index(), 0);
        app.next_page();
        app.next_page();
        app.next_page();
        assert_eq!(app.current_page_index(), 2);
        assert_eq!(app.current_page().title(), "Page 3");
    }

    #[test]
    fn swipe_changes_page() {
        let (_dir, mut app) = test_app();
        app.swipe_start(70);
        app.swipe_end(10);
        assert_eq!(app.current_page_index(), 1);
        app.swipe_start(10);
        app.swipe_end(40);
        assert_eq!(app.current_page_index(), 1);
        app.swipe_start(0);
        app.swipe_end(60);
        assert_eq!(app.current_page_index(), 0);
    }

    #[test]
    fn reload_picks_up_external_edits() {
        let (dir, mut app) = test_app();
        let mut other = Page::new(1, "Page 2");
        other.set_title("From CLI");
        page_io::save_page(dir.path(), &other).unwrap();
        app.reload_page(1);
        assert_eq!(app.pages[1].title(), "From CLI");
        app.reload_page(99);
    }

    #[test]
    fn reload_of_short_record_resets_missing_rows() {
        let (dir, mut app) = app_with_rows(&[
            ("A", [1, 1, 1]),
            ("B", [2, 2, 2]),
            ("C", [3, 3, 3]),
        ]);
        std::fs::write(
            page_io::page_path(dir.path(), "page_1"),
            r#"{"title":"X","rows":[{"task":"Only","levels":[4,5,6]}]}"#,
        )
        .unwrap();
        app.reload_page(0);

        let mut loaded = Page::new(0, "Page 1");
        page_io::load_page(dir.path(), &mut loaded);
        assert_eq!(app.pages[0], loaded);
        let tasks: Vec<&str> = app.pages[0].rows().iter().map(|r| r.task()).collect();
        assert_eq!(tasks, vec!["Only", "", ""]);
        assert_eq!(app.pages[0].title(), "X");
    }

    #[test]
    fn reload_of_deleted_record_shows_defaults() {
        let (dir, mut app) = test_app();
        app.cursor_row = 1;
        app.begin_cell_edit(None);
        app.edit_buffer = "Stretch".into();
        app.commit_edit();
        let path = page_io::page_path(dir.path(), "page_1");
        assert!(path.exists());

        std::fs::remove_file(&path).unwrap();
        app.reload_page(0);
        assert_eq!(app.pages[0], Page::new(0, "Page 1"));
    }

    #[test]
    fn reload_waits_for_fade() {
        let (dir, mut app) = app_with_rows(&[("A", [100, 100, 99])]);
        app.cursor_col = Column::Level(2);
        app.step_focused_level(LevelStep::Up);
        std::fs::remove_file(page_io::page_path(dir.path(), "page_1")).unwrap();
        app.reload_page(0);
        assert_eq!(app.pages[0].rows()[0].task(), "A");
    }
}
