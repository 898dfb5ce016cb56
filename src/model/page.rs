use serde::{Deserialize, Serialize};

use super::row::{LevelChange, LevelInputError, Row, RowData};

/// Number of pages in the tracker
pub const PAGE_COUNT: usize = 3;

/// Number of task rows on every page
pub const ROWS_PER_PAGE: usize = 3;

/// Persisted identifier for a page index (`page_1`, `page_2`, ...)
pub fn page_id(index: usize) -> String {
    format!("page_{}", index + 1)
}

/// Built-in title for a page index
pub fn default_title(index: usize) -> String {
    format!("Page {}", index + 1)
}

/// On-disk shape of a page: `{title, rows: [{task, levels}]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Absent in the record means "use the page's built-in title"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub rows: Vec<RowData>,
}

/// Something the UI has to act on after a page edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// Row `k` just reached all three stars and is ready to be cleared
    RowReady(usize),
}

/// A page: a title and a fixed number of task rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    index: usize,
    default_title: String,
    title: String,
    rows: [Row; ROWS_PER_PAGE],
}

impl Page {
    /// A page at its defaults, titled with `default_title`
    pub fn new(index: usize, default_title: impl Into<String>) -> Self {
        let default_title = default_title.into();
        Page {
            index,
            title: default_title.clone(),
            default_title,
            rows: Default::default(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> String {
        page_id(self.index)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn set_task(&mut self, row: usize, task: impl Into<String>) -> bool {
        match self.rows.get_mut(row) {
            Some(r) => {
                r.set_task(task);
                true
            }
            None => false,
        }
    }

    pub fn set_level(&mut self, row: usize, level: usize, value: i64) -> Option<PageEvent> {
        let change = self.rows.get_mut(row)?.set_level(level, value);
        ready_event(row, change)
    }

    pub fn increment(&mut self, row: usize, level: usize) -> Option<PageEvent> {
        let change = self.rows.get_mut(row)?.increment(level);
        ready_event(row, change)
    }

    pub fn decrement(&mut self, row: usize, level: usize) -> Option<PageEvent> {
        let change = self.rows.get_mut(row)?.decrement(level);
        ready_event(row, change)
    }

    /// Typed level entry. An unknown row is treated as "nothing happened".
    pub fn enter_level_text(
        &mut self,
        row: usize,
        level: usize,
        text: &str,
    ) -> Result<Option<PageEvent>, LevelInputError> {
        let Some(r) = self.rows.get_mut(row) else {
            return Ok(None);
        };
        let change = r.enter_level_text(level, text)?;
        Ok(ready_event(row, change))
    }

    /// Rows that are sitting in the complete state, e.g. after loading a
    /// page that was saved while its row was still fading out.
    pub fn ready_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_complete())
            .map(|(i, _)| i)
            .collect()
    }

    /// Clear row `k`, shift every row below it up by one, and clear the last
    /// row. Returns false (and changes nothing) if `k` is not a row.
    /// The caller is responsible for persisting the page afterwards.
    pub fn complete_row(&mut self, k: usize) -> bool {
        let len = self.rows.len();
        if k >= len {
            return false;
        }
        self.rows[k].clear();
        for i in k + 1..len {
            let data = self.rows[i].data();
            self.rows[i - 1].set_data(&data);
        }
        self.rows[len - 1].clear();
        true
    }

    pub fn record(&self) -> PageRecord {
        PageRecord {
            title: Some(self.title.clone()),
            rows: self.rows.iter().map(Row::data).collect(),
        }
    }

    /// Restore from a persisted record. Rows beyond the record keep their
    /// current contents; extra persisted rows are ignored.
    pub fn apply_record(&mut self, record: &PageRecord) {
        self.title = record
            .title
            .clone()
            .unwrap_or_else(|| self.default_title.clone());
        for (row, data) in self.rows.iter_mut().zip(&record.rows) {
            row.set_data(data);
        }
    }
}

fn ready_event(row: usize, change: LevelChange) -> Option<PageEvent> {
    match change {
        LevelChange::Completed => Some(PageEvent::RowReady(row)),
        LevelChange::Changed | LevelChange::Unchanged => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(tasks: &[(&str, [u8; 3])]) -> Page {
        let mut page = Page::new(0, "Page 1");
        page.apply_record(&PageRecord {
            title: Some("Habits".into()),
            rows: tasks
                .iter()
                .map(|(task, levels)| RowData::new(*task, *levels))
                .collect(),
        });
        page
    }

    fn tasks(page: &Page) -> Vec<&str> {
        page.rows().iter().map(|r| r.task()).collect()
    }

    #[test]
    fn ids_and_default_titles() {
        assert_eq!(page_id(0), "page_1");
        assert_eq!(page_id(2), "page_3");
        assert_eq!(default_title(1), "Page 2");
        let page = Page::new(1, default_title(1));
        assert_eq!(page.id(), "page_2");
        assert_eq!(page.title(), "Page 2");
        assert!(page.rows().iter().all(Row::is_empty));
    }

    #[test]
    fn completing_three_levels_signals_once() {
        let mut page = page_with(&[("A", [0, 0, 0])]);
        assert_eq!(page.set_level(0, 0, 100), None);
        assert_eq!(page.set_level(0, 1, 100), None);
        assert_eq!(page.set_level(0, 2, 100), Some(PageEvent::RowReady(0)));
        assert_eq!(page.set_level(0, 2, 100), None);
        assert_eq!(page.increment(0, 0), None);
    }

    #[test]
    fn increment_reports_ready_row() {
        let mut page = page_with(&[("A", [0, 0, 0]), ("B", [100, 99, 100])]);
        assert_eq!(page.increment(1, 1), Some(PageEvent::RowReady(1)));
        assert_eq!(page.ready_rows(), vec![1]);
    }

    #[test]
    fn complete_first_row_shifts_rows_up() {
        let mut page = page_with(&[("A", [100, 100, 100]), ("B", [1, 2, 3]), ("C", [4, 5, 6])]);
        assert!(page.complete_row(0));
        assert_eq!(tasks(&page), vec!["B", "C", ""]);
        assert_eq!(page.rows()[0].levels(), [1, 2, 3]);
        assert_eq!(page.rows()[1].levels(), [4, 5, 6]);
        assert!(page.rows()[2].is_empty());
        assert_eq!(page.title(), "Habits");
    }

    #[test]
    fn complete_middle_row_leaves_rows_above() {
        let mut page = page_with(&[("A", [7, 7, 7]), ("B", [100, 100, 100]), ("C", [4, 5, 6])]);
        page.complete_row(1);
        assert_eq!(tasks(&page), vec!["A", "C", ""]);
        assert_eq!(page.rows()[0].levels(), [7, 7, 7]);
        assert_eq!(page.rows()[1].levels(), [4, 5, 6]);
    }

    #[test]
    fn complete_last_row_only_clears_it() {
        let mut page = page_with(&[("A", [1, 1, 1]), ("B", [2, 2, 2]), ("C", [100, 100, 100])]);
        page.complete_row(2);
        assert_eq!(tasks(&page), vec!["A", "B", ""]);
        assert_eq!(page.rows()[0].levels(), [1, 1, 1]);
        assert_eq!(page.rows()[1].levels(), [2, 2, 2]);
        assert!(page.rows()[2].is_empty());
    }

    #[test]
    fn complete_row_out_of_range_is_noop() {
        let mut page = page_with(&[("A", [1, 1, 1])]);
        let before = page.clone();
        assert!(!page.complete_row(ROWS_PER_PAGE));
        assert_eq!(page, before);
    }

    #[test]
    fn edits_on_unknown_rows_do_nothing() {
        let mut page = Page::new(0, "Page 1");
        assert_eq!(page.set_level(7, 0, 100), None);
        assert!(!page.set_task(7, "x"));
        assert_eq!(page.enter_level_text(7, 0, "50"), Ok(None));
    }

    #[test]
    fn typed_entry_errors_leave_page_untouched() {
        let mut page = page_with(&[("A", [10, 10, 10])]);
        assert!(page.enter_level_text(0, 0, "ten").is_err());
        assert!(page.enter_level_text(0, 0, "900").is_err());
        assert_eq!(page.rows()[0].levels(), [10, 10, 10]);
        assert_eq!(page.enter_level_text(0, 0, "11"), Ok(None));
        assert_eq!(page.rows()[0].levels(), [11, 10, 10]);
    }

    #[test]
    fn record_round_trips_into_fresh_page() {
        let page = page_with(&[("A", [1, 2, 3]), ("B", [100, 0, 50]), ("C", [0, 0, 99])]);
        let record = page.record();
        let mut fresh = Page::new(0, "Page 1");
        fresh.apply_record(&record);
        assert_eq!(fresh, page);
    }

    #[test]
    fn short_record_leaves_remaining_rows_default() {
        let mut page = Page::new(0, "Page 1");
        page.apply_record(&PageRecord {
            title: None,
            rows: vec![RowData::new("Only", [5, 5, 5])],
        });
        assert_eq!(page.title(), "Page 1");
        assert_eq!(page.rows()[0].task(), "Only");
        assert!(page.rows()[1].is_empty());
        assert!(page.rows()[2].is_empty());
    }

    #[test]
    fn long_record_ignores_extra_rows() {
        let mut page = Page::new(0, "Page 1");
        let rows = (0..5).map(|i| RowData::new(format!("T{i}"), [1, 1, 1])).collect();
        page.apply_record(&PageRecord { title: Some("X".into()), rows });
        assert_eq!(tasks(&page), vec!["T0", "T1", "T2"]);
    }

    #[test]
    fn record_json_shape() {
        let page = page_with(&[("A", [1, 2, 3])]);
        let value = serde_json::to_value(page.record()).unwrap();
        assert_eq!(value["title"], "Habits");
        assert_eq!(value["rows"][0]["task"], "A");
        assert_eq!(value["rows"][0]["levels"], serde_json::json!([1, 2, 3]));
        assert_eq!(value["rows"].as_array().unwrap().len(), ROWS_PER_PAGE);
    }
}
