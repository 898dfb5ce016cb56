use serde::Serialize;

use crate::model::page::Page;
use crate::model::row::{LEVEL_COUNT, Row, RowData};
use crate::util::unicode::fit_to_width;

/// Width of the task column in text output
const TASK_WIDTH: usize = 24;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct PageJson {
    pub page: usize,
    pub id: String,
    pub title: String,
    pub rows: Vec<RowJson>,
}

#[derive(Serialize)]
pub struct RowJson {
    #[serde(flatten)]
    pub data: RowData,
    pub stars: [bool; LEVEL_COUNT],
    pub complete: bool,
}

pub fn page_to_json(page: &Page) -> PageJson {
    PageJson {
        page: page.index() + 1,
        id: page.id(),
        title: page.title().to_string(),
        rows: page
            .rows()
            .iter()
            .map(|row| RowJson {
                data: row.data(),
                stars: row.stars(),
                complete: row.is_complete(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One level cell: `[ 40 ]`, or `[100*]` when starred
fn format_level(value: u8, star: bool) -> String {
    format!("[{:>3}{}]", value, if star { "*" } else { " " })
}

pub fn format_row(number: usize, row: &Row) -> String {
    let task = if row.task().is_empty() { "-" } else { row.task() };
    let levels: Vec<String> = row
        .levels()
        .iter()
        .zip(row.stars())
        .map(|(&v, s)| format_level(v, s))
        .collect();
    format!("  {}. {} {}", number, fit_to_width(task, TASK_WIDTH), levels.join(" "))
        .trim_end()
        .to_string()
}

pub fn format_page(page: &Page) -> String {
    let mut lines = vec![format!("Page {}: {}", page.index() + 1, page.title())];
    for (i, row) in page.rows().iter().enumerate() {
        lines.push(format_row(i + 1, row));
    }
    lines.join("\n")
}
