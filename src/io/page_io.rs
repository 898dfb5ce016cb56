use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::config::AppConfig;
use crate::model::page::{PAGE_COUNT, Page, PageRecord, page_id};

/// Error type for page persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not encode page record: {0}")]
    EncodeError(#[from] serde_json::Error),
}

/// The directory given on the command line, or the current directory
pub fn resolve_data_dir(dir: Option<&Path>) -> io::Result<PathBuf> {
    match dir {
        Some(d) => Ok(d.to_path_buf()),
        None => std::env::current_dir(),
    }
}

/// Path of the record for a page identifier, e.g. `page_page_1.json`
pub fn page_path(data_dir: &Path, page_id: &str) -> PathBuf {
    data_dir.join(format!("page_{}.json", page_id))
}

/// Reverse of `page_path`: which page index a file belongs to
pub fn page_index_for_path(path: &Path) -> Option<usize> {
    let name = path.file_name()?.to_str()?;
    (0..PAGE_COUNT).find(|&i| name == format!("page_{}.json", page_id(i)))
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Persist the whole page, replacing any previous record
pub fn save_page(data_dir: &Path, page: &Page) -> Result<(), StoreError> {
    let path = page_path(data_dir, &page.id());
    let content = serde_json::to_string_pretty(&page.record())?;
    fs::create_dir_all(data_dir)
        .and_then(|()| atomic_write(&path, content.as_bytes()))
        .map_err(|e| StoreError::WriteError {
            path: path.clone(),
            source: e,
        })?;
    tracing::debug!(page = %page.id(), path = %path.display(), "saved page");
    Ok(())
}

/// Read a page record. A missing file is "no prior state"; an unreadable or
/// malformed one is logged and treated the same way.
pub fn read_record(data_dir: &Path, page_id: &str) -> Option<PageRecord> {
    let path = page_path(data_dir, page_id);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read page record");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed page record");
            None
        }
    }
}

/// Load persisted state into `page`. Returns whether a record was applied.
pub fn load_page(data_dir: &Path, page: &mut Page) -> bool {
    match read_record(data_dir, &page.id()) {
        Some(record) => {
            page.apply_record(&record);
            tracing::debug!(page = %page.id(), "loaded page");
            true
        }
        None => false,
    }
}

/// Build every page from its configured defaults, then load what is on disk
pub fn load_pages(data_dir: &Path, config: &AppConfig) -> Vec<Page> {
    (0..PAGE_COUNT)
        .map(|i| {
            let mut page = Page::new(i, config.page_title(i));
            load_page(data_dir, &mut page);
            page
        })
        .collect()
}
