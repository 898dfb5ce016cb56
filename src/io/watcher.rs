use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use super::page_io::page_index_for_path;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug)]
pub enum FileEvent {
    /// One or more page records changed on disk.
    Changed(Vec<PathBuf>),
}

/// A file system watcher for the data directory.
pub struct PageWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl PageWatcher {
    /// Start watching page records in `data_dir`. The event loop drains it
    /// with `changed_pages()` each tick.
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                // Temp files from atomic writes never match a page name
                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| page_index_for_path(p).is_some())
                    .collect();

                if !relevant.is_empty() {
                    let _ = tx.send(FileEvent::Changed(relevant));
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(PageWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending file events.
    fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Page indices touched by the pending events, deduplicated and sorted
    pub fn changed_pages(&self) -> Vec<usize> {
        let mut pages: Vec<usize> = self
            .poll()
            .into_iter()
            .flat_map(|FileEvent::Changed(paths)| paths)
            .filter_map(|p| page_index_for_path(&p))
            .collect();
        pages.sort_unstable();
        pages.dedup();
        pages
    }
}
