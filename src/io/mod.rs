pub mod config_io;
pub mod logging;
pub mod page_io;
pub mod watcher;
