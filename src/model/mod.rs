pub mod config;
pub mod navigation;
pub mod page;
pub mod row;

pub use config::*;
pub use navigation::*;
pub use page::*;
pub use row::*;
