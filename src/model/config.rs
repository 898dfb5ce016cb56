use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::page::default_title;

/// Configuration from project300.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pages: PagesConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Built-in titles by page position. Missing or blank entries fall back
    /// to "Page N".
    #[serde(default)]
    pub titles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// How long a completed row fades before the rows shift (milliseconds)
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
    /// Theme color overrides, e.g. `background = "#993F1A"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            fade_ms: default_fade_ms(),
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fade_ms() -> u64 {
    500
}

impl AppConfig {
    /// The built-in title for a page: configured if set, else "Page N"
    pub fn page_title(&self, index: usize) -> String {
        self.pages
            .titles
            .get(index)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_title(index))
    }
}
