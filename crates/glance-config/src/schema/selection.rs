//! Selection qualification limits.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Longest selection (in characters) that may be looked up.
    pub max_chars: usize,
    /// Word limit for the double-click gesture.
    pub double_click_max_words: usize,
    /// Word limit for the Alt + select gesture.
    pub extended_max_words: usize,
    /// Settle time before an Alt + select is acted on.
    pub debounce_ms: u64,
    /// Number of extracted contexts remembered per page.
    pub context_cache_capacity: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_chars: 500,
            double_click_max_words: 1,
            extended_max_words: 3,
            debounce_ms: 50,
            context_cache_capacity: 256,
        }
    }
}

impl SelectionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
