//! Selection qualification rules.

use glance_common::GlanceError;
use glance_config::SelectionConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("selection is empty")]
    Empty,

    #[error("Selection too long. Please select less than {max} characters.")]
    TooLong { len: usize, max: usize },
}

impl From<SelectionError> for GlanceError {
    fn from(e: SelectionError) -> Self {
        GlanceError::Selection(e.to_string())
    }
}

/// Number of words in `text`.
///
/// Words are whitespace-delimited; a hyphenated compound counts once and a
/// token made only of hyphens does not count at all.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| !token.chars().all(|c| c == '-'))
        .count()
}

/// Trim `raw` and check it can be looked up at all.
pub fn validate_selection<'a>(
    raw: &'a str,
    config: &SelectionConfig,
) -> Result<&'a str, SelectionError> {
    let text = raw.trim();
    if text.replace('-', " ").trim().is_empty() {
        return Err(SelectionError::Empty);
    }
    let len = text.chars().count();
    if len > config.max_chars {
        return Err(SelectionError::TooLong {
            len,
            max: config.max_chars,
        });
    }
    Ok(text)
}

/// The page gesture that produced a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Double click; single words only.
    DoubleClick,
    /// Primary-button mouse-up with Alt held; short phrases.
    Extended,
}

impl Gesture {
    pub fn max_words(self, config: &SelectionConfig) -> usize {
        match self {
            Self::DoubleClick => config.double_click_max_words,
            Self::Extended => config.extended_max_words,
        }
    }

    /// Whether the (trimmed) selection has an acceptable word count for
    /// this gesture.
    pub fn accepts(self, text: &str, config: &SelectionConfig) -> bool {
        let words = word_count(text);
        words >= 1 && words <= self.max_words(config)
    }
}
