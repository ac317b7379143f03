//! Translation target languages.

use serde::{Deserialize, Serialize};

/// Language code used on the wire (`en`, `hi-en`, ...).
pub type LangCode = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub code: LangCode,
    pub name: String,
}

/// Ordered code → display name mapping offered in the popup selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCatalog {
    entries: Vec<LanguageEntry>,
}

/// Code used when neither the host nor the user picked a language.
pub const DEFAULT_LANGUAGE: &str = "en";

impl Default for LanguageCatalog {
    fn default() -> Self {
        let entries = [
            ("en", "English"),
            ("es", "Spanish"),
            ("hi", "Hindi"),
            ("hi-en", "Hinglish"),
            ("fr", "French"),
            ("de", "German"),
        ]
        .into_iter()
        .map(|(code, name)| LanguageEntry {
            code: code.into(),
            name: name.into(),
        })
        .collect();
        Self { entries }
    }
}

impl LanguageCatalog {
    pub fn new(entries: Vec<LanguageEntry>) -> Self {
        Self { entries }
    }

    /// Display name for a code, if the code is known.
    pub fn name(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.name.as_str())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.name(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
