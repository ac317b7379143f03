//! Context extraction around a selection.
//!
//! The host gets a short description of where the selection sits on the
//! page: structural markers (headings, list items, sections) and the
//! sentences around it, taken from the enclosing paragraph.

use std::collections::{HashMap, VecDeque};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sentence boundary: terminal punctuation followed by whitespace.
static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("static regex pattern must compile"));

/// Sentences kept on each side of the one containing the selection.
const SENTENCE_WINDOW: usize = 2;

/// One element on the path from the selection up to the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AncestorNode {
    /// Element tag name, e.g. `P`, `LI`, `H2`.
    pub tag: String,
    pub role: Option<String>,
    /// Text content of the element.
    pub text: String,
    pub parent_tag: Option<String>,
    /// Text of the first heading inside this element, if any.
    pub first_heading: Option<String>,
}

impl AncestorNode {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_parent(mut self, parent_tag: impl Into<String>) -> Self {
        self.parent_tag = Some(parent_tag.into());
        self
    }

    pub fn with_first_heading(mut self, heading: impl Into<String>) -> Self {
        self.first_heading = Some(heading.into());
        self
    }

    fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    fn is_heading(&self) -> bool {
        let tag = self.tag.as_bytes();
        tag.len() == 2 && tag[0].eq_ignore_ascii_case(&b'h') && (b'1'..=b'6').contains(&tag[1])
    }

    fn is_section(&self) -> bool {
        self.is("ARTICLE") || self.is("SECTION") || self.role.as_deref() == Some("article")
    }

    fn is_paragraph(&self) -> bool {
        self.is("P") || self.is("DIV")
    }
}

/// Where a selection sits on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionContext {
    /// Structural markers joined by `" > "`.
    pub structure: String,
    /// Up to two sentences either side of the selection, joined by `". "`.
    pub sentences: String,
    /// Index of the containing sentence over the sentence count.
    pub position: f64,
}

impl SelectionContext {
    /// JSON form sent to the host.
    pub fn to_payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Build the context for `selected` from its ancestors, innermost first.
///
/// Returns `None` when there is no enclosing paragraph or no sentence in
/// it contains the selection.
pub fn extract_context(selected: &str, ancestors: &[AncestorNode]) -> Option<SelectionContext> {
    let mut markers: VecDeque<String> = VecDeque::new();
    let mut paragraph = None;

    for node in ancestors {
        if node.is_heading() {
            markers.push_front(format!("Heading: {}", node.text.trim()));
        }
        if node.is("LI") {
            let ordered = node
                .parent_tag
                .as_deref()
                .is_some_and(|parent| parent.eq_ignore_ascii_case("OL"));
            let kind = if ordered { "Numbered list" } else { "Bullet list" };
            markers.push_back(format!("{kind} item"));
        }
        if node.is_section() {
            if let Some(title) = &node.first_heading {
                markers.push_front(format!("Section: {}", title.trim()));
            }
        }
        if node.is_paragraph() {
            paragraph = Some(node.text.as_str());
            break;
        }
    }

    let paragraph = paragraph?;
    let sentences: Vec<&str> = SENTENCE_RE.split(paragraph).collect();
    let index = sentences.iter().position(|s| s.contains(selected))?;

    let start = index.saturating_sub(SENTENCE_WINDOW);
    let end = (index + SENTENCE_WINDOW + 1).min(sentences.len());

    Some(SelectionContext {
        structure: Vec::from(markers).join(" > "),
        sentences: sentences[start..end].join(". ").trim().to_string(),
        position: index as f64 / sentences.len() as f64,
    })
}

/// Context string for a lookup request: the JSON context when one could be
/// built, otherwise the raw selection.
pub fn context_payload(selected: &str, context: Option<&SelectionContext>) -> String {
    context
        .and_then(|c| c.to_payload().ok())
        .unwrap_or_else(|| selected.to_string())
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Bounded map from selected text to its last extracted context. When full
/// the oldest entry is evicted.
#[derive(Debug)]
pub struct ContextCache {
    capacity: usize,
    entries: HashMap<String, SelectionContext>,
    order: VecDeque<String>,
}

impl ContextCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, text: &str) -> Option<&SelectionContext> {
        self.entries.get(text)
    }

    pub fn insert(&mut self, text: &str, context: SelectionContext) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(text.to_string(), context).is_some() {
            return;
        }
        self.order.push_back(text.to_string());
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                debug!(evicted = %oldest, "context cache full");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
