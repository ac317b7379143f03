//! Wire protocol between the page overlay and the host process.
//!
//! Outbound messages are JSON objects tagged by a `type` field with
//! SCREAMING_SNAKE_CASE kinds; payload fields are camelCase. Replies are
//! untyped JSON on the transport and decoded here.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

/// A request sent to the host process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostMessage {
    /// Liveness probe. The host answers `{"status": "ok"}`.
    Ping,
    /// Look up the selected text.
    WordClicked(WordLookup),
    /// Translate an earlier definition into another language.
    TranslateDefinition(TranslateRequest),
}

impl HostMessage {
    /// The `type` tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ping => "PING",
            Self::WordClicked(_) => "WORD_CLICKED",
            Self::TranslateDefinition(_) => "TRANSLATE_DEFINITION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordLookup {
    pub word: String,
    /// Extracted context as a JSON string, or the raw selection on fallback.
    pub context: String,
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub url: String,
    pub title: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub word: String,
    pub original_definition: String,
    pub context: String,
    pub target_language: String,
    pub preserve_context: bool,
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingReply {
    pub status: String,
}

impl PingReply {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Reply to `WORD_CLICKED` and `TRANSLATE_DEFINITION`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataReply {
    #[serde(default)]
    pub data: Option<DefinitionData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DataReply {
    /// The payload, or the host's error message when there is none.
    pub fn into_result(self) -> Result<DefinitionData, String> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(error),
            (None, None) => Err("empty reply".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionData {
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
}

// ---------------------------------------------------------------------------
// Inbound notifications
// ---------------------------------------------------------------------------

/// Unsolicited messages pushed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostNotification {
    TabActivated,
    TabReady,
    #[serde(other)]
    Unknown,
}

impl HostNotification {
    /// Parse a raw notification; malformed input maps to `None`.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
