use serde::{Deserialize, Serialize};
use std::fmt;

/// Short hex id used to correlate a host request with its log lines.
pub fn new_correlation_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Identifies one popup instance. Tokens only ever increase, so a reply
/// carrying an older token belongs to a popup that no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub u64);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "popup-{}", self.0)
    }
}

/// Monotonic source of [`SessionToken`]s.
#[derive(Debug)]
pub struct TokenSource {
    next: u64,
}

impl TokenSource {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_token(&mut self) -> SessionToken {
        let token = SessionToken(self.next);
        self.next += 1;
        token
    }
}

impl Default for TokenSource {
    fn default() -> Self {
        Self::new()
    }
}
