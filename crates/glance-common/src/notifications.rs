use std::time::Duration;

/// Severity of a transient page banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    Info,
    Error,
}

/// A transient, non-blocking message shown on the page.
///
/// The surface is responsible for removing it once `ttl` has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
    pub ttl: Duration,
}

impl Banner {
    /// Creates an info banner with a 3-second TTL.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Info,
            message: message.into(),
            ttl: Duration::from_secs(3),
        }
    }

    /// Creates an error banner with a 3-second TTL.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Error,
            message: message.into(),
            ttl: Duration::from_secs(3),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}
