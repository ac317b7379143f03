#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the opaque host message channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The host process cannot be reached at all (extension context gone).
    #[error("host unavailable: {0}")]
    HostUnavailable(String),

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("invalid reply: {0}")]
    InvalidReply(String),
}

impl TransportError {
    /// Whether the failure means the host is gone rather than flaky.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::HostUnavailable(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to initialize {0}")]
    MissingElement(String),

    #[error("surface error: {0}")]
    Surface(String),
}

#[derive(Debug, thiserror::Error)]
pub enum GlanceError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("bridge error: {0}")]
    Bridge(String),

    #[error("selection error: {0}")]
    Selection(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("connection.max_reconnect_attempts".into());
        assert_eq!(
            err.to_string(),
            "config validation error: connection.max_reconnect_attempts"
        );
    }

    #[test]
    fn transport_error_display() {
        let err = TransportError::HostUnavailable("Extension not available".into());
        assert_eq!(err.to_string(), "host unavailable: Extension not available");
        assert!(err.is_unavailable());

        let err = TransportError::SendFailed("port closed".into());
        assert_eq!(err.to_string(), "send failed: port closed");
        assert!(!err.is_unavailable());
    }

    #[test]
    fn render_error_names_the_element() {
        let err = RenderError::MissingElement("close button".into());
        assert_eq!(err.to_string(), "Failed to initialize close button");
    }

    #[test]
    fn glance_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: GlanceError = config_err.into();
        assert!(matches!(err, GlanceError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn glance_error_from_transport() {
        let err: GlanceError = TransportError::SendFailed("timeout".into()).into();
        assert!(matches!(err, GlanceError::Transport(_)));
        assert_eq!(err.to_string(), "send failed: timeout");
    }

    #[test]
    fn glance_error_other_variants() {
        let err = GlanceError::Bridge("retries exhausted".into());
        assert_eq!(err.to_string(), "bridge error: retries exhausted");

        let err = GlanceError::Selection("too long".into());
        assert_eq!(err.to_string(), "selection error: too long");

        let err = GlanceError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
