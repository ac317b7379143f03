//! TOML override loading.

use crate::schema::GlanceConfig;
use glance_common::ConfigError;
use tracing::debug;

/// Parse a (possibly partial) TOML document over the compiled-in defaults.
///
/// Validation is left to the caller.
pub fn load_from_str(content: &str) -> Result<GlanceConfig, ConfigError> {
    let config: GlanceConfig = toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;
    debug!("applied config overrides");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = load_from_str("").unwrap();
        assert_eq!(config.connection.reconnect_delay_ms, 2_000);
        assert_eq!(config.popup.estimated_width, 350.0);
        assert_eq!(config.languages.len(), 6);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = load_from_str(
            r#"
[connection]
ping_interval_ms = 5000

[popup]
edge_margin = 8.0
"#,
        )
        .unwrap();
        assert_eq!(config.connection.ping_interval_ms, 5_000);
        assert_eq!(config.connection.stale_after_ms, 30_000);
        assert_eq!(config.popup.edge_margin, 8.0);
        assert_eq!(config.popup.anchor_offset, 10.0);
    }

    #[test]
    fn languages_can_be_replaced() {
        let config = load_from_str(
            r#"
[[languages]]
code = "en"
name = "English"

[[languages]]
code = "ja"
name = "Japanese"
"#,
        )
        .unwrap();
        assert_eq!(config.languages.len(), 2);
        assert_eq!(config.languages.name("ja"), Some("Japanese"));
    }

    #[test]
    fn invalid_toml_returns_parse_error() {
        let err = load_from_str("this is not valid toml {{{").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
