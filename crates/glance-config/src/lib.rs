//! Glance configuration.
//!
//! Every tunable of the overlay (connection timings, selection limits,
//! popup placement, language catalog) lives here as a compiled-in default.
//! Embedders may pass a partial TOML override; all sections use
//! `serde(default)` so missing fields keep their defaults.
//!
//! # Quick Start
//!
//! ```rust
//! use glance_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("defaults always validate");
//! assert_eq!(config.connection.max_reconnect_attempts, 3);
//! let json = config_to_json(&config);
//! assert!(json.contains("\"languages\""));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    ConnectionConfig, GlanceConfig, LangCode, LanguageCatalog, LanguageEntry, LookupConfig,
    PopupConfig, SelectionConfig, DEFAULT_LANGUAGE,
};

use glance_common::ConfigError;

/// Build the effective config: defaults, optionally overridden by a TOML
/// document, then validated.
pub fn load_config(overrides: Option<&str>) -> Result<GlanceConfig, ConfigError> {
    let config = match overrides {
        Some(toml) => toml_loader::load_from_str(toml)?,
        None => GlanceConfig::default(),
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &GlanceConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
