//! Full configuration validation.
//!
//! Each section has its own validator; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod connection;
mod helpers;
mod overlay;


use crate::schema::GlanceConfig;
use glance_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &GlanceConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    connection::validate_connection(&mut errors, config);
    overlay::validate_selection(&mut errors, config);
    overlay::validate_popup(&mut errors, config);
    overlay::validate_lookup(&mut errors, config);
    overlay::validate_languages(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
