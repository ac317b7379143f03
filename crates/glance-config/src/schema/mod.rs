//! Configuration schema types for Glance.
//!
//! All structs use `serde(default)` so partial overrides work correctly.

mod connection;
mod languages;
mod popup;
mod selection;

pub use connection::*;
pub use languages::*;
pub use popup::*;
pub use selection::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Glance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlanceConfig {
    pub connection: ConnectionConfig,
    pub selection: SelectionConfig,
    pub popup: PopupConfig,
    pub lookup: LookupConfig,
    pub languages: LanguageCatalog,
}
