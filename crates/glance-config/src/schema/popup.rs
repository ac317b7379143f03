//! Popup placement and lifecycle configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Minimum distance kept between the popup and every viewport edge.
    pub edge_margin: f64,
    /// Offset from the anchor point to the popup corner.
    pub anchor_offset: f64,
    /// Size assumed before the popup has been measured.
    pub estimated_width: f64,
    pub estimated_height: f64,
    /// Window after a close during which no new popup opens.
    pub close_suppression_ms: u64,
    /// Lifetime of transient error banners.
    pub banner_ttl_ms: u64,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            edge_margin: 20.0,
            anchor_offset: 10.0,
            estimated_width: 350.0,
            estimated_height: 400.0,
            close_suppression_ms: 100,
            banner_ttl_ms: 3_000,
        }
    }
}

impl PopupConfig {
    pub fn close_suppression(&self) -> Duration {
        Duration::from_millis(self.close_suppression_ms)
    }

    pub fn banner_ttl(&self) -> Duration {
        Duration::from_millis(self.banner_ttl_ms)
    }
}

/// External "full definition" page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub url_base: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            url_base: "https://shabdkosh-theta.vercel.app".into(),
        }
    }
}
