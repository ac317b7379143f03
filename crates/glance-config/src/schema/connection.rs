//! Host connection timing.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timings and limits for the connection monitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Interval between periodic liveness probes.
    pub ping_interval_ms: u64,
    /// Fixed delay before a scheduled reconnect fires.
    pub reconnect_delay_ms: u64,
    /// Cap on escalating follow-up probes after consecutive failures.
    pub max_reconnect_attempts: u32,
    /// Follow-up probe delay per failed attempt (linear backoff).
    pub recheck_step_ms: u64,
    /// A request re-verifies the connection when the last successful
    /// probe is older than this.
    pub stale_after_ms: u64,
    /// Retries a request gets after its first attempt.
    pub request_retries: u32,
    /// Delay between request retries.
    pub retry_delay_ms: u64,
    /// Name of the persistent keep-alive channel.
    pub keep_alive_channel: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            ping_interval_ms: 15_000,
            reconnect_delay_ms: 2_000,
            max_reconnect_attempts: 3,
            recheck_step_ms: 1_000,
            stale_after_ms: 30_000,
            request_retries: 2,
            retry_delay_ms: 1_000,
            keep_alive_channel: "keepAlive".into(),
        }
    }
}

impl ConnectionConfig {
    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    /// Delay before the follow-up probe after the `attempt`-th failure.
    pub fn recheck_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.recheck_step_ms.saturating_mul(attempt as u64))
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_millis(self.stale_after_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
