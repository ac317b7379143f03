//! The retrying request primitive.

use async_trait::async_trait;
use glance_common::{new_correlation_id, Banner};
use tracing::{debug, warn};

use crate::protocol::HostMessage;

use super::client::ConnectionMonitor;
use super::types::{BridgeError, MonitorEvent};

/// Banner shown when a request gave up and the host is still unreachable.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection lost. Attempting to reconnect...";

/// Sends requests to the host on behalf of the overlay.
#[async_trait]
pub trait HostRequester: Send + Sync {
    /// Current belief about host reachability.
    fn is_alive(&self) -> bool;

    /// Send with the configured retry budget.
    async fn send_request(&self, message: HostMessage) -> Result<serde_json::Value, BridgeError>;
}

impl ConnectionMonitor {
    /// Send `message`, retrying up to `max_retries` times after the first
    /// attempt.
    ///
    /// A stale connection (no successful probe within the staleness
    /// threshold) is re-verified before each attempt. A host that is gone
    /// at the transport level fails immediately. When retries run out the
    /// connection is re-checked, and if it is still down a banner is
    /// published before the error is returned.
    pub async fn request(
        &self,
        message: HostMessage,
        max_retries: u32,
    ) -> Result<serde_json::Value, BridgeError> {
        let request_id = new_correlation_id();
        let kind = message.kind();
        let mut attempt = 0u32;

        loop {
            if self.is_stale() {
                debug!(request_id = %request_id, "connection stale, re-verifying");
                self.check_connection().await;
            }

            let error = match self.shared.transport.send(&message).await {
                Ok(reply) => {
                    debug!(request_id = %request_id, kind, attempt, "request answered");
                    return Ok(reply);
                }
                Err(e) => e,
            };

            if error.is_unavailable() {
                warn!(request_id = %request_id, kind, error = %error, "host unavailable");
                self.record_failure();
                self.schedule_reconnect();
                return Err(BridgeError::HostUnavailable(error.to_string()));
            }

            if attempt >= max_retries {
                warn!(
                    request_id = %request_id,
                    kind,
                    attempts = attempt + 1,
                    error = %error,
                    "request retries exhausted"
                );
                self.check_connection().await;
                if !self.is_alive() {
                    self.publish(MonitorEvent::Banner(Banner::error(CONNECTION_LOST_MESSAGE)));
                }
                return Err(BridgeError::RetriesExhausted {
                    attempts: attempt + 1,
                    last: error,
                });
            }

            debug!(
                request_id = %request_id,
                kind,
                attempt,
                error = %error,
                "request failed, retrying"
            );
            attempt += 1;
            tokio::time::sleep(self.shared.config.retry_delay()).await;
        }
    }

    fn is_stale(&self) -> bool {
        self.state().last_success.elapsed() > self.shared.config.stale_after()
    }
}

#[async_trait]
impl HostRequester for ConnectionMonitor {
    fn is_alive(&self) -> bool {
        ConnectionMonitor::is_alive(self)
    }

    async fn send_request(&self, message: HostMessage) -> Result<serde_json::Value, BridgeError> {
        let retries = self.shared.config.request_retries;
        self.request(message, retries).await
    }
}
