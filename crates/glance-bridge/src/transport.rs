//! The opaque channel to the host process.

use async_trait::async_trait;
use glance_common::TransportError;
use tokio::sync::oneshot;

use crate::protocol::HostMessage;

/// Request/response access to the host process.
///
/// Implementations wrap whatever message-passing primitive the page
/// environment offers. They must report a vanished host as
/// [`TransportError::HostUnavailable`] so callers can skip retrying.
#[async_trait]
pub trait HostTransport: Send + Sync {
    /// Send one message and wait for the host's JSON reply.
    async fn send(&self, message: &HostMessage) -> Result<serde_json::Value, TransportError>;

    /// Open the named persistent channel used as a liveness signal.
    async fn open_keep_alive(&self, name: &str) -> Result<KeepAlivePort, TransportError>;
}

/// Page side of a persistent keep-alive channel.
#[derive(Debug)]
pub struct KeepAlivePort {
    name: String,
    closed: oneshot::Receiver<()>,
}

/// Host side of a keep-alive channel. Calling [`disconnect`] or dropping
/// the handle signals the page that the host went away.
///
/// [`disconnect`]: DisconnectHandle::disconnect
#[derive(Debug)]
pub struct DisconnectHandle {
    tx: oneshot::Sender<()>,
}

impl KeepAlivePort {
    /// Create a connected port/handle pair.
    pub fn channel(name: impl Into<String>) -> (Self, DisconnectHandle) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                name: name.into(),
                closed: rx,
            },
            DisconnectHandle { tx },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves once the host side disconnects.
    pub async fn disconnected(self) {
        // Both an explicit signal and a dropped sender mean the same thing.
        let _ = self.closed.await;
    }
}

impl DisconnectHandle {
    pub fn disconnect(self) {
        let _ = self.tx.send(());
    }
}
