//! Public handle for the connection monitor.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glance_config::ConnectionConfig;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::protocol::HostNotification;
use crate::transport::HostTransport;

use super::types::{ConnectionPhase, ConnectionSnapshot, ConnectionState, MonitorEvent, SlotKind};

pub(crate) struct Shared {
    pub(crate) transport: Arc<dyn HostTransport>,
    pub(crate) config: ConnectionConfig,
    state: Mutex<ConnectionState>,
    events: broadcast::Sender<MonitorEvent>,
}

/// Keeps a self-healing belief about whether the host is reachable.
///
/// Cloning is cheap; all clones share one state. Timer tasks hold clones,
/// so call [`shutdown`](Self::shutdown) at page teardown.
#[derive(Clone)]
pub struct ConnectionMonitor {
    pub(crate) shared: Arc<Shared>,
}

impl ConnectionMonitor {
    pub fn new(transport: Arc<dyn HostTransport>, config: ConnectionConfig) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Shared {
                transport,
                config,
                state: Mutex::new(ConnectionState::new()),
                events,
            }),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.shared.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.shared.events.subscribe()
    }

    pub fn is_alive(&self) -> bool {
        self.state().alive
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.state().snapshot()
    }

    /// Page became visible (re-initialize) or hidden (stop the periodic
    /// probe; a pending reconnect is left alone).
    pub async fn on_visibility_changed(&self, visible: bool) {
        if visible {
            debug!("page visible, re-initializing");
            self.initialize().await;
        } else {
            debug!("page hidden, pausing monitoring");
            self.stop_monitoring();
        }
    }

    pub async fn on_host_notification(&self, notification: HostNotification) {
        match notification {
            HostNotification::TabActivated | HostNotification::TabReady => {
                debug!(?notification, "host asked for re-initialization");
                self.initialize().await;
            }
            HostNotification::Unknown => {}
        }
    }

    /// Cancel every timer and the keep-alive watcher.
    pub fn shutdown(&self) {
        self.state().cancel_all();
        info!("connection monitor stopped");
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, ConnectionState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn publish(&self, event: MonitorEvent) {
        let _ = self.shared.events.send(event);
    }

    /// Successful probe: alive, fresh timestamp, attempts reset.
    pub(crate) fn record_success(&self) {
        let was_alive = {
            let mut state = self.state();
            let was_alive = state.alive;
            state.alive = true;
            state.phase = ConnectionPhase::Alive;
            state.last_success = Instant::now();
            state.reconnection_attempts = 0;
            was_alive
        };
        if !was_alive {
            info!("host reachable");
            self.publish(MonitorEvent::Connected);
        }
    }

    pub(crate) fn record_failure(&self) {
        let was_alive = {
            let mut state = self.state();
            let was_alive = state.alive;
            state.alive = false;
            state.phase = ConnectionPhase::Reconnecting;
            was_alive
        };
        if was_alive {
            info!("host unreachable");
            self.publish(MonitorEvent::Disconnected);
        }
    }

    /// Detach a fired timer from its slot. Returns `false` if the slot was
    /// re-armed since, i.e. this timer was superseded.
    pub(crate) fn release_slot(&self, kind: SlotKind, generation: u64) -> bool {
        let mut state = self.state();
        let slot = state.slot_mut(kind);
        if slot.as_ref().is_some_and(|s| s.generation == generation) {
            *slot = None;
            true
        } else {
            false
        }
    }
}
