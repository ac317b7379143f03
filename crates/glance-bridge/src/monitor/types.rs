//! State, snapshot, event and error types for the connection monitor.

use std::time::Duration;

use glance_common::{Banner, GlanceError, TransportError};
use tokio::task::AbortHandle;
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Belief about host reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// No probe has completed yet.
    Uninitialized,
    Alive,
    /// The host was lost; a reconnect or follow-up probe is in flight.
    Reconnecting,
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

/// A spawned timer task plus the generation it was armed with.
///
/// A timer task that fires releases its own slot (by generation) before
/// doing work, so later cancellation of that slot can never abort the
/// task that is currently running.
#[derive(Debug)]
pub(crate) struct TimerSlot {
    pub(crate) generation: u64,
    handle: AbortHandle,
}

impl TimerSlot {
    pub(crate) fn new(generation: u64, handle: AbortHandle) -> Self {
        Self { generation, handle }
    }

    pub(crate) fn is_pending(&self) -> bool {
        !self.handle.is_finished()
    }

    pub(crate) fn cancel(self) {
        self.handle.abort();
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum SlotKind {
    Retry,
    Recheck,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Mutable connection state. Only monitor operations touch it, and the
/// lock is never held across an `.await`.
#[derive(Debug)]
pub(crate) struct ConnectionState {
    pub(crate) phase: ConnectionPhase,
    pub(crate) alive: bool,
    pub(crate) last_success: Instant,
    pub(crate) reconnection_attempts: u32,
    /// Pending `schedule_reconnect` timer.
    pub(crate) retry_timer: Option<TimerSlot>,
    /// Periodic liveness probe.
    pub(crate) ping_timer: Option<TimerSlot>,
    /// Escalating follow-up probe after a failed check.
    pub(crate) recheck_timer: Option<TimerSlot>,
    /// Watcher on the persistent keep-alive channel.
    pub(crate) keep_alive: Option<TimerSlot>,
    generation: u64,
}

impl ConnectionState {
    pub(crate) fn new() -> Self {
        Self {
            phase: ConnectionPhase::Uninitialized,
            alive: false,
            last_success: Instant::now(),
            reconnection_attempts: 0,
            retry_timer: None,
            ping_timer: None,
            recheck_timer: None,
            keep_alive: None,
            generation: 0,
        }
    }

    pub(crate) fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn slot_mut(&mut self, kind: SlotKind) -> &mut Option<TimerSlot> {
        match kind {
            SlotKind::Retry => &mut self.retry_timer,
            SlotKind::Recheck => &mut self.recheck_timer,
        }
    }

    /// Abort every timer and watcher.
    pub(crate) fn cancel_all(&mut self) {
        for slot in [
            self.retry_timer.take(),
            self.ping_timer.take(),
            self.recheck_timer.take(),
            self.keep_alive.take(),
        ]
        .into_iter()
        .flatten()
        {
            slot.cancel();
        }
    }

    pub(crate) fn snapshot(&self) -> ConnectionSnapshot {
        let pending = |slot: &Option<TimerSlot>| slot.as_ref().is_some_and(TimerSlot::is_pending);
        ConnectionSnapshot {
            phase: self.phase,
            alive: self.alive,
            reconnection_attempts: self.reconnection_attempts,
            since_last_success: self.last_success.elapsed(),
            reconnect_pending: pending(&self.retry_timer),
            recheck_pending: pending(&self.recheck_timer),
            monitoring: pending(&self.ping_timer),
            keep_alive_open: pending(&self.keep_alive),
        }
    }
}

/// Read-only copy of the connection state.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSnapshot {
    pub phase: ConnectionPhase,
    pub alive: bool,
    pub reconnection_attempts: u32,
    pub since_last_success: Duration,
    pub reconnect_pending: bool,
    pub recheck_pending: bool,
    pub monitoring: bool,
    pub keep_alive_open: bool,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events published by the monitor for the rest of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    Connected,
    Disconnected,
    /// A user-visible message, e.g. after a request gave up.
    Banner(Banner),
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// The host is gone at the transport level; no retries were spent.
    #[error("host unavailable: {0}")]
    HostUnavailable(String),

    #[error("request failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: TransportError },

    #[error("unexpected reply: {0}")]
    Decode(String),
}

impl From<BridgeError> for GlanceError {
    fn from(e: BridgeError) -> Self {
        GlanceError::Bridge(e.to_string())
    }
}
