//! Connection monitor.
//!
//! Tracks whether the host is reachable and heals the connection when it
//! is not. All timers (reconnect, periodic probe, follow-up probe) are
//! tokio tasks owned by the monitor; at most one of each kind is pending.

mod client;
mod liveness;
mod request;
mod types;

#[cfg(test)]
mod tests;

pub use client::ConnectionMonitor;
pub use request::{HostRequester, CONNECTION_LOST_MESSAGE};
pub use types::{BridgeError, ConnectionPhase, ConnectionSnapshot, MonitorEvent};
