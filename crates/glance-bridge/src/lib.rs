//! Host bridge for the Glance overlay.
//!
//! The host extension process is reachable only through an opaque
//! message channel ([`HostTransport`]). This crate provides:
//! - The JSON wire protocol (`PING`, `WORD_CLICKED`, `TRANSLATE_DEFINITION`)
//! - [`ConnectionMonitor`]: liveness probes, periodic monitoring,
//!   reconnect scheduling and the keep-alive channel watcher
//! - [`HostRequester`]: the retrying request primitive used by the overlay

pub mod monitor;
pub mod protocol;
pub mod transport;

pub use monitor::{
    BridgeError, ConnectionMonitor, ConnectionPhase, ConnectionSnapshot, HostRequester,
    MonitorEvent,
};
pub use protocol::{
    DataReply, DefinitionData, HostMessage, HostNotification, PageMetadata, PingReply,
    TranslateRequest, WordLookup,
};
pub use transport::{DisconnectHandle, HostTransport, KeepAlivePort};
