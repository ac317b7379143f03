use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use glance_common::{BannerLevel, TransportError};
use glance_config::ConnectionConfig;
use serde_json::{json, Value};

use super::*;
use crate::protocol::{HostMessage, HostNotification, PageMetadata, WordLookup};
use crate::transport::{DisconnectHandle, HostTransport, KeepAlivePort};

// ---------------------------------------------------------------------------
// Scripted transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum PingMode {
    Ok,
    Fail,
    Unavailable,
}

struct Script {
    ping: PingMode,
    replies: VecDeque<Result<Value, TransportError>>,
    sent: Vec<&'static str>,
    keep_alive_opened: u32,
    disconnect: Option<DisconnectHandle>,
}

struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    fn new(ping: PingMode) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Script {
                ping,
                replies: VecDeque::new(),
                sent: Vec::new(),
                keep_alive_opened: 0,
                disconnect: None,
            }),
        })
    }

    fn set_ping(&self, mode: PingMode) {
        self.script.lock().unwrap().ping = mode;
    }

    fn push_reply(&self, reply: Result<Value, TransportError>) {
        self.script.lock().unwrap().replies.push_back(reply);
    }

    fn sent(&self) -> Vec<&'static str> {
        self.script.lock().unwrap().sent.clone()
    }

    fn count(&self, kind: &str) -> usize {
        self.sent().iter().filter(|k| **k == kind).count()
    }

    fn pings(&self) -> usize {
        self.count("PING")
    }

    fn keep_alive_opened(&self) -> u32 {
        self.script.lock().unwrap().keep_alive_opened
    }

    /// Simulate the host tearing down the keep-alive channel.
    fn drop_keep_alive(&self) {
        let handle = self.script.lock().unwrap().disconnect.take();
        if let Some(handle) = handle {
            handle.disconnect();
        }
    }
}

#[async_trait]
impl HostTransport for ScriptedTransport {
    async fn send(&self, message: &HostMessage) -> Result<Value, TransportError> {
        let mut script = self.script.lock().unwrap();
        script.sent.push(message.kind());
        match message {
            HostMessage::Ping => match script.ping {
                PingMode::Ok => Ok(json!({"status": "ok"})),
                PingMode::Fail => Err(TransportError::SendFailed("no reply".into())),
                PingMode::Unavailable => {
                    Err(TransportError::HostUnavailable("context invalidated".into()))
                }
            },
            _ => script
                .replies
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::SendFailed("no reply".into()))),
        }
    }

    async fn open_keep_alive(&self, name: &str) -> Result<KeepAlivePort, TransportError> {
        let (port, handle) = KeepAlivePort::channel(name);
        let mut script = self.script.lock().unwrap();
        script.keep_alive_opened += 1;
        script.disconnect = Some(handle);
        Ok(port)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn monitor_with(ping: PingMode) -> (ConnectionMonitor, Arc<ScriptedTransport>) {
    let transport = ScriptedTransport::new(ping);
    let monitor = ConnectionMonitor::new(transport.clone(), ConnectionConfig::default());
    (monitor, transport)
}

async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

async fn advance_ms(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    settle().await;
}

fn lookup(word: &str) -> HostMessage {
    HostMessage::WordClicked(WordLookup {
        word: word.into(),
        context: word.into(),
        metadata: PageMetadata {
            url: "https://example.com".into(),
            title: "Example".into(),
            timestamp: 0,
        },
    })
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<MonitorEvent>) -> Vec<MonitorEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ---------------------------------------------------------------------------
// Initialization and reconnect
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn fresh_monitor_is_uninitialized() {
    let (monitor, _transport) = monitor_with(PingMode::Ok);
    let snap = monitor.snapshot();
    assert_eq!(snap.phase, ConnectionPhase::Uninitialized);
    assert!(!snap.alive);
    assert!(!snap.monitoring);
    assert!(!snap.reconnect_pending);
}

#[tokio::test(start_paused = true)]
async fn initialize_success_starts_monitoring_and_keep_alive() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    let mut events = monitor.subscribe();

    assert!(monitor.initialize().await);
    settle().await;

    let snap = monitor.snapshot();
    assert!(snap.alive);
    assert_eq!(snap.phase, ConnectionPhase::Alive);
    assert!(snap.monitoring);
    assert!(snap.keep_alive_open);
    assert!(!snap.reconnect_pending);
    assert_eq!(snap.reconnection_attempts, 0);
    assert_eq!(transport.pings(), 1);
    assert_eq!(transport.keep_alive_opened(), 1);
    assert_eq!(drain(&mut events), vec![MonitorEvent::Connected]);
}

#[tokio::test(start_paused = true)]
async fn periodic_probe_runs_every_interval() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;

    advance_ms(14_000).await;
    assert_eq!(transport.pings(), 1);

    advance_ms(1_001).await;
    assert_eq!(transport.pings(), 2);

    advance_ms(15_000).await;
    assert_eq!(transport.pings(), 3);
}

#[tokio::test(start_paused = true)]
async fn failed_initialize_schedules_reconnect_after_fixed_delay() {
    let (monitor, transport) = monitor_with(PingMode::Fail);

    assert!(!monitor.initialize().await);
    let snap = monitor.snapshot();
    assert!(!snap.alive);
    assert_eq!(snap.phase, ConnectionPhase::Reconnecting);
    assert!(snap.reconnect_pending);
    assert!(!snap.monitoring);

    advance_ms(1_999).await;
    assert_eq!(transport.pings(), 1);

    advance_ms(2).await;
    assert_eq!(transport.pings(), 2);
    assert!(monitor.snapshot().reconnect_pending);
}

#[tokio::test(start_paused = true)]
async fn reconnect_recovers_once_host_answers() {
    let (monitor, transport) = monitor_with(PingMode::Fail);
    monitor.initialize().await;

    transport.set_ping(PingMode::Ok);
    advance_ms(2_001).await;

    let snap = monitor.snapshot();
    assert!(snap.alive);
    assert!(snap.monitoring);
    assert!(!snap.reconnect_pending);
    assert_eq!(transport.keep_alive_opened(), 1);
}

#[tokio::test(start_paused = true)]
async fn scheduling_twice_leaves_one_pending_reconnect() {
    let (monitor, transport) = monitor_with(PingMode::Ok);

    monitor.schedule_reconnect();
    advance_ms(500).await;
    monitor.schedule_reconnect();

    // The first timer would have fired here.
    advance_ms(1_600).await;
    assert_eq!(transport.pings(), 0);

    advance_ms(401).await;
    assert_eq!(transport.pings(), 1);
    assert!(monitor.is_alive());
}

#[tokio::test(start_paused = true)]
async fn reconnect_is_skipped_when_connection_healed() {
    let (monitor, transport) = monitor_with(PingMode::Fail);
    monitor.initialize().await;

    transport.set_ping(PingMode::Ok);
    assert!(monitor.check_connection().await);
    assert_eq!(transport.pings(), 2);

    advance_ms(2_001).await;
    assert_eq!(transport.pings(), 2);
    assert!(monitor.is_alive());
    assert!(!monitor.snapshot().monitoring);
}

// ---------------------------------------------------------------------------
// Connection checks
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn failed_checks_cap_follow_up_attempts() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;
    let mut events = monitor.subscribe();

    transport.set_ping(PingMode::Fail);
    for _ in 0..4 {
        assert!(!monitor.check_connection().await);
    }

    let snap = monitor.snapshot();
    assert!(!snap.alive);
    assert_eq!(snap.reconnection_attempts, 3);
    assert!(snap.recheck_pending);
    assert!(snap.reconnect_pending);
    assert_eq!(drain(&mut events), vec![MonitorEvent::Disconnected]);
}

#[tokio::test(start_paused = true)]
async fn successful_check_resets_attempts() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;

    transport.set_ping(PingMode::Fail);
    monitor.check_connection().await;
    monitor.check_connection().await;
    assert_eq!(monitor.snapshot().reconnection_attempts, 2);

    transport.set_ping(PingMode::Ok);
    assert!(monitor.check_connection().await);
    let snap = monitor.snapshot();
    assert!(snap.alive);
    assert_eq!(snap.reconnection_attempts, 0);
    assert!(snap.since_last_success < Duration::from_millis(1));
}

#[tokio::test(start_paused = true)]
async fn follow_up_probe_delay_grows_linearly() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;

    transport.set_ping(PingMode::Fail);
    monitor.check_connection().await;
    assert_eq!(transport.pings(), 2);
    assert_eq!(monitor.snapshot().reconnection_attempts, 1);

    // First follow-up after 1s.
    advance_ms(1_001).await;
    assert_eq!(transport.pings(), 3);
    assert_eq!(monitor.snapshot().reconnection_attempts, 2);

    // Second follow-up is 2s out; nothing fires before it.
    advance_ms(1_998).await;
    assert_eq!(transport.pings(), 3);
}

#[tokio::test(start_paused = true)]
async fn unavailable_host_counts_as_failed_probe() {
    let (monitor, transport) = monitor_with(PingMode::Unavailable);
    assert!(!monitor.check_connection().await);
    let snap = monitor.snapshot();
    assert!(!snap.alive);
    assert!(snap.reconnect_pending);
    assert_eq!(transport.pings(), 1);
}

// ---------------------------------------------------------------------------
// Keep-alive, visibility and notifications
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn keep_alive_disconnect_triggers_reconnect() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;
    settle().await;
    let mut events = monitor.subscribe();

    transport.drop_keep_alive();
    settle().await;

    let snap = monitor.snapshot();
    assert!(!snap.alive);
    assert!(snap.reconnect_pending);
    assert_eq!(drain(&mut events), vec![MonitorEvent::Disconnected]);

    advance_ms(2_001).await;
    assert!(monitor.is_alive());
    assert_eq!(transport.keep_alive_opened(), 2);
    assert_eq!(drain(&mut events), vec![MonitorEvent::Connected]);
}

#[tokio::test(start_paused = true)]
async fn hidden_page_stops_monitoring_but_keeps_reconnect() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;

    transport.set_ping(PingMode::Fail);
    monitor.check_connection().await;
    monitor.on_visibility_changed(false).await;

    let snap = monitor.snapshot();
    assert!(!snap.monitoring);
    assert!(snap.reconnect_pending);
}

#[tokio::test(start_paused = true)]
async fn visible_page_and_tab_notifications_reinitialize() {
    let (monitor, transport) = monitor_with(PingMode::Ok);

    monitor.on_visibility_changed(true).await;
    assert!(monitor.is_alive());
    assert_eq!(transport.pings(), 1);

    monitor
        .on_host_notification(HostNotification::TabActivated)
        .await;
    monitor.on_host_notification(HostNotification::TabReady).await;
    assert_eq!(transport.pings(), 3);

    monitor.on_host_notification(HostNotification::Unknown).await;
    assert_eq!(transport.pings(), 3);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_every_timer() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;
    transport.set_ping(PingMode::Fail);
    monitor.check_connection().await;

    monitor.shutdown();
    settle().await;

    let snap = monitor.snapshot();
    assert!(!snap.monitoring);
    assert!(!snap.keep_alive_open);
    assert!(!snap.reconnect_pending);
    assert!(!snap.recheck_pending);

    let pings = transport.pings();
    advance_ms(60_000).await;
    assert_eq!(transport.pings(), pings);
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn request_returns_host_reply() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;
    transport.push_reply(Ok(json!({"data": {"definition": "a thing"}})));

    let reply = monitor.request(lookup("thing"), 2).await.unwrap();
    assert_eq!(reply["data"]["definition"], "a thing");
    assert_eq!(transport.sent(), vec!["PING", "WORD_CLICKED"]);
}

#[tokio::test(start_paused = true)]
async fn request_retries_transient_failures() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;
    transport.push_reply(Err(TransportError::SendFailed("timeout".into())));
    transport.push_reply(Ok(json!({"data": null})));

    let reply = monitor.request(lookup("thing"), 2).await.unwrap();
    assert_eq!(reply, json!({"data": null}));
    assert_eq!(transport.count("WORD_CLICKED"), 2);
}

#[tokio::test(start_paused = true)]
async fn unavailable_host_fails_request_without_retrying() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;
    transport.push_reply(Err(TransportError::HostUnavailable("gone".into())));

    let err = monitor.request(lookup("thing"), 2).await.unwrap_err();
    assert!(matches!(err, BridgeError::HostUnavailable(_)));
    assert_eq!(transport.count("WORD_CLICKED"), 1);

    let snap = monitor.snapshot();
    assert!(!snap.alive);
    assert!(snap.reconnect_pending);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_publish_connection_lost_banner() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;
    let mut events = monitor.subscribe();
    transport.set_ping(PingMode::Fail);

    let err = monitor.request(lookup("thing"), 2).await.unwrap_err();
    assert_eq!(
        err,
        BridgeError::RetriesExhausted {
            attempts: 3,
            last: TransportError::SendFailed("no reply".into()),
        }
    );
    assert_eq!(transport.count("WORD_CLICKED"), 3);

    let banners: Vec<_> = drain(&mut events)
        .into_iter()
        .filter_map(|event| match event {
            MonitorEvent::Banner(banner) => Some(banner),
            _ => None,
        })
        .collect();
    assert_eq!(banners.len(), 1);
    assert_eq!(banners[0].level, BannerLevel::Error);
    assert_eq!(banners[0].message, CONNECTION_LOST_MESSAGE);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_stay_quiet_when_host_still_answers_pings() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    monitor.initialize().await;
    let mut events = monitor.subscribe();

    let err = monitor.request(lookup("thing"), 1).await.unwrap_err();
    assert!(matches!(err, BridgeError::RetriesExhausted { attempts: 2, .. }));
    assert!(monitor.is_alive());
    assert!(drain(&mut events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn stale_connection_is_verified_before_sending() {
    let (monitor, transport) = monitor_with(PingMode::Ok);
    advance_ms(31_000).await;
    transport.push_reply(Ok(json!({"data": {}})));

    monitor.request(lookup("thing"), 0).await.unwrap();
    assert_eq!(transport.sent(), vec!["PING", "WORD_CLICKED"]);
    assert!(monitor.is_alive());
}

#[tokio::test(start_paused = true)]
async fn requester_uses_configured_retry_budget() {
    let transport = ScriptedTransport::new(PingMode::Ok);
    let config = ConnectionConfig {
        request_retries: 0,
        ..ConnectionConfig::default()
    };
    let monitor = ConnectionMonitor::new(transport.clone(), config);
    monitor.initialize().await;

    let requester: &dyn HostRequester = &monitor;
    assert!(requester.is_alive());
    let err = requester.send_request(lookup("thing")).await.unwrap_err();
    assert!(matches!(err, BridgeError::RetriesExhausted { attempts: 1, .. }));
    assert_eq!(transport.count("WORD_CLICKED"), 1);
}
