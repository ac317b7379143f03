//! Page-side runtime for Glance.
//!
//! Owns the [`ConnectionMonitor`] and the [`PopupController`] and drives
//! both from one event loop: page input and host notifications come in
//! through a [`RuntimeEvent`] channel, request completions come back from
//! the controller's own tasks, and monitor banners are forwarded to the
//! page.

pub mod logging;

use std::sync::Arc;

use glance_bridge::{
    ConnectionMonitor, HostNotification, HostRequester, HostTransport, MonitorEvent,
};
use glance_config::GlanceConfig;
use glance_overlay::{Completion, PageEvent, PageSurface, PopupController};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Everything the embedder feeds into the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEvent {
    Page(PageEvent),
    /// Page visibility changed.
    Visibility { visible: bool },
    Host(HostNotification),
    /// Page teardown.
    Shutdown,
}

impl From<PageEvent> for RuntimeEvent {
    fn from(event: PageEvent) -> Self {
        Self::Page(event)
    }
}

pub struct Runtime<S: PageSurface> {
    monitor: ConnectionMonitor,
    controller: PopupController<S>,
    completions: mpsc::UnboundedReceiver<Completion>,
    monitor_events: broadcast::Receiver<MonitorEvent>,
}

impl<S: PageSurface> Runtime<S> {
    pub fn new(surface: S, transport: Arc<dyn HostTransport>, config: &GlanceConfig) -> Self {
        let monitor = ConnectionMonitor::new(transport, config.connection.clone());
        let monitor_events = monitor.subscribe();
        let requester: Arc<dyn HostRequester> = Arc::new(monitor.clone());
        let (tx, completions) = mpsc::unbounded_channel();
        let controller = PopupController::new(surface, requester, config, tx);
        Self {
            monitor,
            controller,
            completions,
            monitor_events,
        }
    }

    /// Like [`new`](Self::new), with the config built from an optional
    /// TOML override of the defaults.
    pub fn from_overrides(
        surface: S,
        transport: Arc<dyn HostTransport>,
        overrides: Option<&str>,
    ) -> glance_common::Result<Self> {
        let config = glance_config::load_config(overrides)?;
        debug!(config = %glance_config::config_to_json(&config), "config loaded");
        Ok(Self::new(surface, transport, &config))
    }

    pub fn monitor(&self) -> &ConnectionMonitor {
        &self.monitor
    }

    pub fn controller(&self) -> &PopupController<S> {
        &self.controller
    }

    /// Run until [`RuntimeEvent::Shutdown`] arrives or every sender is
    /// dropped, then tear down. Returns the controller so the embedder can
    /// get its surface back.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<RuntimeEvent>,
    ) -> PopupController<S> {
        info!("glance runtime starting");
        self.spawn_initialize();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(RuntimeEvent::Shutdown) | None => break,
                    Some(event) => self.dispatch(event),
                },
                Some(completion) = self.completions.recv() => {
                    self.controller.handle_completion(completion);
                }
                event = self.monitor_events.recv() => self.on_monitor_event(event),
            }
        }

        self.shutdown();
        self.controller
    }

    fn dispatch(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Page(event) => self.controller.handle_page_event(event),
            RuntimeEvent::Visibility { visible } => {
                let monitor = self.monitor.clone();
                tokio::spawn(async move { monitor.on_visibility_changed(visible).await });
            }
            RuntimeEvent::Host(notification) => {
                let monitor = self.monitor.clone();
                tokio::spawn(async move { monitor.on_host_notification(notification).await });
            }
            RuntimeEvent::Shutdown => {}
        }
    }

    fn on_monitor_event(&mut self, event: Result<MonitorEvent, broadcast::error::RecvError>) {
        match event {
            Ok(MonitorEvent::Banner(banner)) => self.controller.show_banner(&banner),
            Ok(MonitorEvent::Connected) => debug!("host connected"),
            Ok(MonitorEvent::Disconnected) => debug!("host disconnected"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "monitor events dropped");
            }
            // The monitor owns the sender and outlives the loop.
            Err(broadcast::error::RecvError::Closed) => {}
        }
    }

    fn spawn_initialize(&self) {
        tokio::spawn(self.monitor.initialize());
    }

    fn shutdown(&mut self) {
        self.controller.close();
        self.monitor.shutdown();
        info!("glance runtime stopped");
    }
}
