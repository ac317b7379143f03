//! Probing, periodic monitoring, reconnect scheduling and keep-alive.

use futures_util::future::{BoxFuture, FutureExt};
use glance_common::TransportError;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::protocol::{HostMessage, PingReply};

use super::client::ConnectionMonitor;
use super::types::{SlotKind, TimerSlot};

impl ConnectionMonitor {
    /// Probe the host and, on success, start monitoring and open the
    /// keep-alive channel. On failure a reconnect is scheduled and `false`
    /// is returned; this never fails towards the caller.
    pub fn initialize(&self) -> BoxFuture<'static, bool> {
        let this = self.clone();
        async move {
            this.clear_timers();
            match this.probe().await {
                Ok(()) => {
                    this.record_success();
                    this.start_monitoring();
                    this.open_keep_alive().await;
                    info!("host connection initialized");
                    true
                }
                Err(e) => {
                    warn!(error = %e, "initialization probe failed, retrying");
                    this.record_failure();
                    this.schedule_reconnect();
                    false
                }
            }
        }
        .boxed()
    }

    /// Arm the reconnect timer, replacing any pending one. When it fires,
    /// `initialize` only runs if the connection has not healed meanwhile.
    pub fn schedule_reconnect(&self) {
        let delay = self.shared.config.reconnect_delay();
        let deadline = Instant::now() + delay;
        let this = self.clone();
        let mut state = self.state();
        let generation = state.next_generation();
        if let Some(previous) = state.retry_timer.take() {
            previous.cancel();
        }
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if !this.release_slot(SlotKind::Retry, generation) {
                return;
            }
            if this.is_alive() {
                debug!("connection healed before reconnect fired");
                return;
            }
            this.initialize().await;
        });
        state.retry_timer = Some(TimerSlot::new(generation, handle.abort_handle()));
        debug!(delay_ms = delay.as_millis() as u64, "reconnect scheduled");
    }

    /// One liveness probe. Success resets the attempt counter; failure
    /// escalates with a linearly delayed follow-up probe (up to the
    /// configured maximum) and always arms the standard reconnect.
    pub fn check_connection(&self) -> BoxFuture<'static, bool> {
        let this = self.clone();
        async move {
            match this.probe().await {
                Ok(()) => {
                    this.record_success();
                    true
                }
                Err(e) => {
                    debug!(error = %e, "connection check failed");
                    this.handle_connection_error();
                    this.schedule_reconnect();
                    false
                }
            }
        }
        .boxed()
    }

    /// Start the periodic probe, replacing a running one.
    pub fn start_monitoring(&self) {
        self.stop_monitoring();
        let period = self.shared.config.ping_interval();
        let first = Instant::now() + period;
        let this = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                this.check_connection().await;
            }
        });
        let mut state = self.state();
        let generation = state.next_generation();
        state.ping_timer = Some(TimerSlot::new(generation, handle.abort_handle()));
    }

    pub fn stop_monitoring(&self) {
        if let Some(slot) = self.state().ping_timer.take() {
            slot.cancel();
        }
    }

    fn clear_timers(&self) {
        self.state().cancel_all();
    }

    fn handle_connection_error(&self) {
        self.record_failure();

        let max_attempts = self.shared.config.max_reconnect_attempts;
        let mut state = self.state();
        if state.reconnection_attempts >= max_attempts {
            debug!(max_attempts, "follow-up probes exhausted");
            return;
        }
        state.reconnection_attempts += 1;
        let attempt = state.reconnection_attempts;
        let delay = self.shared.config.recheck_delay(attempt);
        let deadline = Instant::now() + delay;
        let generation = state.next_generation();
        if let Some(previous) = state.recheck_timer.take() {
            previous.cancel();
        }

        let this = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if this.release_slot(SlotKind::Recheck, generation) {
                this.check_connection().await;
            }
        });
        state.recheck_timer = Some(TimerSlot::new(generation, handle.abort_handle()));
        debug!(attempt, delay_ms = delay.as_millis() as u64, "follow-up probe armed");
    }

    async fn open_keep_alive(&self) {
        let name = self.shared.config.keep_alive_channel.clone();
        let port = match self.shared.transport.open_keep_alive(&name).await {
            Ok(port) => port,
            Err(e) => {
                warn!(error = %e, channel = %name, "failed to open keep-alive channel");
                return;
            }
        };

        let this = self.clone();
        let handle = tokio::spawn(async move {
            port.disconnected().await;
            info!("keep-alive channel disconnected");
            this.record_failure();
            this.schedule_reconnect();
        });

        let mut state = self.state();
        let generation = state.next_generation();
        if let Some(previous) = state
            .keep_alive
            .replace(TimerSlot::new(generation, handle.abort_handle()))
        {
            previous.cancel();
        }
    }

    async fn probe(&self) -> Result<(), TransportError> {
        let reply = self.shared.transport.send(&HostMessage::Ping).await?;
        let ping: PingReply = serde_json::from_value(reply)
            .map_err(|e| TransportError::InvalidReply(format!("ping: {e}")))?;
        if ping.is_ok() {
            Ok(())
        } else {
            Err(TransportError::InvalidReply(format!(
                "ping status {:?}",
                ping.status
            )))
        }
    }
}
