//! Validation for the connection monitor timings.

use crate::schema::GlanceConfig;

use super::helpers::validate_range;

pub(crate) fn validate_connection(errors: &mut Vec<String>, config: &GlanceConfig) {
    let c = &config.connection;
    validate_range(
        errors,
        "connection.ping_interval_ms",
        c.ping_interval_ms,
        1_000,
        300_000,
    );
    validate_range(
        errors,
        "connection.reconnect_delay_ms",
        c.reconnect_delay_ms,
        100,
        60_000,
    );
    validate_range(
        errors,
        "connection.max_reconnect_attempts",
        c.max_reconnect_attempts as u64,
        1,
        10,
    );
    validate_range(
        errors,
        "connection.recheck_step_ms",
        c.recheck_step_ms,
        100,
        60_000,
    );
    validate_range(
        errors,
        "connection.stale_after_ms",
        c.stale_after_ms,
        1_000,
        600_000,
    );
    validate_range(
        errors,
        "connection.request_retries",
        c.request_retries as u64,
        0,
        10,
    );
    validate_range(
        errors,
        "connection.retry_delay_ms",
        c.retry_delay_ms,
        0,
        60_000,
    );
    if c.keep_alive_channel.trim().is_empty() {
        errors.push("connection.keep_alive_channel must not be empty".into());
    }
}
