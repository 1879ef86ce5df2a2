use std::{sync::Arc, time::Duration};

use crate::{
    config::ClientConfig,
    info,
    management::{FileStore, UsageTelemetry},
    success, warning,
};

/// Prints the recorded provider call pressure.
pub async fn usage() {
    let config = ClientConfig::from_env();
    let telemetry = UsageTelemetry::new(
        Arc::new(FileStore::default_location()),
        config.default_throttle,
    );
    let pressure = telemetry.get_pressure().await;

    info!("Calls in the last minute: {}", pressure.calls_last_minute);
    info!("Calls this hour: {}", pressure.calls_this_hour);
    info!("Calls today: {}", pressure.calls_today);

    if pressure.is_currently_throttled {
        warning!(
            "Provider is throttling, retry in about {}s.",
            pressure.throttle_remaining_seconds
        );
    } else {
        success!("Not throttled.");
    }

    let per_minute = Duration::from_secs(60).as_millis() / config.min_request_interval.as_millis().max(1);
    info!("Pacing ceiling: {} calls per minute.", per_minute);
}
