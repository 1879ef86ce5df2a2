use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    management::KeyValueStore,
    types::{UsagePressure, UsageRecord},
};

pub const USAGE_KEY: &str = "apiUsageStats";

const RECENT_WINDOW_MS: i64 = 60_000;

/// Records provider calls and throttle events for rate-pressure displays.
///
/// The record is loaded from the store on first use and written back after
/// every event. When the store is unavailable the in-memory record keeps
/// working and the write is dropped.
pub struct UsageTelemetry {
    store: Arc<dyn KeyValueStore>,
    default_throttle: chrono::Duration,
    record: Mutex<Option<UsageRecord>>,
}

impl UsageTelemetry {
    pub fn new(store: Arc<dyn KeyValueStore>, default_throttle: Duration) -> Self {
        Self {
            store,
            default_throttle: chrono::Duration::from_std(default_throttle)
                .unwrap_or(chrono::Duration::seconds(30)),
            record: Mutex::new(None),
        }
    }

    pub async fn record_call(&self) {
        self.record_call_at(Utc::now()).await
    }

    pub async fn record_call_at(&self, now: DateTime<Utc>) {
        let mut guard = self.record.lock().await;
        let record = self.loaded(&mut guard).await;

        roll_windows(record, now);
        record.calls_today += 1;
        record.calls_this_hour += 1;
        record.recent_call_timestamps.push(now.timestamp_millis());
        prune_recent(record, now);

        let snapshot = record.clone();
        self.persist(&snapshot).await;
    }

    pub async fn record_throttle(&self, retry_after_seconds: Option<u64>) {
        self.record_throttle_at(retry_after_seconds, Utc::now()).await
    }

    pub async fn record_throttle_at(&self, retry_after_seconds: Option<u64>, now: DateTime<Utc>) {
        let mut guard = self.record.lock().await;
        let record = self.loaded(&mut guard).await;

        record.last_throttle_at = Some(now.timestamp_millis());
        record.throttle_retry_after_seconds = retry_after_seconds;
        prune_recent(record, now);

        let snapshot = record.clone();
        self.persist(&snapshot).await;
    }

    pub async fn get_pressure(&self) -> UsagePressure {
        self.pressure_at(Utc::now()).await
    }

    pub async fn pressure_at(&self, now: DateTime<Utc>) -> UsagePressure {
        let mut guard = self.record.lock().await;
        let record = self.loaded(&mut guard).await;

        roll_windows(record, now);
        prune_recent(record, now);

        let remaining_ms = record
            .last_throttle_at
            .map(|at| {
                let window = record
                    .throttle_retry_after_seconds
                    .map(|s| i64::try_from(s).unwrap_or(i64::MAX).saturating_mul(1000))
                    .unwrap_or(self.default_throttle.num_milliseconds());
                at.saturating_add(window)
                    .saturating_sub(now.timestamp_millis())
            })
            .unwrap_or(0);

        UsagePressure {
            calls_last_minute: record.recent_call_timestamps.len(),
            calls_this_hour: record.calls_this_hour,
            calls_today: record.calls_today,
            is_currently_throttled: remaining_ms > 0,
            throttle_remaining_seconds: if remaining_ms > 0 {
                (remaining_ms as u64).div_ceil(1000)
            } else {
                0
            },
        }
    }

    /// Current in-memory record.
    pub async fn snapshot(&self) -> UsageRecord {
        let mut guard = self.record.lock().await;
        self.loaded(&mut guard).await.clone()
    }

    async fn loaded<'a>(&self, slot: &'a mut Option<UsageRecord>) -> &'a mut UsageRecord {
        if slot.is_none() {
            let stored = match self.store.get(USAGE_KEY).await {
                Ok(Some(value)) => serde_json::from_value(value).unwrap_or_default(),
                Ok(None) | Err(_) => UsageRecord::default(),
            };
            *slot = Some(stored);
        }
        slot.get_or_insert_with(UsageRecord::default)
    }

    async fn persist(&self, record: &UsageRecord) {
        let Ok(value) = serde_json::to_value(record) else {
            return;
        };
        // unavailable storage drops the write
        let _ = self.store.set(USAGE_KEY, value).await;
    }
}

fn roll_windows(record: &mut UsageRecord, now: DateTime<Utc>) {
    let day = now.format("%Y-%m-%d").to_string();
    if record.day_key.as_deref() != Some(day.as_str()) {
        record.day_key = Some(day);
        record.calls_today = 0;
    }

    let hour = now.timestamp() / 3600;
    if record.hour_key != Some(hour) {
        record.hour_key = Some(hour);
        record.calls_this_hour = 0;
    }
}

fn prune_recent(record: &mut UsageRecord, now: DateTime<Utc>) {
    let cutoff = now.timestamp_millis() - RECENT_WINDOW_MS;
    record.recent_call_timestamps.retain(|ts| *ts > cutoff);
}
