use std::{collections::HashMap, sync::Mutex, time::Duration};

use chrono::{DateTime, Utc};
use serde_json::Value;

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: DateTime<Utc>,
}

/// Time-boxed memo of provider responses keyed by logical query.
///
/// Staleness is checked at read time; a stale entry is evicted by the lookup
/// that finds it, never in the background.
pub struct ResponseCache {
    freshness: chrono::Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(freshness: Duration) -> Self {
        Self {
            freshness: chrono::Duration::from_std(freshness).unwrap_or(chrono::Duration::MAX),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Utc::now())
    }

    /// Returns the value for `key` if `now - stored_at < freshness`.
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        let mut entries = self.entries.lock().ok()?;
        let fresh = match entries.get(key) {
            Some(entry) => now - entry.stored_at < self.freshness,
            None => return None,
        };

        if fresh {
            entries.get(key).map(|e| e.value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    pub fn put(&self, key: impl Into<String>, value: Value) {
        self.put_at(key, value, Utc::now());
    }

    pub fn put_at(&self, key: impl Into<String>, value: Value, now: DateTime<Utc>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.into(),
                CacheEntry {
                    value,
                    stored_at: now,
                },
            );
        }
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Number of physically stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
