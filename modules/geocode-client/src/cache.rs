use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use civic_common::Clock;
use tokio::sync::Mutex;

use crate::format::cache_key;

#[derive(Debug, Clone)]
struct CacheEntry {
    name: String,
    inserted_at: DateTime<Utc>,
}

/// Location names keyed by rounded coordinates.
///
/// Bounded: once `capacity` entries are held, expired entries are dropped
/// first and then the oldest insertion. Entries older than `ttl` are never
/// served.
pub struct LocationNameCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    capacity: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl LocationNameCache {
    pub fn new(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity,
            ttl,
            clock,
        }
    }

    pub async fn get(&self, lat: f64, lng: f64) -> Option<String> {
        let key = cache_key(lat, lng);
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        match entries.get(&key) {
            Some(entry) if now - entry.inserted_at < self.ttl => Some(entry.name.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub async fn insert(&self, lat: f64, lng: f64, name: String) {
        if self.capacity == 0 {
            return;
        }
        let key = cache_key(lat, lng);
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.retain(|_, v| now - v.inserted_at < self.ttl);
            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, v)| v.inserted_at)
                    .map(|(k, _)| k.clone());
                if let Some(oldest) = oldest {
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            key,
            CacheEntry {
                name,
                inserted_at: now,
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
