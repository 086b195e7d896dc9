use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::auth::errors::CacheError;
use crate::domain::auth::ports::RequestCounter;
use crate::domain::auth::ports::SessionCache;

struct Entry {
    value: Vec<u8>,
    expires_at: Instant,
}

struct Window {
    count: u64,
    resets_at: Instant,
}

/// Process-local session cache with per-entry expiry.
///
/// Expired entries are dropped lazily when read. Request counters live in a
/// separate map and restart once their window has elapsed.
#[derive(Default)]
pub struct InMemorySessionCache {
    entries: DashMap<String, Entry>,
    counters: DashMap<String, Window>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Ok(Some(entry.value.clone()));
            }
        }

        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), CacheError> {
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }
}

#[async_trait]
impl RequestCounter for InMemorySessionCache {
    async fn incr(&self, key: &str, window_seconds: u64) -> Result<u64, CacheError> {
        let now = Instant::now();
        let length = Duration::from_secs(window_seconds);

        let mut window = self.counters.entry(key.to_string()).or_insert(Window {
            count: 0,
            resets_at: now + length,
        });
        if window.resets_at <= now {
            window.count = 0;
            window.resets_at = now + length;
        }
        window.count += 1;

        Ok(window.count)
    }
}
