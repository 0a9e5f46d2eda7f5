// src/services/cache.rs
//! In-process string cache with per-entry expiry

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache TTL must be positive, got {0} seconds")]
    InvalidTtl(i64),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct CacheService {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl CacheService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key` for `ttl`; every entry expires
    pub async fn set_string(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        if ttl <= Duration::zero() {
            return Err(CacheError::InvalidTtl(ttl.num_seconds()));
        }

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Utc::now() + ttl,
            },
        );
        debug!(key = %key, ttl_secs = ttl.num_seconds(), "Cache entry stored");
        Ok(())
    }

    /// Live value for `key`; expired entries read as absent
    pub async fn get_string(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Utc::now())
            .map(|entry| entry.value.clone())
    }

    /// Remaining lifetime of a live entry
    #[cfg(test)]
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        let now = Utc::now();
        entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.expires_at - now)
    }

    #[cfg(test)]
    pub async fn delete(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(key);
    }

    /// Drops expired entries, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let now = Utc::now();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub fn start_cleanup_task(cache: CacheService) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(300));
            loop {
                interval.tick().await;
                let removed = cache.purge_expired().await;
                if removed > 0 {
                    debug!(removed = removed, "Purged expired cache entries");
                }
            }
        });
    }
}
