//! In-memory expiring cache using `lru`

use async_trait::async_trait;
use bridge_traits::{
    cache::KeyValueCache,
    error::{BridgeError, Result},
    time::{Clock, SystemClock},
};
use chrono::{DateTime, Utc};
use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Default number of entries kept before least-recently-used eviction
const DEFAULT_CAPACITY: usize = 2048;

struct Entry {
    value: Value,
    expires_at: DateTime<Utc>,
}

/// `KeyValueCache` backed by a bounded LRU map
///
/// Each entry carries its own expiry computed from the injected [`Clock`].
/// Expired entries are dropped lazily on read, or eagerly through
/// [`purge_expired`](MemoryCache::purge_expired).
pub struct MemoryCache {
    entries: Mutex<LruCache<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCache {
    /// Create a cache with the default capacity and the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a cache with the default capacity and a custom clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            clock,
        }
    }

    /// Create a cache holding at most `capacity` entries
    pub fn with_capacity(capacity: usize, clock: Arc<dyn Clock>) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            BridgeError::OperationFailed("Cache capacity must be greater than 0".to_string())
        })?;

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
            clock,
        })
    }

    /// Number of entries currently held, expired or not
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            entries.pop(key);
        }

        if !expired.is_empty() {
            debug!(removed = expired.len(), "Purged expired cache entries");
        }

        expired.len()
    }

    fn expiry_from(&self, expiration: Duration) -> DateTime<Utc> {
        let now = self.clock.now();
        chrono::Duration::from_std(expiration)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
            debug!(key = %key, "Cache entry expired");
        }

        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, expiration: Duration) -> Result<()> {
        let expires_at = self.expiry_from(expiration);
        let mut entries = self.entries.lock().await;

        if let Some((evicted, _)) = entries.push(key.to_string(), Entry { value, expires_at }) {
            if evicted != key {
                debug!(key = %evicted, "Evicted least recently used cache entry");
            }
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().await.pop(key);
        Ok(())
    }
}
