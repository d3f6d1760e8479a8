//! Key-Value Cache Abstraction
//!
//! Expiring key-value storage provided by the host framework. The adapter
//! layers its metadata TTL policy on top of this primitive.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::Result;

/// Expiring key-value cache trait
///
/// Abstracts the host's cache primitive:
/// - Desktop/tests: in-memory LRU with expiry (`bridge-desktop::MemoryCache`)
/// - Plugin hosts: whatever persistent or in-process cache the framework ships
///
/// # Contract
///
/// - `get` never returns an entry whose expiration has passed
/// - `set` replaces any previous value and restarts its expiration
/// - `delete` of an unknown key is not an error
///
/// # Example
///
/// ```ignore
/// use bridge_traits::cache::KeyValueCache;
/// use std::time::Duration;
///
/// async fn remember(cache: &dyn KeyValueCache, item: serde_json::Value) -> Result<()> {
///     cache.set("plugin.onedrive-item-d1-i1", item, Duration::from_secs(60)).await
/// }
/// ```
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Retrieve a live value
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if the key is unknown or expired.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Store a value for `expiration`
    async fn set(&self, key: &str, value: Value, expiration: Duration) -> Result<()>;

    /// Remove a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a live value exists
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
