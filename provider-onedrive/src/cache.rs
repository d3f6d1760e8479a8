//! Metadata cache
//!
//! Raw `driveItem` values kept in the host key/value cache. Listing writes
//! and single-item lookups live under separate keys: a listed entry may be a
//! `remoteItem` stub without download url or media facets, so it never
//! answers a lookup.

use bridge_traits::cache::KeyValueCache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::types::DriveItem;

/// TTL cache of Graph items keyed by drive id, item id and folder
#[derive(Clone)]
pub struct MetadataCache {
    store: Arc<dyn KeyValueCache>,
    addon_id: String,
    item_ttl: Duration,
    listing_ttl: Duration,
}

impl MetadataCache {
    pub fn new(
        store: Arc<dyn KeyValueCache>,
        addon_id: impl Into<String>,
        item_ttl: Duration,
        listing_ttl: Duration,
    ) -> Self {
        Self {
            store,
            addon_id: addon_id.into(),
            item_ttl,
            listing_ttl,
        }
    }

    /// Key of an entry written while listing
    pub fn item_key(&self, drive_id: &str, item_id: &str) -> String {
        format!("{}-item-{}-{}", self.addon_id, drive_id, item_id)
    }

    /// Key of a single-item lookup by drive and id
    pub fn lookup_key(&self, drive_id: &str, item_id: &str) -> String {
        format!("{}-item-{}-{}-", self.addon_id, drive_id, item_id)
    }

    /// Lookup key for a named folder (`root`, `special/music`, ...) of a drive
    pub fn folder_key(&self, drive_id: &str, folder: &str) -> String {
        format!("{}-item-{}--{}", self.addon_id, drive_id, folder)
    }

    /// Cached entry for `key`; undecodable values and store failures are misses
    pub async fn get(&self, key: &str) -> Option<DriveItem> {
        let value = match self.store.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Metadata cache read failed");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(entry) => {
                debug!(key, "Metadata cache hit");
                Some(entry)
            }
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Store an entry seen while listing a folder
    pub async fn put_listed(&self, drive_id: &str, entry: &DriveItem) {
        let key = self.item_key(drive_id, &entry.id);
        self.put(&key, entry, self.listing_ttl).await;
    }

    /// Store the result of a single-item lookup
    pub async fn put_lookup(&self, key: &str, entry: &DriveItem) {
        self.put(key, entry, self.item_ttl).await;
    }

    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            warn!(key, error = %e, "Metadata cache delete failed");
        }
    }

    async fn put(&self, key: &str, entry: &DriveItem, ttl: Duration) {
        let value = match serde_json::to_value(entry) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to encode cache entry");
                return;
            }
        };

        if let Err(e) = self.store.set(key, value, ttl).await {
            warn!(key, error = %e, "Metadata cache write failed");
        }
    }
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("addon_id", &self.addon_id)
            .field("item_ttl", &self.item_ttl)
            .field("listing_ttl", &self.listing_ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_desktop::MemoryCache;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::time::ManualClock;
    use mockall::mock;
    use serde_json::json;

    mock! {
        Store {}

        #[async_trait]
        impl KeyValueCache for Store {
            async fn get(&self, key: &str) -> BridgeResult<Option<serde_json::Value>>;
            async fn set(&self, key: &str, value: serde_json::Value, expiration: Duration) -> BridgeResult<()>;
            async fn delete(&self, key: &str) -> BridgeResult<()>;
        }
    }

    fn metadata_cache(clock: Arc<ManualClock>) -> MetadataCache {
        MetadataCache::new(
            Arc::new(MemoryCache::with_clock(clock)),
            "plugin.onedrive",
            Duration::from_secs(59),
            Duration::from_secs(60),
        )
    }

    fn entry(id: &str) -> DriveItem {
        DriveItem {
            id: id.to_string(),
            name: format!("{}.mkv", id),
            ..Default::default()
        }
    }

    #[test]
    fn test_key_format() {
        let cache = metadata_cache(Arc::new(ManualClock::default()));

        assert_eq!(cache.item_key("d1", "i1"), "plugin.onedrive-item-d1-i1");
        assert_eq!(cache.lookup_key("d1", "i1"), "plugin.onedrive-item-d1-i1-");
        assert_eq!(
            cache.folder_key("d1", "special/music"),
            "plugin.onedrive-item-d1--special/music"
        );
    }

    #[tokio::test]
    async fn test_listing_entry_does_not_answer_lookup() {
        let cache = metadata_cache(Arc::new(ManualClock::default()));

        cache.put_listed("d1", &entry("i1")).await;

        let hit = cache.get(&cache.item_key("d1", "i1")).await;
        assert_eq!(hit, Some(entry("i1")));
        assert!(cache.get(&cache.item_key("d2", "i1")).await.is_none());
        assert!(cache.get(&cache.lookup_key("d1", "i1")).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = metadata_cache(Arc::new(ManualClock::default()));
        let key = cache.item_key("d1", "i1");

        cache.put_listed("d1", &entry("i1")).await;
        cache.invalidate(&key).await;

        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_ttls() {
        let clock = Arc::new(ManualClock::default());
        let cache = metadata_cache(clock.clone());
        let lookup_key = cache.folder_key("d1", "root");

        cache.put_listed("d1", &entry("i1")).await;
        cache.put_lookup(&lookup_key, &entry("root")).await;

        clock.advance(Duration::from_secs(59));
        assert!(cache.get(&lookup_key).await.is_none());
        assert!(cache.get(&cache.item_key("d1", "i1")).await.is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get(&cache.item_key("d1", "i1")).await.is_none());
    }

    #[tokio::test]
    async fn test_undecodable_value_is_miss() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(|_| Ok(Some(json!({ "name": "no id" }))));

        let cache = MetadataCache::new(
            Arc::new(store),
            "plugin.onedrive",
            Duration::from_secs(59),
            Duration::from_secs(60),
        );

        assert!(cache.get("any").await.is_none());
    }

    #[tokio::test]
    async fn test_store_failures_are_not_fatal() {
        let mut store = MockStore::new();
        store
            .expect_get()
            .returning(|_| Err(BridgeError::OperationFailed("disk full".to_string())));
        store
            .expect_set()
            .times(1)
            .returning(|_, _, _| Err(BridgeError::OperationFailed("disk full".to_string())));
        store
            .expect_delete()
            .returning(|_| Err(BridgeError::NotAvailable("cache".to_string())));

        let cache = MetadataCache::new(
            Arc::new(store),
            "plugin.onedrive",
            Duration::from_secs(59),
            Duration::from_secs(60),
        );

        cache.put_listed("d1", &entry("i1")).await;
        cache.invalidate("k").await;
        assert!(cache.get("k").await.is_none());
    }

    #[tokio::test]
    async fn test_listing_ttl_passed_to_store() {
        let mut store = MockStore::new();
        store
            .expect_set()
            .withf(|key, _, ttl| key.ends_with("-item-d1-i1") && *ttl == Duration::from_secs(60))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let cache = MetadataCache::new(
            Arc::new(store),
            "plugin.onedrive",
            Duration::from_secs(59),
            Duration::from_secs(60),
        );

        cache.put_listed("d1", &entry("i1")).await;
    }
}
