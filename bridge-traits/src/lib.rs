//! # Host Bridge Traits
//!
//! What the OneDrive adapter needs from the media-center host, expressed as
//! traits so the adapter never links against a concrete host.
//!
//! | Trait | Purpose | Desktop implementation |
//! |-------|---------|------------------------|
//! | [`HttpClient`](http::HttpClient) | GET requests against Graph | `bridge_desktop::ReqwestHttpClient` |
//! | [`AccountManager`](account::AccountManager) | valid access token per drive | `bridge_desktop::StaticAccountManager` |
//! | [`KeyValueCache`](cache::KeyValueCache) | expiring JSON storage | `bridge_desktop::MemoryCache` |
//! | [`Clock`](time::Clock) | time source for cache expiry | [`SystemClock`](time::SystemClock), [`ManualClock`](time::ManualClock) |
//! | [`LoggerSink`](log::LoggerSink) | copy of adapter logs for the host log | host-provided |
//!
//! Every trait is `Send + Sync`: one adapter instance serves concurrent host
//! requests. Failures are reported as [`BridgeError`](error::BridgeError);
//! host implementations convert their own errors into it.
//!
//! ## Implementing a host cache
//!
//! ```ignore
//! use async_trait::async_trait;
//! use bridge_traits::{cache::KeyValueCache, error::Result};
//! use std::time::Duration;
//!
//! struct PluginCache;
//!
//! #[async_trait]
//! impl KeyValueCache for PluginCache {
//!     async fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
//!         Ok(host::cache_get(key).and_then(|raw| serde_json::from_str(&raw).ok()))
//!     }
//!
//!     async fn set(&self, key: &str, value: serde_json::Value, expiration: Duration) -> Result<()> {
//!         host::cache_set(key, &value.to_string(), expiration.as_secs());
//!         Ok(())
//!     }
//!
//!     async fn delete(&self, key: &str) -> Result<()> {
//!         host::cache_delete(key);
//!         Ok(())
//!     }
//! }
//! ```

pub mod account;
pub mod cache;
pub mod error;
pub mod http;
pub mod log;
pub mod time;

pub use account::{AccessTokens, AccountManager};
pub use cache::KeyValueCache;
pub use error::BridgeError;
pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use log::{LogLevel, LogRecord, LoggerSink};
pub use time::{Clock, ManualClock, SystemClock};
