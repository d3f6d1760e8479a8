//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop hosts and tests
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! This crate provides ready-to-use implementations of the host bridges:
//! - `HttpClient` using `reqwest`, with retry and backoff
//! - `KeyValueCache` using an in-memory `lru` cache with per-entry expiry
//! - `AccountManager` backed by tokens registered up front
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{MemoryCache, ReqwestHttpClient, StaticAccountManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let http_client = ReqwestHttpClient::try_new()?;
//!     let cache = MemoryCache::new();
//!     let accounts = StaticAccountManager::with_default_token(std::env::var("GRAPH_TOKEN")?);
//!
//!     // Hand these to the adapter configuration
//!     Ok(())
//! }
//! ```

mod account;
mod cache;
mod http;

pub use account::StaticAccountManager;
pub use cache::MemoryCache;
pub use http::{ReqwestHttpClient, RetryPolicy};
