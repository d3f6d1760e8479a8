//! # Adapter Configuration
//!
//! Configuration for the OneDrive media adapter.
//!
//! ## Overview
//!
//! A builder collects the host capabilities the adapter needs and the few
//! tunables it exposes, then validates everything up front so a missing
//! bridge fails at startup instead of on the first request.
//!
//! ## Required Dependencies
//!
//! - `AccountManager` - Supplies access tokens per drive
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP transport (desktop default: reqwest)
//! - `KeyValueCache` - TTL cache primitive (desktop default: in-memory LRU)
//!
//! When the `desktop-shims` feature is enabled, the desktop defaults are
//! injected automatically if not provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::AddonConfig;
//! use std::sync::Arc;
//!
//! let config = AddonConfig::builder()
//!     .addon_id("plugin.onedrive")
//!     .account_manager(Arc::new(HostAccounts::new()))
//!     .http_client(Arc::new(HostHttp::new()))
//!     .cache(Arc::new(HostCache::new()))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{AccountManager, HttpClient, KeyValueCache};
use std::sync::Arc;
use std::time::Duration;

/// Default namespace for cache keys
pub const DEFAULT_ADDON_ID: &str = "plugin.onedrive";

/// Microsoft Graph v1.0 endpoint
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Single-item lookups stay cached for 59 seconds
pub const DEFAULT_ITEM_TTL: Duration = Duration::from_secs(59);

/// Items seen while listing stay cached for one minute
pub const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(60);

/// Per-request timeout handed to the transport
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Adapter configuration.
///
/// Use [`AddonConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct AddonConfig {
    /// Namespace prepended to every cache key
    pub addon_id: String,

    /// Graph API root, without trailing slash
    pub graph_base_url: String,

    /// HTTP transport
    pub http_client: Arc<dyn HttpClient>,

    /// Host account manager (required)
    pub account_manager: Arc<dyn AccountManager>,

    /// Host cache primitive
    pub cache: Arc<dyn KeyValueCache>,

    /// Lifetime of entries cached by single-item lookups
    pub item_ttl: Duration,

    /// Lifetime of entries cached while listing folders and search results
    pub listing_ttl: Duration,

    /// Timeout for each Graph request
    pub request_timeout: Duration,

    /// Ask Graph to expand thumbnails on listings and lookups
    pub expand_thumbnails: bool,
}

impl std::fmt::Debug for AddonConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddonConfig")
            .field("addon_id", &self.addon_id)
            .field("graph_base_url", &self.graph_base_url)
            .field("http_client", &"HttpClient { ... }")
            .field("account_manager", &"AccountManager { ... }")
            .field("cache", &"KeyValueCache { ... }")
            .field("item_ttl", &self.item_ttl)
            .field("listing_ttl", &self.listing_ttl)
            .field("request_timeout", &self.request_timeout)
            .field("expand_thumbnails", &self.expand_thumbnails)
            .finish()
    }
}

impl AddonConfig {
    /// Creates a new builder for constructing an `AddonConfig`.
    pub fn builder() -> AddonConfigBuilder {
        AddonConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The addon id is not empty and contains no whitespace
    /// - The Graph base URL is http(s)
    /// - TTLs and the request timeout are non-zero
    pub fn validate(&self) -> Result<()> {
        if self.addon_id.trim().is_empty() {
            return Err(Error::InvalidValue {
                field: "addon_id",
                reason: "cannot be empty".to_string(),
            });
        }

        if self.addon_id.chars().any(char::is_whitespace) {
            return Err(Error::InvalidValue {
                field: "addon_id",
                reason: "cannot contain whitespace".to_string(),
            });
        }

        if !(self.graph_base_url.starts_with("https://")
            || self.graph_base_url.starts_with("http://"))
        {
            return Err(Error::InvalidValue {
                field: "graph_base_url",
                reason: format!("'{}' is not an http(s) URL", self.graph_base_url),
            });
        }

        for (field, value) in [
            ("item_ttl", self.item_ttl),
            ("listing_ttl", self.listing_ttl),
            ("request_timeout", self.request_timeout),
        ] {
            if value.is_zero() {
                return Err(Error::InvalidValue {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn account_manager_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "AccountManager".to_string(),
        message: "An AccountManager is required to obtain Graph access tokens. \
                 Plugin hosts: inject the framework's account manager. \
                 Desktop tools and tests: use bridge_desktop::StaticAccountManager."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient. \
                 Plugin hosts: inject the framework's transport."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn cache_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "KeyValueCache".to_string(),
        message: "No cache implementation provided. \
                 Desktop: enable the 'desktop-shims' feature to use MemoryCache. \
                 Plugin hosts: inject the framework's cache."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::with_timeout(timeout)
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    Ok(Arc::new(client))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_cache() -> Result<Arc<dyn KeyValueCache>> {
    use bridge_desktop::MemoryCache;

    Ok(Arc::new(MemoryCache::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_cache() -> Result<Arc<dyn KeyValueCache>> {
    Err(cache_missing_error())
}

/// Builder for constructing [`AddonConfig`] instances.
#[derive(Default)]
pub struct AddonConfigBuilder {
    addon_id: Option<String>,
    graph_base_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    account_manager: Option<Arc<dyn AccountManager>>,
    cache: Option<Arc<dyn KeyValueCache>>,
    item_ttl: Option<Duration>,
    listing_ttl: Option<Duration>,
    request_timeout: Option<Duration>,
    expand_thumbnails: Option<bool>,
}

impl AddonConfigBuilder {
    /// Sets the cache key namespace.
    ///
    /// Default: `plugin.onedrive`
    pub fn addon_id(mut self, addon_id: impl Into<String>) -> Self {
        self.addon_id = Some(addon_id.into());
        self
    }

    /// Overrides the Graph API root, e.g. for a national cloud or a test server.
    ///
    /// Default: `https://graph.microsoft.com/v1.0`
    pub fn graph_base_url(mut self, url: impl Into<String>) -> Self {
        self.graph_base_url = Some(url.into());
        self
    }

    /// Sets the HTTP transport.
    ///
    /// If not provided, the reqwest-based desktop client is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the account manager (required).
    pub fn account_manager(mut self, manager: Arc<dyn AccountManager>) -> Self {
        self.account_manager = Some(manager);
        self
    }

    /// Sets the cache primitive.
    ///
    /// If not provided, an in-memory LRU cache is used when the
    /// `desktop-shims` feature is enabled.
    pub fn cache(mut self, cache: Arc<dyn KeyValueCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Default: 59 seconds
    pub fn item_ttl(mut self, ttl: Duration) -> Self {
        self.item_ttl = Some(ttl);
        self
    }

    /// Default: 60 seconds
    pub fn listing_ttl(mut self, ttl: Duration) -> Self {
        self.listing_ttl = Some(ttl);
        self
    }

    /// Default: 30 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Default: true
    pub fn expand_thumbnails(mut self, expand: bool) -> Self {
        self.expand_thumbnails = Some(expand);
        self
    }

    /// Builds the final `AddonConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No `AccountManager` was provided
    /// - No `HttpClient` or `KeyValueCache` was provided and `desktop-shims` is disabled
    /// - Validation fails (see [`AddonConfig::validate`])
    pub fn build(self) -> Result<AddonConfig> {
        let account_manager = self
            .account_manager
            .ok_or_else(account_manager_missing_error)?;

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let cache = match self.cache {
            Some(cache) => cache,
            None => provide_default_cache()?,
        };

        let graph_base_url = self
            .graph_base_url
            .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let config = AddonConfig {
            addon_id: self
                .addon_id
                .unwrap_or_else(|| DEFAULT_ADDON_ID.to_string()),
            graph_base_url,
            http_client,
            account_manager,
            cache,
            item_ttl: self.item_ttl.unwrap_or(DEFAULT_ITEM_TTL),
            listing_ttl: self.listing_ttl.unwrap_or(DEFAULT_LISTING_TTL),
            request_timeout,
            expand_thumbnails: self.expand_thumbnails.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
