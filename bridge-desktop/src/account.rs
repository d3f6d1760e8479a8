//! Account manager backed by pre-registered tokens

use async_trait::async_trait;
use bridge_traits::{
    account::{AccessTokens, AccountManager},
    error::{BridgeError, Result},
};
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// `AccountManager` for desktop tools and tests
///
/// Tokens are registered per drive id, optionally with a fallback token used
/// for any drive not registered explicitly. Refreshing is the caller's job:
/// register a fresh token set to replace an expired one.
#[derive(Default)]
pub struct StaticAccountManager {
    tokens: RwLock<HashMap<String, AccessTokens>>,
    default_tokens: Option<AccessTokens>,
}

impl StaticAccountManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one access token for every drive, valid for an hour
    pub fn with_default_token(access_token: impl Into<String>) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            default_tokens: Some(AccessTokens::new(
                access_token,
                Utc::now() + Duration::hours(1),
            )),
        }
    }

    /// Register or replace the token set for a drive
    pub async fn register(&self, drive_id: impl Into<String>, tokens: AccessTokens) {
        let drive_id = drive_id.into();
        debug!(drive_id = %drive_id, "Registered drive tokens");
        self.tokens.write().await.insert(drive_id, tokens);
    }

    /// Forget a drive's tokens
    pub async fn remove(&self, drive_id: &str) -> bool {
        self.tokens.write().await.remove(drive_id).is_some()
    }
}

#[async_trait]
impl AccountManager for StaticAccountManager {
    async fn get_access_tokens(&self, drive_id: &str) -> Result<AccessTokens> {
        let tokens = self.tokens.read().await;
        let found = tokens
            .get(drive_id)
            .or(self.default_tokens.as_ref())
            .cloned()
            .ok_or_else(|| {
                BridgeError::NotAvailable(format!("No account signed in for drive {}", drive_id))
            })?;

        if found.is_expired_with_buffer(0) {
            return Err(BridgeError::NotAvailable(format!(
                "Access token for drive {} has expired",
                drive_id
            )));
        }

        Ok(found)
    }
}
