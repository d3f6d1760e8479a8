//! Account and Token Abstractions
//!
//! The host framework owns sign-in, token refresh and account persistence. The
//! adapter only needs a currently valid access token for the drive it is about
//! to query.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::error::Result;

/// Token set handed out by the host account manager.
///
/// # Examples
///
/// ```
/// use bridge_traits::account::AccessTokens;
/// use chrono::{Duration, Utc};
///
/// let tokens = AccessTokens::new("EwB4A8l6...", Utc::now() + Duration::hours(1));
/// assert!(!tokens.is_expired_with_buffer(60));
/// ```
#[derive(Clone)]
pub struct AccessTokens {
    /// The access token used for Graph requests
    pub access_token: String,
    /// The refresh token, when the host chooses to expose it
    pub refresh_token: Option<String>,
    /// When the access token expires (UTC)
    pub expires_at: DateTime<Utc>,
}

impl AccessTokens {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Check if the access token is expired or expires within `buffer_seconds`
    pub fn is_expired_with_buffer(&self, buffer_seconds: i64) -> bool {
        Utc::now() >= self.expires_at - Duration::seconds(buffer_seconds)
    }

    /// Value for an `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for AccessTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokens")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Host account manager.
///
/// Resolves which signed-in account owns a drive and returns a valid token for
/// it, refreshing first when needed.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::account::AccountManager;
///
/// async fn authorize(accounts: &dyn AccountManager, drive_id: &str) -> Result<String> {
///     let tokens = accounts.get_access_tokens(drive_id).await?;
///     Ok(tokens.bearer())
/// }
/// ```
#[async_trait]
pub trait AccountManager: Send + Sync {
    /// Get a valid token set for the account that owns `drive_id`
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::NotAvailable`](crate::error::BridgeError::NotAvailable)
    /// when no signed-in account owns the drive.
    async fn get_access_tokens(&self, drive_id: &str) -> Result<AccessTokens>;
}
