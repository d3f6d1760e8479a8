//! Microsoft Graph transport
//!
//! `GraphClient` owns the HTTP client, the account manager and the API base
//! URL. Requests are issued through a [`DriveSession`], which binds the
//! client to the drive whose account supplies the bearer token.

use bridge_traits::account::AccountManager;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{OneDriveError, Result};
use crate::types::GraphErrorResponse;

/// Retry-After fallback when Graph omits or garbles the header
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// Graph API client shared by every drive
#[derive(Clone)]
pub struct GraphClient {
    http_client: Arc<dyn HttpClient>,
    account_manager: Arc<dyn AccountManager>,
    base_url: String,
    timeout: Duration,
}

impl GraphClient {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        account_manager: Arc<dyn AccountManager>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            account_manager,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Bind the client to the account that owns `drive_id`
    pub fn configure(&self, drive_id: impl Into<String>) -> DriveSession<'_> {
        DriveSession {
            client: self,
            drive_id: drive_id.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path_or_url` with `params` appended
    pub fn build_url(&self, path_or_url: &str, params: &[(&str, &str)]) -> String {
        let mut url = if is_absolute(path_or_url) {
            path_or_url.to_string()
        } else if path_or_url.starts_with('/') {
            format!("{}{}", self.base_url, path_or_url)
        } else {
            format!("{}/{}", self.base_url, path_or_url)
        };

        for (i, (key, value)) in params.iter().enumerate() {
            let separator = if i == 0 && !url.contains('?') { '?' } else { '&' };
            url.push(separator);
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        url
    }
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A [`GraphClient`] bound to one drive's account
#[derive(Debug, Clone)]
pub struct DriveSession<'a> {
    client: &'a GraphClient,
    drive_id: String,
}

impl DriveSession<'_> {
    pub fn drive_id(&self) -> &str {
        &self.drive_id
    }

    /// Current access token for the bound drive
    pub async fn access_token(&self) -> Result<String> {
        let tokens = self
            .client
            .account_manager
            .get_access_tokens(&self.drive_id)
            .await?;
        Ok(tokens.access_token)
    }

    /// GET a Graph resource and decode its JSON body.
    ///
    /// Relative paths are joined to the base URL; absolute URLs such as
    /// `@odata.nextLink` values are requested verbatim.
    #[instrument(skip(self, params), fields(drive_id = %self.drive_id))]
    pub async fn get<T: DeserializeOwned>(&self, path_or_url: &str, params: &[(&str, &str)]) -> Result<T> {
        if path_or_url.is_empty() {
            return Err(OneDriveError::InvalidRequest("empty request path".to_string()));
        }

        let url = self.client.build_url(path_or_url, params);
        let token = self.access_token().await?;

        let request = HttpRequest::get(url.as_str())
            .bearer_token(token)
            .header("Accept", "application/json")
            .timeout(self.client.timeout);

        debug!(url = %url, "Graph request");
        let response = self.client.http_client.execute(request).await?;

        decode_response(response)
    }
}

fn is_absolute(path_or_url: &str) -> bool {
    path_or_url.starts_with("https://") || path_or_url.starts_with("http://")
}

fn decode_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    let status = response.status;

    if response.is_success() {
        return serde_json::from_slice(&response.body).map_err(|e| {
            warn!(error = %e, "Failed to parse Graph response");
            OneDriveError::ParseError(e.to_string())
        });
    }

    let message = error_message(&response);
    warn!(status, message = %message, "Graph request failed");

    match status {
        401 => Err(OneDriveError::AuthRequired),
        404 => Err(OneDriveError::NotFound(message)),
        429 => {
            let retry_after = response
                .header("Retry-After")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            Err(OneDriveError::Throttled(retry_after))
        }
        _ => Err(OneDriveError::ApiError {
            status_code: status,
            message,
        }),
    }
}

/// Graph error message when the body carries one, the raw body otherwise
fn error_message(response: &HttpResponse) -> String {
    match serde_json::from_slice::<GraphErrorResponse>(&response.body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        Ok(envelope) => envelope.error.code,
        Err(_) => String::from_utf8_lossy(&response.body).into_owned(),
    }
}
