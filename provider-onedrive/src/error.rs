//! Error types for the OneDrive provider

use thiserror::Error;

/// OneDrive provider errors
#[derive(Error, Debug)]
pub enum OneDriveError {
    /// Graph returned a non-success status
    #[error("Graph API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Graph asked us to slow down; the host decides whether to retry
    #[error("Throttled, retry after {0} seconds")]
    Throttled(u64),

    /// Token rejected by Graph
    #[error("Authentication required")]
    AuthRequired,

    /// Item or folder does not exist
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The host cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Request could not be built from the given arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bridge error
    #[error(transparent)]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, OneDriveError>;

impl From<OneDriveError> for bridge_traits::error::BridgeError {
    fn from(error: OneDriveError) -> Self {
        use bridge_traits::error::BridgeError;

        match error {
            OneDriveError::Bridge(e) => e,
            OneDriveError::AuthRequired => {
                BridgeError::NotAvailable("OneDrive authentication required".to_string())
            }
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;

    #[test]
    fn test_error_display() {
        let error = OneDriveError::ApiError {
            status_code: 400,
            message: "Invalid request".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Graph API error (status 400): Invalid request"
        );
        assert_eq!(
            OneDriveError::Throttled(12).to_string(),
            "Throttled, retry after 12 seconds"
        );
    }

    #[test]
    fn test_error_conversion() {
        let bridge_error: BridgeError = OneDriveError::AuthRequired.into();
        assert!(matches!(bridge_error, BridgeError::NotAvailable(_)));

        let bridge_error: BridgeError = OneDriveError::Cancelled.into();
        assert!(matches!(bridge_error, BridgeError::OperationFailed(_)));

        let original = BridgeError::OperationFailed("socket closed".to_string());
        let bridge_error: BridgeError = OneDriveError::from(original).into();
        assert_eq!(
            bridge_error.to_string(),
            "Bridge operation failed: socket closed"
        );
    }
}
