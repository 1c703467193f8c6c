//! Error types for the WorkNow client.

use reqwest::StatusCode;

/// Top-level error type for the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),
}

impl Error {
    /// Short message suitable for a toast body.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Status {
                message: Some(message),
                ..
            }) => message.clone(),
            Self::Api(ApiError::Network(_)) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Validation(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Key-value storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend failed to open: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote API errors.
///
/// Every non-2xx response is one failure class; the optional `message`
/// comes from the JSON error body when the server sends one.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request to {endpoint} failed with {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Status {
        endpoint: String,
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid resource id: {0:?}")]
    InvalidId(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Session storage error: {0}")]
    Session(#[from] StorageError),
}

/// Client-side validation failures, checked before submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("Phone number must have exactly {expected} digits, got {actual}")]
    PhoneDigits { expected: usize, actual: usize },

    #[error("Phone number may only contain digits and separators: {0}")]
    PhoneFormat(String),

    #[error("Invalid email address: {0}")]
    Email(String),

    #[error("{field} must be a positive amount")]
    Amount { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

/// Editable record state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Record is {state}, cannot {action}")]
    InvalidTransition { state: String, action: String },
}

/// Result type alias for the client.
pub type Result<T> = std::result::Result<T, Error>;
