//! Error types for the Taskboard SDK

use crate::validation::ValidationErrors;
use taskboard_client::ClientError;
use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK error types
#[derive(Error, Debug, Clone)]
pub enum SdkError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (connect, timeout, transport)
    #[error("Network error: {0}")]
    Network(String),

    /// Gateway answered with an error
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Response did not have the expected shape
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Input rejected before reaching the gateway
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Role does not allow the action
    #[error("Access denied: {action} requires {required}, have {actual}")]
    AccessDenied {
        action: String,
        required: String,
        actual: String,
    },

    /// No authenticated session
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SdkError {
    /// Message for the user-facing error channel.
    ///
    /// Gateway messages are passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            SdkError::Server { message, .. } => message.clone(),
            SdkError::NotFound(what) => format!("{} not found", what),
            other => other.to_string(),
        }
    }
}

impl From<ClientError> for SdkError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Server { status, message } => SdkError::Server { status, message },
            ClientError::NotFound(what) => SdkError::NotFound(what),
            ClientError::Http(e) => SdkError::Network(e.to_string()),
            ClientError::Json(e) => SdkError::Serialization(e.to_string()),
            ClientError::InvalidResponse(msg) => SdkError::Serialization(msg),
            ClientError::Config(msg) => SdkError::Config(msg),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}

impl From<ValidationErrors> for SdkError {
    fn from(errors: ValidationErrors) -> Self {
        SdkError::Validation(errors)
    }
}
