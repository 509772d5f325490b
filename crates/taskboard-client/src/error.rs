//! Error types for the REST client

use thiserror::Error;

/// REST client error
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned an error
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Message suitable for showing to a user.
    ///
    /// Server errors surface the API's own message verbatim.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Server { message, .. } => message.clone(),
            ClientError::NotFound(what) => format!("{} not found", what),
            other => other.to_string(),
        }
    }

    /// Whether the server rejected the credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Server { status: 401, .. })
    }

    /// Build a server error from a raw response body.
    ///
    /// The API answers failures with `{"message": "..."}`; other bodies are kept as-is.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.to_string());

        ClientError::Server { status, message }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
