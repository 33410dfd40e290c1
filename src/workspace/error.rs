//! Client and workspace error types

use thiserror::Error;

use crate::validation::{summarize, FieldError};

/// Store client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Missing or rejected credentials
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// The store answered with an error envelope or `success: false`
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Message suitable for a user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized(message) | ClientError::Rejected { message, .. } => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Invalid record: {}", summarize(.0))]
    Invalid(Vec<FieldError>),

    #[error("Not logged in")]
    NotAuthenticated,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect password")]
    InvalidPassword,

    #[error(transparent)]
    Client(ClientError),
}

impl From<ClientError> for AuthError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized(_) => AuthError::InvalidPassword,
            other => AuthError::Client(other),
        }
    }
}
