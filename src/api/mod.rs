//! REST API module.
//!
//! Contains all API routes and handlers following the dashboard's request shapes.

mod accounts;
mod auth;
mod creators;
mod deals;
mod export;
mod import;

pub use accounts::*;
pub use auth::*;
pub use creators::*;
pub use deals::*;
pub use export::*;
pub use import::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Create a successful API response carrying a confirmation message.
pub fn confirmed<T: Serialize>(data: T, message: impl Into<String>) -> ApiResult<T> {
    Ok(ApiResponse::new(data).with_message(message))
}

/// Create a successful API response with only a message.
pub fn acknowledged(message: impl Into<String>) -> ApiResult<()> {
    Ok(ApiResponse {
        success: true,
        data: None,
        message: Some(message.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;

    #[test]
    fn test_envelope_decodes_payload_without_default() {
        let body = r#"{"success":true,"data":{"token":"abc","expiresAt":"2026-01-01T00:00:00Z"}}"#;
        let envelope: ApiResponse<Session> = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.unwrap().token, "abc");
        assert!(envelope.message.is_none());

        let body = r#"{"success":true,"message":"Logged out"}"#;
        let envelope: ApiResponse<Session> = serde_json::from_str(body).unwrap();
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("Logged out"));
    }
}
