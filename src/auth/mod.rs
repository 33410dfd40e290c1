//! Access gate for `/api/*`.
//!
//! Two optional credentials are accepted: the machine PSK and dashboard session tokens
//! obtained with the shared password. The shared password is a convenience gate for a
//! small team, not an identity system.

mod session;

pub use session::SessionStore;

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, ErrorDetails, ErrorResponse};

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Credentials the gate accepts.
#[derive(Clone)]
pub struct AuthGate {
    pub psk: Option<String>,
    /// Present when password login is enabled.
    pub sessions: Option<Arc<SessionStore>>,
}

impl AuthGate {
    fn is_open(&self) -> bool {
        self.psk.is_none() && self.sessions.is_none()
    }

    async fn accepts(&self, credential: &str) -> bool {
        if let Some(expected) = &self.psk {
            if constant_time_compare(credential, expected) {
                return true;
            }
        }
        match &self.sessions {
            Some(sessions) => sessions.is_valid(credential).await,
            None => false,
        }
    }
}

/// Authentication layer function that takes the gate as a parameter.
pub async fn auth_layer(gate: AuthGate, request: Request, next: Next) -> Response {
    // Nothing configured: allow all requests (dev mode)
    if gate.is_open() {
        return next.run(request).await;
    }

    let api_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let credential = api_key.or_else(|| bearer_token(&request));

    match credential {
        Some(credential) if gate.accepts(&credential).await => next.run(request).await,
        Some(_) => unauthorized_response("Invalid API key or session"),
        None => unauthorized_response("Missing API key or session"),
    }
}

/// Extract the token from an `Authorization: Bearer` header.
pub fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
}

/// Perform constant-time string comparison.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        message: message.to_string(),
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
            details: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[tokio::test]
    async fn test_gate_accepts_psk_or_session() {
        let sessions = Arc::new(SessionStore::new(std::time::Duration::from_secs(60)));
        let gate = AuthGate {
            psk: Some("machine-key".to_string()),
            sessions: Some(sessions.clone()),
        };
        let session = sessions.create().await;

        assert!(!gate.is_open());
        assert!(gate.accepts("machine-key").await);
        assert!(gate.accepts(&session.token).await);
        assert!(!gate.accepts("guess").await);
    }
}
