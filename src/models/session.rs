//! Shared-password login payloads.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// A dashboard session handed out on login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    /// RFC 3339 expiry timestamp.
    pub expires_at: String,
}
