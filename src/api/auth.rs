//! Dashboard login endpoints.

use axum::{
    extract::{Request, State},
    Json,
};

use super::{acknowledged, success, ApiResult};
use crate::auth::{bearer_token, constant_time_compare};
use crate::errors::AppError;
use crate::models::{LoginRequest, Session};
use crate::AppState;

/// POST /api/auth/login - Exchange the shared password for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Session> {
    let Some(expected) = state.config.access_password.as_deref() else {
        return Err(AppError::BadRequest(
            "Password login is not enabled".to_string(),
        ));
    };

    if !constant_time_compare(&request.password, expected) {
        tracing::warn!("Rejected dashboard login attempt");
        return Err(AppError::Unauthorized("Incorrect password".to_string()));
    }

    let session = state.sessions.create().await;
    tracing::info!("Dashboard session issued, expires {}", session.expires_at);
    success(session)
}

/// POST /api/auth/logout - Revoke the caller's session token.
pub async fn logout(State(state): State<AppState>, request: Request) -> ApiResult<()> {
    if let Some(token) = bearer_token(&request) {
        state.sessions.revoke(&token).await;
    }
    acknowledged("已退出登录")
}
