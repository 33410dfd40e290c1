//! Account API endpoints.

use axum::{extract::State, Json};

use super::{acknowledged, confirmed, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Account, DeleteAccountRequest, UpdateAccountRequest};
use crate::validation::validate_account;
use crate::AppState;

/// GET /api/accounts - List all accounts.
pub async fn list_accounts(State(state): State<AppState>) -> ApiResult<Vec<Account>> {
    success(state.repo.list_accounts().await?)
}

/// POST /api/accounts - Create a new account.
pub async fn create_account(
    State(state): State<AppState>,
    Json(account): Json<Account>,
) -> ApiResult<Account> {
    validate_account(&account).map_err(AppError::Validation)?;

    let created = state.repo.create_account(&account).await?;
    tracing::info!("Created account {}", created.key());
    confirmed(created, "账号创建成功")
}

/// PUT /api/accounts - Replace the account stored under `accountId`.
pub async fn update_account(
    State(state): State<AppState>,
    Json(request): Json<UpdateAccountRequest>,
) -> ApiResult<Account> {
    validate_account(&request.updated_data).map_err(AppError::Validation)?;

    let updated = state
        .repo
        .update_account(&request.account_id, &request.updated_data)
        .await?;
    tracing::info!("Updated account {} -> {}", request.account_id, updated.key());
    confirmed(updated, "账号信息更新成功")
}

/// DELETE /api/accounts - Delete an account by `creatorId-platform` key.
pub async fn delete_account(
    State(state): State<AppState>,
    Json(request): Json<DeleteAccountRequest>,
) -> ApiResult<()> {
    state.repo.delete_account(&request.account_id).await?;
    tracing::info!("Deleted account {}", request.account_id);
    acknowledged("账号删除成功")
}
