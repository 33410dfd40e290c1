//! Deal API endpoints.
//!
//! Shares arrive precomputed by the dashboard; the store keeps what it is given.

use axum::{extract::State, Json};

use super::{acknowledged, confirmed, success, ApiResult};
use crate::errors::AppError;
use crate::models::{generate_deal_id, Deal, DeleteDealRequest, UpdateDealRequest};
use crate::validation::validate_deal;
use crate::AppState;

/// GET /api/deals - List all deals.
pub async fn list_deals(State(state): State<AppState>) -> ApiResult<Vec<Deal>> {
    success(state.repo.list_deals().await?)
}

/// POST /api/deals - Create a new deal.
pub async fn create_deal(
    State(state): State<AppState>,
    Json(mut deal): Json<Deal>,
) -> ApiResult<Deal> {
    validate_deal(&deal).map_err(AppError::Validation)?;

    if deal.id.trim().is_empty() {
        deal.id = generate_deal_id(chrono::Local::now().date_naive());
    }

    let created = state.repo.create_deal(&deal).await?;
    tracing::info!(
        "Created deal {} for creator {} (amount {})",
        created.id,
        created.creator_id,
        created.amount
    );
    confirmed(created, "商务合作创建成功")
}

/// PUT /api/deals - Replace a deal.
pub async fn update_deal(
    State(state): State<AppState>,
    Json(request): Json<UpdateDealRequest>,
) -> ApiResult<Deal> {
    validate_deal(&request.updated_data).map_err(AppError::Validation)?;

    let updated = state
        .repo
        .update_deal(&request.deal_id, &request.updated_data)
        .await?;
    tracing::info!("Updated deal {}", updated.id);
    confirmed(updated, "商务合作更新成功")
}

/// DELETE /api/deals - Delete a deal.
pub async fn delete_deal(
    State(state): State<AppState>,
    Json(request): Json<DeleteDealRequest>,
) -> ApiResult<()> {
    state.repo.delete_deal(&request.deal_id).await?;
    tracing::info!("Deleted deal {}", request.deal_id);
    acknowledged("商务合作删除成功")
}
