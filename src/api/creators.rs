//! Creator API endpoints.

use axum::{extract::State, Json};

use super::{acknowledged, confirmed, success, ApiResult};
use crate::errors::AppError;
use crate::models::{generate_creator_id, Creator, DeleteCreatorRequest, UpdateCreatorRequest};
use crate::validation::validate_creator;
use crate::AppState;

/// GET /api/creators - List all creators.
pub async fn list_creators(State(state): State<AppState>) -> ApiResult<Vec<Creator>> {
    success(state.repo.list_creators().await?)
}

/// POST /api/creators - Create a new creator.
pub async fn create_creator(
    State(state): State<AppState>,
    Json(mut creator): Json<Creator>,
) -> ApiResult<Creator> {
    validate_creator(&creator).map_err(AppError::Validation)?;

    if creator.id.trim().is_empty() {
        creator.id = generate_creator_id(chrono::Local::now().date_naive());
    }

    let created = state.repo.create_creator(&creator).await?;
    tracing::info!("Created creator {}", created.id);
    confirmed(created, "达人创建成功")
}

/// PUT /api/creators - Replace a creator.
pub async fn update_creator(
    State(state): State<AppState>,
    Json(request): Json<UpdateCreatorRequest>,
) -> ApiResult<Creator> {
    validate_creator(&request.updated_data).map_err(AppError::Validation)?;

    let updated = state
        .repo
        .update_creator(&request.creator_id, &request.updated_data)
        .await?;
    tracing::info!("Updated creator {}", updated.id);
    confirmed(updated, "达人信息更新成功")
}

/// DELETE /api/creators - Delete a creator.
pub async fn delete_creator(
    State(state): State<AppState>,
    Json(request): Json<DeleteCreatorRequest>,
) -> ApiResult<()> {
    state.repo.delete_creator(&request.creator_id).await?;
    tracing::info!("Deleted creator {}", request.creator_id);
    acknowledged("达人删除成功")
}
