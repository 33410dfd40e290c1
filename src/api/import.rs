//! Creator import endpoints.

use axum::{
    extract::{Multipart, State},
    Json,
};

use super::{confirmed, ApiResult};
use crate::errors::AppError;
use crate::models::{generate_creator_id, ImportPreview, ImportSummary};
use crate::transfer::parse_creators_csv;
use crate::AppState;

/// Read the `file` part of a multipart upload.
async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(AppError::BadRequest("Missing 'file' field".to_string()))
}

/// POST /api/import/preview - Parse and validate an import file without writing.
pub async fn preview_import(multipart: Multipart) -> Result<Json<ImportPreview>, AppError> {
    let bytes = read_upload(multipart).await?;
    let parsed = parse_creators_csv(&bytes)?;

    tracing::info!(
        "Import preview: {} valid, {} invalid",
        parsed.validation.valid,
        parsed.validation.invalid
    );

    Ok(Json(ImportPreview {
        success: true,
        data: parsed.creators,
        validation: parsed.validation,
    }))
}

/// POST /api/import/creators - Upsert every valid row of an import file.
pub async fn import_creators(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<ImportSummary> {
    let bytes = read_upload(multipart).await?;
    let parsed = parse_creators_csv(&bytes)?;

    let today = chrono::Local::now().date_naive();
    let mut summary = ImportSummary {
        skipped: parsed.validation.invalid,
        errors: parsed.validation.errors,
        ..Default::default()
    };

    for mut creator in parsed.creators {
        if creator.id.trim().is_empty() {
            creator.id = generate_creator_id(today);
        }
        match state.repo.upsert_creator(&creator).await {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                summary.skipped += 1;
                summary
                    .errors
                    .push(format!("Creator {}: {}", creator.id, e.message()));
            }
        }
    }

    if !summary.errors.is_empty() {
        tracing::warn!("Creator import warnings:\n{}", summary.errors.join("\n"));
    }
    tracing::info!(
        "Imported {} creators ({} skipped)",
        summary.imported,
        summary.skipped
    );

    let message = format!("成功导入 {} 位达人", summary.imported);
    confirmed(summary, message)
}
