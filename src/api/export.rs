//! Export endpoint.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppError;
use crate::models::{Account, Creator, Deal, ExportFormat, ExportRequest, RecordKind};
use crate::transfer::{write_csv, write_json};
use crate::AppState;

/// POST /api/export - Render rows as a downloadable file.
///
/// Exports the rows sent in `data` (the dashboard's current view) or, when absent, the
/// whole collection.
pub async fn export_records(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let format: ExportFormat = request.format.parse().map_err(AppError::BadRequest)?;

    let body = match request.kind {
        RecordKind::Creators => {
            let rows: Vec<Creator> = match request.data {
                Some(data) => rows_from(data)?,
                None => state.repo.list_creators().await?,
            };
            render(&rows, format)?
        }
        RecordKind::Accounts => {
            let rows: Vec<Account> = match request.data {
                Some(data) => rows_from(data)?,
                None => state.repo.list_accounts().await?,
            };
            render(&rows, format)?
        }
        RecordKind::Deals => {
            let rows: Vec<Deal> = match request.data {
                Some(data) => rows_from(data)?,
                None => state.repo.list_deals().await?,
            };
            render(&rows, format)?
        }
    };

    let filename = format!(
        "{}_{}.{}",
        request.kind,
        chrono::Local::now().format("%Y%m%d"),
        format.extension()
    );
    tracing::info!("Exported {} ({} bytes)", filename, body.len());

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

fn rows_from<T: DeserializeOwned>(data: serde_json::Value) -> Result<Vec<T>, AppError> {
    Ok(serde_json::from_value(data)?)
}

fn render<T: Serialize>(rows: &[T], format: ExportFormat) -> Result<Vec<u8>, AppError> {
    match format {
        ExportFormat::Csv => write_csv(rows),
        ExportFormat::Json => write_json(rows),
    }
}
