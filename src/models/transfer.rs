//! Import and export payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Creator;

/// Which collection an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Creators,
    Accounts,
    Deals,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Creators => "creators",
            RecordKind::Accounts => "accounts",
            RecordKind::Deals => "deals",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("Unsupported export format: {}", other)),
        }
    }
}

/// Request body for `POST /api/export`.
///
/// `format` stays a string so unsupported formats reach the handler and get a proper error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub format: String,
    /// Rows to export; the full table when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Row-level validation summary of an import file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportValidation {
    pub valid: usize,
    pub invalid: usize,
    pub errors: Vec<String>,
}

/// Response body of `POST /api/import/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    pub success: bool,
    pub data: Vec<Creator>,
    pub validation: ImportValidation,
}

/// Outcome of `POST /api/import/creators`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}
