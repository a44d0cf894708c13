//! Errors raised while building the catalog.
//!
//! Rows skipped during loading are not errors; they are tallied in
//! [`crate::dataset::LoadReport`]. Everything here aborts the run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Missing {kind}: {}", path.display())]
    MissingSource { kind: &'static str, path: PathBuf },

    #[error("{kind} is missing column {column:?}")]
    MissingColumn {
        kind: &'static str,
        column: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record {id}: invalid {field} value {value:?}")]
    InvalidField {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("Curated list line {line}: {reason}")]
    InvalidCuratedRow { line: u64, reason: String },
}

impl CatalogError {
    pub(crate) fn invalid_field(id: &str, field: &'static str, value: &str) -> Self {
        Self::InvalidField {
            id: id.to_string(),
            field,
            value: value.to_string(),
        }
    }
}
