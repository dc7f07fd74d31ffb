//! Crate Error Taxonomy
//!
//! Local failures (`InvalidIdentifier`, `BadFilterValue`) are caller mistakes.
//! Remote failures (`RemoteUnavailable`, `MalformedResponse`) are isolated per
//! sub-fetch during a harvest and only surface through the HTTP layer.
//! `StorageFailure` is fatal to a harvest run.

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxaError {
    #[error("invalid species identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("remote service unavailable at {url}: {reason}")]
    RemoteUnavailable { url: String, reason: String },
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },
    #[error("storage failure at {path}: {reason}")]
    StorageFailure { path: String, reason: String },
    #[error("bad value for filter field '{field}': {value:?}")]
    BadFilterValue { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, TaxaError>;

impl TaxaError {
    pub fn storage(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::StorageFailure {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status used when the error reaches an API caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            TaxaError::InvalidIdentifier(_) | TaxaError::BadFilterValue { .. } => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
