//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Startup-time configuration failures. Never reach a request.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Env { var: &'static str, reason: String },
    #[error("unsupported dialect '{0}' (expected postgres or memory)")]
    UnsupportedDialect(String),
    #[error("schema: {0}")]
    Schema(String),
    #[error("schema load: {0}")]
    Load(String),
}

/// Failures raised by a [`RowStore`](crate::store::RowStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Every failure a row operation can end in. Each variant renders as the
/// message returned to the client.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AppError {
    #[error("The specified table name is invalid.")]
    InvalidTable,
    #[error("The specified ID doesn't exist in the table.")]
    InvalidId,
    #[error("The specified ID isn't numeric.")]
    NonNumericId,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Store(String),
    #[error("{0}")]
    BadRequest(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e.to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "request rejected");
        let body = ErrorBody {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
