//! Path segments for the row routes, rejected as [`AppError`] so every failure
//! keeps the `{error}` body.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::{
        path::ErrorKind,
        rejection::PathRejection,
        FromRequestParts, Path,
    },
    http::request::Parts,
};

/// `/:collection`.
#[derive(Clone, Debug)]
pub struct TablePath(pub String);

/// `/:collection/:id` with the id already checked.
#[derive(Clone, Debug)]
pub struct RowPath {
    pub collection: String,
    pub id: i64,
}

/// Strict id rule: ASCII digits only, fits in i64, at least 1.
pub fn parse_id(id_str: &str) -> Result<i64, AppError> {
    if id_str.is_empty() || !id_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::NonNumericId);
    }
    match id_str.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(AppError::NonNumericId),
    }
}

/// A segment that does not decode to UTF-8 is reported by the segment it hit.
fn path_error(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(e) => match e.kind() {
            ErrorKind::InvalidUtf8InPathParam { key } if key == "collection" => AppError::InvalidTable,
            ErrorKind::InvalidUtf8InPathParam { .. } => AppError::NonNumericId,
            _ => AppError::BadRequest(e.body_text()),
        },
        other => AppError::BadRequest(other.body_text()),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TablePath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(collection) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(path_error)?;
        Ok(TablePath(collection))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RowPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((collection, id_str)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(path_error)?;
        let id = parse_id(&id_str)?;
        Ok(RowPath { collection, id })
    }
}
