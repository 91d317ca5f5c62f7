//! Success payloads for row operations. Errors are rendered by
//! [`AppError`](crate::error::AppError); every success is a 200.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize, PartialEq)]
pub struct RowFound {
    pub row: Value,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RowCreated {
    pub row_created: bool,
    /// Id assigned by the store.
    pub id: i64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RowUpdated {
    pub row_updated: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RowRemoved {
    pub row_removed: bool,
}

pub fn success<T: Serialize>(payload: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(payload))
}
