//! Row CRUD handlers: read, create, update, delete.
//!
//! Path extractors run before [`RowData`], so a bad id is reported before the
//! body is read.

use crate::error::AppError;
use crate::extractors::{RowData, RowPath, TablePath};
use crate::response::success;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn read(
    State(state): State<AppState>,
    RowPath { collection, id }: RowPath,
) -> Result<impl IntoResponse, AppError> {
    let found = state.rows().read(&collection, id).await?;
    Ok(success(found))
}

pub async fn create(
    State(state): State<AppState>,
    TablePath(collection): TablePath,
    RowData(fields): RowData,
) -> Result<impl IntoResponse, AppError> {
    let created = state.rows().create(&collection, &fields).await?;
    Ok(success(created))
}

pub async fn update(
    State(state): State<AppState>,
    RowPath { collection, id }: RowPath,
    RowData(fields): RowData,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.rows().update(&collection, id, &fields).await?;
    Ok(success(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    RowPath { collection, id }: RowPath,
) -> Result<impl IntoResponse, AppError> {
    let removed = state.rows().delete(&collection, id).await?;
    Ok(success(removed))
}
