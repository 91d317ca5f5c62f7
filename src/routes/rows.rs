//! Row CRUD routes. The collection segment names a table; the handlers resolve it.

use crate::handlers::rows::{create, delete as delete_handler, read, update};
use crate::state::AppState;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

/// Maximum accepted request body for create and update.
pub const BODY_LIMIT: usize = 64 * 1024;

/// Unsupported methods on a row path answer 404 like an unknown path.
async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

pub fn row_routes(state: AppState) -> Router {
    Router::new()
        .route("/:collection", post(create).fallback(not_found))
        .route(
            "/:collection/:id",
            get(read).post(update).delete(delete_handler).fallback(not_found),
        )
        .with_state(state)
}
