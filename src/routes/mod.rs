//! Route assembly.

mod common;
mod rows;

pub use common::common_routes;
pub use rows::{row_routes, BODY_LIMIT};

use crate::state::AppState;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application: operational routes, row routes, body limit and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(row_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
}
