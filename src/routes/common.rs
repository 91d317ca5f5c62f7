//! Operational routes under a `_` prefix so they never shadow a table name.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize)]
struct Readiness {
    ready: bool,
    store: &'static str,
    tables: usize,
}

/// Liveness only; never touches the store.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let tables = state.registry.tables().len();
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Readiness {
                ready: true,
                store: "ok",
                tables,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "store ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    ready: false,
                    store: "unavailable",
                    tables,
                }),
            )
        }
    }
}

async fn version(State(state): State<AppState>) -> Json<Value> {
    let tables: Vec<&str> = state.registry.tables().iter().map(|t| t.name.as_str()).collect();
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "tables": tables,
    }))
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/_health", get(health))
        .route("/_ready", get(ready))
        .route("/_version", get(version))
        .with_state(state)
}
