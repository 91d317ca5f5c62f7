//! table-rest server: reads settings from the environment, prepares the store,
//! and serves row CRUD over HTTP.
//!
//! Run from repo root: `cargo run -p table-rest-server`

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use table_rest::config::Dialect;
use table_rest::{
    app, ensure_database_exists, load_registry, sync_tables, AppState, MemoryStore, PgStore, RowStore, Settings,
};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("table_rest=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    tracing::debug!(?settings, "settings");
    let registry = load_registry(settings.schema_path.as_deref()).await?;

    let store: Arc<dyn RowStore> = match settings.db.dialect {
        Dialect::Memory => {
            tracing::warn!("using in-memory store; rows are lost on exit");
            Arc::new(MemoryStore::new())
        }
        Dialect::Postgres => {
            ensure_database_exists(&settings.db).await?;
            let pool = PgPoolOptions::new()
                .max_connections(settings.db.max_connections)
                .connect_with(settings.db.connect_options())
                .await?;
            sync_tables(&pool, &registry, settings.sync).await?;
            Arc::new(PgStore::new(pool))
        }
    };

    let state = AppState::new(registry, store);
    let listener = TcpListener::bind(("0.0.0.0", settings.port)).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
