//! table-rest: generic REST CRUD over a registry of relational tables.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{load_registry, SchemaRegistry, Settings, TableDef};
pub use error::{AppError, ConfigError, StoreError};
pub use migration::sync_tables;
pub use routes::{app, common_routes, row_routes};
pub use service::RowService;
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, RowStore};
