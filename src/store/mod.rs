//! Row storage behind the row service: PostgreSQL in production, an in-process
//! map for tests and local runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::config::TableDef;
use crate::error::StoreError;
use crate::service::DecodedRow;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait RowStore: Send + Sync {
    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Whether a row with `id` exists, without fetching it.
    async fn exists(&self, table: &TableDef, id: i64) -> Result<bool, StoreError>;

    /// The full row as a JSON object (primary key included), or None.
    async fn fetch(&self, table: &TableDef, id: i64) -> Result<Option<Value>, StoreError>;

    /// Insert and return the assigned id.
    async fn insert(&self, table: &TableDef, row: &DecodedRow) -> Result<i64, StoreError>;

    /// Apply the given columns to one row. Returns rows affected.
    async fn update(&self, table: &TableDef, id: i64, row: &DecodedRow) -> Result<u64, StoreError>;

    /// Returns rows affected.
    async fn delete(&self, table: &TableDef, id: i64) -> Result<u64, StoreError>;
}
