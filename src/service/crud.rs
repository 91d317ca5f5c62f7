//! Generic row CRUD over the schema registry and a row store.

use crate::config::{SchemaRegistry, TableDef};
use crate::error::{AppError, StoreError};
use crate::response::{RowCreated, RowFound, RowRemoved, RowUpdated};
use crate::service::{RawFields, RowDecoder};
use crate::store::RowStore;

/// Every operation resolves to a payload or exactly one client-facing error;
/// store faults are logged and folded into [`AppError::Store`].
pub struct RowService<'a> {
    registry: &'a SchemaRegistry,
    store: &'a dyn RowStore,
}

impl<'a> RowService<'a> {
    pub fn new(registry: &'a SchemaRegistry, store: &'a dyn RowStore) -> Self {
        RowService { registry, store }
    }

    pub async fn read(&self, table: &str, id: i64) -> Result<RowFound, AppError> {
        let table = self.table(table)?;
        self.ensure_row(table, id).await?;
        let row = self
            .store
            .fetch(table, id)
            .await
            .map_err(|e| store_failure(table, "read", e))?
            .ok_or(AppError::InvalidId)?;
        Ok(RowFound { row })
    }

    pub async fn create(&self, table: &str, fields: &RawFields) -> Result<RowCreated, AppError> {
        let table = self.table(table)?;
        let row = RowDecoder::decode_insert(table, fields)?;
        let id = self
            .store
            .insert(table, &row)
            .await
            .map_err(|e| store_failure(table, "create", e))?;
        tracing::info!(table = %table.name, id, "row created");
        Ok(RowCreated { row_created: true, id })
    }

    pub async fn update(&self, table: &str, id: i64, fields: &RawFields) -> Result<RowUpdated, AppError> {
        let table = self.table(table)?;
        self.ensure_row(table, id).await?;
        let row = RowDecoder::decode_update(table, fields)?;
        if !row.is_empty() {
            let affected = self
                .store
                .update(table, id, &row)
                .await
                .map_err(|e| store_failure(table, "update", e))?;
            // removed between the existence check and the write
            if affected == 0 {
                return Err(AppError::InvalidId);
            }
        }
        tracing::info!(table = %table.name, id, columns = row.columns().len(), "row updated");
        Ok(RowUpdated { row_updated: true })
    }

    /// A failed removal is reported as `row_removed: false`, not as an error.
    pub async fn delete(&self, table: &str, id: i64) -> Result<RowRemoved, AppError> {
        let table = self.table(table)?;
        self.ensure_row(table, id).await?;
        let row_removed = match self.store.delete(table, id).await {
            Ok(n) => n > 0,
            Err(e) => {
                tracing::warn!(table = %table.name, id, error = %e, "row removal failed");
                false
            }
        };
        if row_removed {
            tracing::info!(table = %table.name, id, "row removed");
        }
        Ok(RowRemoved { row_removed })
    }

    fn table(&self, name: &str) -> Result<&'a TableDef, AppError> {
        self.registry.table(name).ok_or(AppError::InvalidTable)
    }

    async fn ensure_row(&self, table: &TableDef, id: i64) -> Result<(), AppError> {
        let found = self
            .store
            .exists(table, id)
            .await
            .map_err(|e| store_failure(table, "exists", e))?;
        if found {
            Ok(())
        } else {
            Err(AppError::InvalidId)
        }
    }
}

fn store_failure(table: &TableDef, op: &'static str, e: StoreError) -> AppError {
    tracing::error!(table = %table.name, op, error = %e, "store failure");
    e.into()
}
