//! In-process row store. Rows live in per-table ordered maps and ids are
//! assigned from a per-table counter, like a SERIAL column.

use super::RowStore;
use crate::config::{TableDef, PRIMARY_KEY};
use crate::error::StoreError;
use crate::service::DecodedRow;
use crate::sql::SqlValue;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct MemTable {
    last_id: i64,
    rows: BTreeMap<i64, HashMap<String, SqlValue>>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, MemTable>>,
    calls: AtomicUsize,
    fail_deletes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations served so far (ping excluded).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every later delete fail, as a lost connection would.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, MemTable>>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, MemTable>>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn exists(&self, table: &TableDef, id: i64) -> Result<bool, StoreError> {
        let tables = self.read()?;
        Ok(tables.get(&table.name).is_some_and(|t| t.rows.contains_key(&id)))
    }

    async fn fetch(&self, table: &TableDef, id: i64) -> Result<Option<Value>, StoreError> {
        let tables = self.read()?;
        let Some(stored) = tables.get(&table.name).and_then(|t| t.rows.get(&id)) else {
            return Ok(None);
        };
        let mut map = Map::new();
        map.insert(PRIMARY_KEY.to_string(), Value::from(id));
        for col in &table.columns {
            let v = stored.get(&col.name).map(SqlValue::to_json).unwrap_or(Value::Null);
            map.insert(col.name.clone(), v);
        }
        Ok(Some(Value::Object(map)))
    }

    async fn insert(&self, table: &TableDef, row: &DecodedRow) -> Result<i64, StoreError> {
        let mut tables = self.write()?;
        let t = tables.entry(table.name.clone()).or_default();
        t.last_id += 1;
        let id = t.last_id;
        let values = row
            .columns()
            .iter()
            .filter(|(name, _)| table.column(name).is_some())
            .cloned()
            .collect();
        t.rows.insert(id, values);
        Ok(id)
    }

    async fn update(&self, table: &TableDef, id: i64, row: &DecodedRow) -> Result<u64, StoreError> {
        let mut tables = self.write()?;
        let Some(stored) = tables.get_mut(&table.name).and_then(|t| t.rows.get_mut(&id)) else {
            return Ok(0);
        };
        for (name, v) in row.columns() {
            if table.column(name).is_some() {
                stored.insert(name.clone(), v.clone());
            }
        }
        Ok(1)
    }

    async fn delete(&self, table: &TableDef, id: i64) -> Result<u64, StoreError> {
        let mut tables = self.write()?;
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("delete rejected".into()));
        }
        let removed = tables.get_mut(&table.name).and_then(|t| t.rows.remove(&id));
        Ok(removed.map_or(0, |_| 1))
    }
}
