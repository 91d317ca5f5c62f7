//! PostgreSQL row store over a shared sqlx pool.

use super::RowStore;
use crate::config::{ColumnType, DbSettings, TableDef, PRIMARY_KEY};
use crate::error::StoreError;
use crate::service::DecodedRow;
use crate::sql::{self, bind_all, quoted, QueryBuf, SqlValue};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{ConnectOptions, PgPool, Row};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<PgRow>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        Ok(bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let result = bind_all(sqlx::query(&q.sql), &q.params)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl RowStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn exists(&self, table: &TableDef, id: i64) -> Result<bool, StoreError> {
        let q = sql::exists(table, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let found: bool = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_one(&self.pool)
            .await?
            .try_get(0)?;
        Ok(found)
    }

    async fn fetch(&self, table: &TableDef, id: i64) -> Result<Option<Value>, StoreError> {
        let q = sql::select_by_id(table, id);
        match self.fetch_optional(&q).await? {
            Some(row) => Ok(Some(row_to_json(table, &row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, table: &TableDef, row: &DecodedRow) -> Result<i64, StoreError> {
        let q = sql::insert(table, row.columns());
        let created = self
            .fetch_optional(&q)
            .await?
            .ok_or(StoreError::Db(sqlx::Error::RowNotFound))?;
        let id: i32 = created.try_get(PRIMARY_KEY)?;
        Ok(id.into())
    }

    async fn update(&self, table: &TableDef, id: i64, row: &DecodedRow) -> Result<u64, StoreError> {
        match sql::update(table, id, row.columns()) {
            Some(q) => self.execute(&q).await,
            None => Ok(0),
        }
    }

    async fn delete(&self, table: &TableDef, id: i64) -> Result<u64, StoreError> {
        self.execute(&sql::delete(table, id)).await
    }
}

/// Decode each column by its declared type; decimals arrive as text.
fn row_to_json(table: &TableDef, row: &PgRow) -> Result<Value, sqlx::Error> {
    let mut map = Map::new();
    let id: i32 = row.try_get(PRIMARY_KEY)?;
    map.insert(PRIMARY_KEY.to_string(), Value::from(id));
    for col in &table.columns {
        let name = col.name.as_str();
        let value = match col.type_ {
            ColumnType::Integer => row.try_get::<Option<i32>, _>(name)?.map(Value::from),
            ColumnType::String { .. } | ColumnType::Decimal { .. } => {
                row.try_get::<Option<String>, _>(name)?.map(Value::String)
            }
            ColumnType::Timestamp => row
                .try_get::<Option<DateTime<Utc>>, _>(name)?
                .map(|t| SqlValue::Timestamp(t).to_json()),
        };
        map.insert(col.name.clone(), value.unwrap_or(Value::Null));
    }
    Ok(Value::Object(map))
}

/// Create the configured database if it does not exist yet, via the `postgres`
/// maintenance database.
pub async fn ensure_database_exists(settings: &DbSettings) -> Result<(), StoreError> {
    if settings.database.is_empty() || settings.database == "postgres" {
        return Ok(());
    }
    let mut conn = settings.admin_connect_options().connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&settings.database)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %settings.database, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&settings.database)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}
