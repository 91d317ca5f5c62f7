//! Synchronize registered tables with the database at startup.

use crate::config::{SchemaRegistry, SyncMode, TableDef, PRIMARY_KEY};
use crate::error::StoreError;
use crate::sql::quoted;
use sqlx::PgPool;

/// CREATE TABLE IF NOT EXISTS with a SERIAL primary key and one column per definition.
pub fn create_table_sql(table: &TableDef) -> String {
    let mut col_defs = vec![format!("{} SERIAL PRIMARY KEY", quoted(PRIMARY_KEY))];
    for c in &table.columns {
        let mut def = format!("{} {}", quoted(&c.name), c.type_.pg_type());
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        col_defs.push(def);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quoted(&table.name),
        col_defs.join(", ")
    )
}

pub fn drop_table_sql(table: &TableDef) -> String {
    format!("DROP TABLE IF EXISTS {}", quoted(&table.name))
}

/// Apply `mode` to every registered table. `Force` drops existing data.
pub async fn sync_tables(pool: &PgPool, registry: &SchemaRegistry, mode: SyncMode) -> Result<(), StoreError> {
    if mode == SyncMode::None {
        return Ok(());
    }
    for table in registry.tables() {
        if mode == SyncMode::Force {
            tracing::warn!(table = %table.name, "dropping table");
            sqlx::query(&drop_table_sql(table)).execute(pool).await?;
        }
        let ddl = create_table_sql(table);
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(tables = registry.tables().len(), ?mode, "tables synchronized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::users_table;

    #[test]
    fn users_ddl() {
        assert_eq!(
            create_table_sql(&users_table()),
            "CREATE TABLE IF NOT EXISTS \"Users\" (\"id\" SERIAL PRIMARY KEY, \
             \"firstName\" varchar(255) NOT NULL, \"lastName\" varchar(255), \
             \"gpa\" numeric(4,3), \"streetNumber\" integer, \"registrationDate\" timestamptz)"
        );
    }

    #[test]
    fn drop_ddl() {
        assert_eq!(drop_table_sql(&users_table()), "DROP TABLE IF EXISTS \"Users\"");
    }
}
