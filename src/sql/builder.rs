//! Builds parameterized EXISTS, SELECT, INSERT, UPDATE, DELETE from a table definition.

use crate::config::{ColumnType, TableDef, PRIMARY_KEY};
use crate::sql::SqlValue;

/// Quote identifier for PostgreSQL. Names come from the registry, never from a request.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

/// `$n::type` so text-bound decimals and nulls coerce to the column type.
fn placeholder(n: usize, type_: &ColumnType) -> String {
    format!("${}::{}", n, type_.pg_type())
}

/// SELECT list: primary key first, then columns in definition order. Decimals
/// are read back as text so their scale is preserved.
fn select_column_list(table: &TableDef) -> String {
    let mut cols = vec![quoted(PRIMARY_KEY)];
    cols.extend(table.columns.iter().map(|c| {
        let q = quoted(&c.name);
        match c.type_ {
            ColumnType::Decimal { .. } => format!("{}::text AS {}", q, q),
            _ => q,
        }
    }));
    cols.join(", ")
}

/// Presence check that returns a single boolean and no row content.
pub fn exists(table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlValue::BigInt(id));
    q.sql = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ${})",
        quoted(&table.name),
        quoted(PRIMARY_KEY),
        n
    );
    q
}

pub fn select_by_id(table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlValue::BigInt(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(table),
        quoted(&table.name),
        quoted(PRIMARY_KEY),
        n
    );
    q
}

/// INSERT the given columns, returning the assigned id. Columns not in the
/// table are skipped; an empty set inserts DEFAULT VALUES.
pub fn insert(table: &TableDef, values: &[(String, SqlValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (name, v) in values {
        let Some(c) = table.column(name) else { continue };
        let n = q.push_param(v.clone());
        cols.push(quoted(name));
        placeholders.push(placeholder(n, &c.type_));
    }
    q.sql = if cols.is_empty() {
        format!(
            "INSERT INTO {} DEFAULT VALUES RETURNING {}",
            quoted(&table.name),
            quoted(PRIMARY_KEY)
        )
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            quoted(&table.name),
            cols.join(", "),
            placeholders.join(", "),
            quoted(PRIMARY_KEY)
        )
    };
    q
}

/// UPDATE by id: SET only the given columns. None when nothing would change.
pub fn update(table: &TableDef, id: i64, values: &[(String, SqlValue)]) -> Option<QueryBuf> {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (name, v) in values {
        let Some(c) = table.column(name) else { continue };
        let n = q.push_param(v.clone());
        sets.push(format!("{} = {}", quoted(name), placeholder(n, &c.type_)));
    }
    if sets.is_empty() {
        return None;
    }
    let id_param = q.push_param(SqlValue::BigInt(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quoted(&table.name),
        sets.join(", "),
        quoted(PRIMARY_KEY),
        id_param
    );
    Some(q)
}

pub fn delete(table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlValue::BigInt(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quoted(&table.name),
        quoted(PRIMARY_KEY),
        n
    );
    q
}
