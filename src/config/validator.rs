//! Validate table definitions before they enter the registry.

use crate::config::types::{ColumnType, TableDef, PRIMARY_KEY};
use crate::error::ConfigError;
use std::collections::HashSet;

/// Reject definitions that could not be served: duplicate or empty names,
/// a user column shadowing the primary key, impossible decimal or string sizes.
pub fn validate(tables: &[TableDef]) -> Result<(), ConfigError> {
    let mut table_names = HashSet::new();
    for t in tables {
        if t.name.is_empty() {
            return Err(ConfigError::Schema("table name must not be empty".into()));
        }
        if !table_names.insert(t.name.as_str()) {
            return Err(ConfigError::Schema(format!("duplicate table: {}", t.name)));
        }
        let mut col_names = HashSet::new();
        for c in &t.columns {
            if c.name.is_empty() {
                return Err(ConfigError::Schema(format!("{}: column name must not be empty", t.name)));
            }
            if c.name == PRIMARY_KEY {
                return Err(ConfigError::Schema(format!(
                    "{}: column '{}' is reserved for the primary key",
                    t.name, PRIMARY_KEY
                )));
            }
            if !col_names.insert(c.name.as_str()) {
                return Err(ConfigError::Schema(format!("{}: duplicate column {}", t.name, c.name)));
            }
            match c.type_ {
                ColumnType::Decimal { precision, scale } if precision == 0 || scale > precision => {
                    return Err(ConfigError::Schema(format!(
                        "{}.{}: invalid DECIMAL({},{})",
                        t.name, c.name, precision, scale
                    )));
                }
                ColumnType::String { max_length: 0 } => {
                    return Err(ConfigError::Schema(format!(
                        "{}.{}: max_length must be positive",
                        t.name, c.name
                    )));
                }
                _ => {}
            }
        }
    }
    Ok(())
}
