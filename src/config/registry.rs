//! Schema registry: the fixed set of tables exposed over HTTP, indexed by name.

use crate::config::types::{users_table, TableDef};
use crate::config::validate;
use crate::error::ConfigError;
use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    tables: Vec<TableDef>,
    by_name: HashMap<String, usize>,
}

impl SchemaRegistry {
    pub fn new(tables: Vec<TableDef>) -> Result<Self, ConfigError> {
        validate(&tables)?;
        Ok(Self::index(tables))
    }

    /// Registry holding only the built-in `Users` table.
    pub fn builtin() -> Self {
        Self::index(vec![users_table()])
    }

    fn index(tables: Vec<TableDef>) -> Self {
        let by_name = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        SchemaRegistry { tables, by_name }
    }

    /// Case-sensitive exact lookup.
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.by_name.get(name).map(|&i| &self.tables[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_sensitive() {
        let r = SchemaRegistry::builtin();
        assert!(r.contains("Users"));
        assert!(!r.contains("users"));
        assert!(!r.contains("USERS"));
        assert!(r.table("Cats").is_none());
    }

    #[test]
    fn new_validates() {
        assert!(SchemaRegistry::new(vec![users_table(), users_table()]).is_err());
        let r = SchemaRegistry::new(vec![users_table()]).unwrap();
        assert_eq!(r.tables().len(), 1);
    }
}
