//! Build the schema registry from the built-in tables or a JSON file.

use crate::config::types::TableDef;
use crate::config::SchemaRegistry;
use crate::error::ConfigError;
use std::path::Path;

/// Parse a JSON array of table definitions and validate it.
pub fn parse_registry(json: &str) -> Result<SchemaRegistry, ConfigError> {
    let tables: Vec<TableDef> = serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
    SchemaRegistry::new(tables)
}

/// Registry from `path` when given, else the built-in tables.
pub async fn load_registry(path: Option<&Path>) -> Result<SchemaRegistry, ConfigError> {
    let Some(path) = path else {
        return Ok(SchemaRegistry::builtin());
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    let registry = parse_registry(&json)?;
    tracing::info!(path = %path.display(), tables = registry.tables().len(), "loaded schema registry");
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tables() {
        let r = parse_registry(
            r#"[{"name": "Pets", "columns": [{"name": "name", "type": {"string": {"max_length": 20}}, "nullable": false}]}]"#,
        )
        .unwrap();
        assert!(r.contains("Pets"));
        assert!(!r.contains("Users"));
    }

    #[test]
    fn malformed_json_is_load_error() {
        assert!(matches!(parse_registry("{"), Err(ConfigError::Load(_))));
    }

    #[test]
    fn invalid_definition_is_schema_error() {
        let err = parse_registry(r#"[{"name": "", "columns": []}]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Schema(_)));
    }

    #[tokio::test]
    async fn no_path_gives_builtin() {
        let r = load_registry(None).await.unwrap();
        assert!(r.contains("Users"));
    }

    #[tokio::test]
    async fn missing_file_is_load_error() {
        let err = load_registry(Some(Path::new("/nonexistent/registry.json"))).await.unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
