//! Process settings read once from the environment at startup.

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    /// In-process store; nothing survives a restart.
    Memory,
}

impl FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "memory" => Ok(Dialect::Memory),
            _ => Err(ConfigError::UnsupportedDialect(s.to_string())),
        }
    }
}

/// How tables are synchronized with the registry at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncMode {
    /// CREATE TABLE IF NOT EXISTS.
    Create,
    /// Drop and recreate every registered table.
    Force,
    None,
}

impl FromStr for SyncMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(SyncMode::Create),
            "force" => Ok(SyncMode::Force),
            "none" => Ok(SyncMode::None),
            _ => Err(ConfigError::Env {
                var: "DB_SYNC",
                reason: format!("invalid sync mode '{}' (expected create, force or none)", s),
            }),
        }
    }
}

#[derive(Clone)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub dialect: Dialect,
    pub max_connections: u32,
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .field("dialect", &self.dialect)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DbSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        self.options_for(&self.database)
    }

    /// Options for the `postgres` maintenance database, used to create the target database.
    pub fn admin_connect_options(&self) -> PgConnectOptions {
        self.options_for("postgres")
    }

    fn options_for(&self, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(database)
            .username(&self.username)
            .password(&self.password)
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub port: u16,
    pub db: DbSettings,
    pub sync: SyncMode,
    pub schema_path: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let db = DbSettings {
            host: get("DB_HOST", "localhost"),
            port: parse_var("DB_PORT", &get("DB_PORT", "5432"))?,
            database: get("DB_NAME", "table_rest"),
            username: get("DB_USER", "postgres"),
            password: get("DB_PASSWORD", ""),
            dialect: get("DB_DIALECT", "postgres").parse()?,
            max_connections: parse_var("DB_MAX_CONNECTIONS", &get("DB_MAX_CONNECTIONS", "5"))?,
        };
        Ok(Settings {
            port: parse_var("APP_PORT", &get("APP_PORT", "3000"))?,
            db,
            sync: get("DB_SYNC", "create").parse()?,
            schema_path: lookup("SCHEMA_PATH").filter(|s| !s.is_empty()).map(PathBuf::from),
        })
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        reason: format!("'{}': {}", value, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.port, 3000);
        assert_eq!(s.db.host, "localhost");
        assert_eq!(s.db.port, 5432);
        assert_eq!(s.db.dialect, Dialect::Postgres);
        assert_eq!(s.sync, SyncMode::Create);
        assert!(s.schema_path.is_none());
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("APP_PORT", "8080"),
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_NAME", "school"),
            ("DB_DIALECT", "PostgreSQL"),
            ("DB_SYNC", "force"),
            ("SCHEMA_PATH", "/etc/tables.json"),
        ])
        .unwrap();
        assert_eq!(s.port, 8080);
        assert_eq!(s.db.host, "db");
        assert_eq!(s.db.port, 6543);
        assert_eq!(s.db.database, "school");
        assert_eq!(s.sync, SyncMode::Force);
        assert_eq!(s.schema_path, Some(PathBuf::from("/etc/tables.json")));
    }

    #[test]
    fn rejects_unknown_dialect() {
        let err = settings(&[("DB_DIALECT", "mysql")]).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedDialect(d) if d == "mysql"));
    }

    #[test]
    fn rejects_bad_port() {
        let err = settings(&[("APP_PORT", "http")]).unwrap_err();
        assert!(err.to_string().starts_with("APP_PORT"));
    }

    #[test]
    fn memory_dialect() {
        assert_eq!(settings(&[("DB_DIALECT", "memory")]).unwrap().db.dialect, Dialect::Memory);
    }

    #[test]
    fn debug_hides_password() {
        let s = settings(&[("DB_PASSWORD", "hunter2")]).unwrap();
        assert!(!format!("{:?}", s).contains("hunter2"));
    }
}
