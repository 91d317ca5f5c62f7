//! Table and column definitions, deserializable from a JSON registry file.

use serde::{Deserialize, Serialize};

/// Primary key column present on every table. Auto-assigned, never decoded from input.
pub const PRIMARY_KEY: &str = "id";

fn default_true() -> bool {
    true
}

fn default_max_length() -> u32 {
    255
}

/// Logical column type.
///
/// JSON form: `"integer"`, `"timestamp"`, `{"string": {"max_length": 255}}`,
/// `{"decimal": {"precision": 4, "scale": 3}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    String {
        #[serde(default = "default_max_length")]
        max_length: u32,
    },
    Decimal { precision: u8, scale: u8 },
    Timestamp,
}

impl ColumnType {
    /// PostgreSQL type used in DDL and parameter casts.
    pub fn pg_type(&self) -> String {
        match self {
            ColumnType::Integer => "integer".into(),
            ColumnType::String { max_length } => format!("varchar({})", max_length),
            ColumnType::Decimal { precision, scale } => format!("numeric({},{})", precision, scale),
            ColumnType::Timestamp => "timestamptz".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: ColumnType,
    #[serde(default = "default_true")]
    pub nullable: bool,
    /// Message returned when a value fails this column's format check.
    #[serde(default)]
    pub message: Option<String>,
}

impl ColumnDef {
    pub fn new(name: &str, type_: ColumnType) -> Self {
        ColumnDef {
            name: name.to_string(),
            type_,
            nullable: true,
            message: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

/// One exposed table. `columns` excludes the implicit [`PRIMARY_KEY`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// The `Users` table served when no registry file is configured.
pub fn users_table() -> TableDef {
    TableDef {
        name: "Users".into(),
        columns: vec![
            ColumnDef::new("firstName", ColumnType::String { max_length: 255 }).not_null(),
            ColumnDef::new("lastName", ColumnType::String { max_length: 255 }),
            ColumnDef::new("gpa", ColumnType::Decimal { precision: 4, scale: 3 })
                .with_message("The GPA field must be a decimal."),
            ColumnDef::new("streetNumber", ColumnType::Integer)
                .with_message("The street number field must be an integer."),
            ColumnDef::new("registrationDate", ColumnType::Timestamp),
        ],
    }
}
