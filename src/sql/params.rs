//! Typed column values and how they bind to PostgreSQL parameters.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

/// A decoded column value. Decimals are kept as their normalized text so no
/// precision is lost between the request and the database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Integer(i32),
    BigInt(i64),
    Text(String),
    Decimal(String),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// JSON form returned to clients.
    pub fn to_json(&self) -> Value {
        match self {
            SqlValue::Null => Value::Null,
            SqlValue::Integer(n) => Value::from(*n),
            SqlValue::BigInt(n) => Value::from(*n),
            SqlValue::Text(s) | SqlValue::Decimal(s) => Value::String(s.clone()),
            SqlValue::Timestamp(t) => Value::String(format_timestamp(t)),
        }
    }

    /// Attach this value as the next positional parameter.
    pub fn bind<'q>(&self, query: Query<'q, Postgres, PgArguments>) -> Query<'q, Postgres, PgArguments> {
        match self {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Integer(n) => query.bind(*n),
            SqlValue::BigInt(n) => query.bind(*n),
            SqlValue::Text(s) | SqlValue::Decimal(s) => query.bind(s.clone()),
            SqlValue::Timestamp(t) => query.bind(*t),
        }
    }
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = p.bind(query);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn json_forms() {
        assert_eq!(SqlValue::Null.to_json(), Value::Null);
        assert_eq!(SqlValue::Integer(4455).to_json(), serde_json::json!(4455));
        assert_eq!(SqlValue::Decimal("3.024".into()).to_json(), serde_json::json!("3.024"));
        let t = Utc.with_ymd_and_hms(2023, 8, 2, 20, 24, 37).unwrap();
        assert_eq!(
            SqlValue::Timestamp(t).to_json(),
            serde_json::json!("2023-08-02T20:24:37.000Z")
        );
    }
}
