//! Decode raw request fields into typed column values for one table.
//!
//! Columns are checked in definition order; only the first failure is reported.

use crate::config::{ColumnDef, ColumnType, TableDef};
use crate::error::AppError;
use crate::sql::SqlValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Field name to raw value. `None` is an explicit null (JSON `null`).
pub type RawFields = HashMap<String, Option<String>>;

/// Typed values for the columns a write will touch, in column order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedRow {
    columns: Vec<(String, SqlValue)>,
}

impl DecodedRow {
    pub fn columns(&self) -> &[(String, SqlValue)] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

pub struct RowDecoder;

impl RowDecoder {
    /// Decode a full row for insert. Missing non-nullable columns fail.
    pub fn decode_insert(table: &TableDef, fields: &RawFields) -> Result<DecodedRow, AppError> {
        decode(table, fields, false)
    }

    /// Decode only the supplied columns, for a partial update.
    pub fn decode_update(table: &TableDef, fields: &RawFields) -> Result<DecodedRow, AppError> {
        decode(table, fields, true)
    }
}

fn decode(table: &TableDef, fields: &RawFields, partial: bool) -> Result<DecodedRow, AppError> {
    let mut columns = Vec::new();
    for col in &table.columns {
        let value = match fields.get(&col.name) {
            None if partial || col.nullable => continue,
            None | Some(None) if !col.nullable => return Err(not_null(table, col)),
            None | Some(None) => SqlValue::Null,
            Some(Some(raw)) => decode_value(table, col, raw)?,
        };
        columns.push((col.name.clone(), value));
    }
    Ok(DecodedRow { columns })
}

fn not_null(table: &TableDef, col: &ColumnDef) -> AppError {
    AppError::Validation(format!("{}.{} cannot be null", table.name, col.name))
}

/// The column's own message if it has one, else a generic one naming the type.
fn format_error(table: &TableDef, col: &ColumnDef, expected: &str) -> AppError {
    AppError::Validation(
        col.message
            .clone()
            .unwrap_or_else(|| format!("{}.{} must be {}", table.name, col.name, expected)),
    )
}

fn decode_value(table: &TableDef, col: &ColumnDef, raw: &str) -> Result<SqlValue, AppError> {
    match col.type_ {
        ColumnType::Integer => raw
            .parse::<i32>()
            .map(SqlValue::Integer)
            .map_err(|_| format_error(table, col, "an integer")),
        ColumnType::String { max_length } => {
            if raw.chars().count() > max_length as usize {
                return Err(AppError::Validation(format!(
                    "{}.{} must be at most {} characters",
                    table.name, col.name, max_length
                )));
            }
            Ok(SqlValue::Text(raw.to_string()))
        }
        ColumnType::Decimal { precision, scale } => match normalize_decimal(raw, precision, scale) {
            Ok(s) => Ok(SqlValue::Decimal(s)),
            Err(DecimalError::Format) => Err(format_error(table, col, "a decimal")),
            Err(DecimalError::Scale) => Err(AppError::Validation(format!(
                "{}.{} allows at most {} decimal places",
                table.name, col.name, scale
            ))),
            Err(DecimalError::Range) => Err(AppError::Validation(format!(
                "{}.{} is out of range for DECIMAL({},{})",
                table.name, col.name, precision, scale
            ))),
        },
        ColumnType::Timestamp => parse_timestamp(raw)
            .map(SqlValue::Timestamp)
            .ok_or_else(|| format_error(table, col, "a timestamp")),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum DecimalError {
    Format,
    Scale,
    Range,
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").expect("decimal pattern compiles"))
}

/// Render `raw` with exactly `scale` fractional digits, the way PostgreSQL
/// prints `numeric(precision, scale)`.
fn normalize_decimal(raw: &str, precision: u8, scale: u8) -> Result<String, DecimalError> {
    if !decimal_pattern().is_match(raw) {
        return Err(DecimalError::Format);
    }
    let (negative, body) = match raw.as_bytes()[0] {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    let scale = scale as usize;
    if frac_part.len() > scale {
        return Err(DecimalError::Scale);
    }
    let int_digits = int_part.trim_start_matches('0');
    if int_digits.len() > (precision as usize).saturating_sub(scale) {
        return Err(DecimalError::Range);
    }
    let int_out = if int_digits.is_empty() { "0" } else { int_digits };
    let frac_out = format!("{:0<width$}", frac_part, width = scale);
    let is_zero = int_digits.is_empty() && frac_part.bytes().all(|b| b == b'0');
    let sign = if negative && !is_zero { "-" } else { "" };
    Ok(if scale == 0 {
        format!("{}{}", sign, int_out)
    } else {
        format!("{}{}.{}", sign, int_out, frac_out)
    })
}

/// RFC 3339, a naive date-time (taken as UTC), or a bare date (UTC midnight).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(t.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::users_table;
    use chrono::TimeZone;

    fn fields(pairs: &[(&str, &str)]) -> RawFields {
        pairs.iter().map(|(k, v)| (k.to_string(), Some(v.to_string()))).collect()
    }

    fn validation(msg: &str) -> AppError {
        AppError::Validation(msg.into())
    }

    #[test]
    fn full_user_decodes() {
        let row = RowDecoder::decode_insert(
            &users_table(),
            &fields(&[
                ("id", "1"),
                ("firstName", "Firsttest"),
                ("lastName", "Lasttest"),
                ("gpa", "3.024"),
                ("streetNumber", "4455"),
                ("registrationDate", "2023-08-02T20:24:37.000Z"),
                ("favoriteColor", "green"),
            ]),
        )
        .unwrap();
        assert_eq!(row.columns().len(), 5);
        assert!(row.get("id").is_none());
        assert!(row.get("favoriteColor").is_none());
        assert_eq!(row.get("gpa"), Some(&SqlValue::Decimal("3.024".into())));
        assert_eq!(row.get("streetNumber"), Some(&SqlValue::Integer(4455)));
        assert_eq!(
            row.get("registrationDate"),
            Some(&SqlValue::Timestamp(Utc.with_ymd_and_hms(2023, 8, 2, 20, 24, 37).unwrap()))
        );
    }

    #[test]
    fn missing_required_column() {
        let err = RowDecoder::decode_insert(&users_table(), &fields(&[("lastName", "B")])).unwrap_err();
        assert_eq!(err, validation("Users.firstName cannot be null"));
    }

    #[test]
    fn explicit_null_for_required_column() {
        let mut f = fields(&[]);
        f.insert("firstName".into(), None);
        assert_eq!(
            RowDecoder::decode_update(&users_table(), &f).unwrap_err(),
            validation("Users.firstName cannot be null")
        );
    }

    #[test]
    fn explicit_null_for_nullable_column() {
        let mut f = fields(&[]);
        f.insert("lastName".into(), None);
        let row = RowDecoder::decode_update(&users_table(), &f).unwrap();
        assert_eq!(row.get("lastName"), Some(&SqlValue::Null));
    }

    #[test]
    fn first_failure_in_column_order_wins() {
        let err = RowDecoder::decode_insert(
            &users_table(),
            &fields(&[("gpa", "Four"), ("streetNumber", "many")]),
        )
        .unwrap_err();
        assert_eq!(err, validation("Users.firstName cannot be null"));

        let err = RowDecoder::decode_insert(
            &users_table(),
            &fields(&[("firstName", "A"), ("gpa", "Four"), ("streetNumber", "many")]),
        )
        .unwrap_err();
        assert_eq!(err, validation("The GPA field must be a decimal."));
    }

    #[test]
    fn column_messages() {
        let err = RowDecoder::decode_insert(&users_table(), &fields(&[("firstName", "A"), ("streetNumber", "4.5")]))
            .unwrap_err();
        assert_eq!(err, validation("The street number field must be an integer."));
        let err = RowDecoder::decode_insert(&users_table(), &fields(&[("firstName", "A"), ("registrationDate", "soon")]))
            .unwrap_err();
        assert_eq!(err, validation("Users.registrationDate must be a timestamp"));
    }

    #[test]
    fn partial_update_skips_missing() {
        let row = RowDecoder::decode_update(&users_table(), &fields(&[("lastName", "Smith")])).unwrap();
        assert_eq!(row.columns(), &[("lastName".to_string(), SqlValue::Text("Smith".into()))]);
        assert!(RowDecoder::decode_update(&users_table(), &fields(&[])).unwrap().is_empty());
    }

    #[test]
    fn string_length_limit() {
        let long = "x".repeat(256);
        let err = RowDecoder::decode_insert(&users_table(), &fields(&[("firstName", &long)])).unwrap_err();
        assert_eq!(err, validation("Users.firstName must be at most 255 characters"));
        let exact = "é".repeat(255);
        assert!(RowDecoder::decode_insert(&users_table(), &fields(&[("firstName", &exact)])).is_ok());
    }

    #[test]
    fn integers_are_strict() {
        for bad in ["", " 1", "1 ", "1.0", "0x10", "2147483648"] {
            assert!(
                RowDecoder::decode_insert(&users_table(), &fields(&[("firstName", "A"), ("streetNumber", bad)])).is_err(),
                "{:?} accepted",
                bad
            );
        }
        let row = RowDecoder::decode_insert(&users_table(), &fields(&[("firstName", "A"), ("streetNumber", "-12")]))
            .unwrap();
        assert_eq!(row.get("streetNumber"), Some(&SqlValue::Integer(-12)));
    }

    #[test]
    fn decimals_normalize_to_scale() {
        assert_eq!(normalize_decimal("3.5", 4, 3), Ok("3.500".into()));
        assert_eq!(normalize_decimal("3", 4, 3), Ok("3.000".into()));
        assert_eq!(normalize_decimal(".5", 4, 3), Ok("0.500".into()));
        assert_eq!(normalize_decimal("+03.25", 4, 3), Ok("3.250".into()));
        assert_eq!(normalize_decimal("-0.000", 4, 3), Ok("0.000".into()));
        assert_eq!(normalize_decimal("-1.5", 4, 3), Ok("-1.500".into()));
        assert_eq!(normalize_decimal("3.", 4, 3), Ok("3.000".into()));
        assert_eq!(normalize_decimal("12", 4, 0), Ok("12".into()));
    }

    #[test]
    fn decimal_failures() {
        assert_eq!(normalize_decimal("Four", 4, 3), Err(DecimalError::Format));
        assert_eq!(normalize_decimal("", 4, 3), Err(DecimalError::Format));
        assert_eq!(normalize_decimal("1e3", 4, 3), Err(DecimalError::Format));
        assert_eq!(normalize_decimal("3.0241", 4, 3), Err(DecimalError::Scale));
        assert_eq!(normalize_decimal("10", 4, 3), Err(DecimalError::Range));
        let err = RowDecoder::decode_insert(&users_table(), &fields(&[("firstName", "A"), ("gpa", "10.5")]))
            .unwrap_err();
        assert_eq!(err, validation("Users.gpa is out of range for DECIMAL(4,3)"));
    }

    #[test]
    fn only_ascii_digits_are_decimals() {
        assert_eq!(normalize_decimal("0.\u{665}", 4, 3), Err(DecimalError::Format));
        assert_eq!(normalize_decimal("\u{663}.\u{665}", 4, 3), Err(DecimalError::Format));
        assert_eq!(normalize_decimal("\u{ff13}", 4, 3), Err(DecimalError::Format));
        for raw in ["0.\u{665}", "\u{663}.\u{665}"] {
            let err = RowDecoder::decode_insert(&users_table(), &fields(&[("firstName", "A"), ("gpa", raw)]))
                .unwrap_err();
            assert_eq!(err, validation("The GPA field must be a decimal."));
        }
    }

    #[test]
    fn timestamp_formats() {
        let at = Utc.with_ymd_and_hms(2023, 8, 2, 20, 24, 37).unwrap();
        assert_eq!(parse_timestamp("2023-08-02T20:24:37Z"), Some(at));
        assert_eq!(parse_timestamp("2023-08-02T22:24:37+02:00"), Some(at));
        assert_eq!(parse_timestamp("2023-08-02T20:24:37"), Some(at));
        assert_eq!(parse_timestamp("2023-08-02 20:24:37"), Some(at));
        assert_eq!(
            parse_timestamp("2023-08-02"),
            Some(Utc.with_ymd_and_hms(2023, 8, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("08/02/2023"), None);
    }
}
