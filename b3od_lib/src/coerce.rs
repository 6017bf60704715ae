//! Cell coercion driven by the schema registry.

use chrono::NaiveDate;

use crate::error::B3Error;
use crate::frame::Value;
use crate::schema::ColumnType;

/// Reads a decimal written with a comma separator (`"1234,56"`).
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse::<f64>().ok()
}

/// Converts one CSV cell. Blank cells become `Null` for every type.
pub fn coerce_text(column: &str, raw: &str, ty: ColumnType) -> Result<Value, B3Error> {
    let cell = raw.trim();
    if cell.is_empty() {
        return Ok(Value::Null);
    }
    let converted = match ty {
        ColumnType::Text => Some(Value::Text(cell.to_string())),
        ColumnType::Float => parse_decimal(cell).map(Value::Float),
        ColumnType::Integer => cell.parse::<i64>().ok().or_else(|| whole(cell)).map(Value::Integer),
        ColumnType::Bool => parse_bool(cell).map(Value::Bool),
        ColumnType::Date => NaiveDate::parse_from_str(cell, "%Y-%m-%d")
            .ok()
            .map(Value::Date),
    };
    converted.ok_or_else(|| B3Error::Coerce {
        column: column.to_string(),
        value: cell.to_string(),
        expected: ty.as_str(),
    })
}

/// Converts one JSON cell from the paginated API.
///
/// Strings go through [`coerce_text`]; numbers and booleans are checked
/// against the column type.
pub fn coerce_json(
    column: &str,
    raw: &serde_json::Value,
    ty: ColumnType,
) -> Result<Value, B3Error> {
    use serde_json::Value as Json;

    let mismatch = || B3Error::Coerce {
        column: column.to_string(),
        value: raw.to_string(),
        expected: ty.as_str(),
    };

    match (raw, ty) {
        (Json::Null, _) => Ok(Value::Null),
        (Json::String(s), _) => coerce_text(column, s, ty),
        (Json::Number(n), ColumnType::Float) => n.as_f64().map(Value::Float).ok_or_else(mismatch),
        (Json::Number(n), ColumnType::Integer) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64))
            .map(Value::Integer)
            .ok_or_else(mismatch),
        (Json::Number(n), ColumnType::Text) => Ok(Value::Text(n.to_string())),
        (Json::Bool(b), ColumnType::Bool) => Ok(Value::Bool(*b)),
        (Json::Bool(b), ColumnType::Text) => Ok(Value::Text(b.to_string())),
        _ => Err(mismatch()),
    }
}

fn whole(cell: &str) -> Option<i64> {
    parse_decimal(cell)
        .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
        .map(|v| v as i64)
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
