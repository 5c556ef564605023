//! Field casting and validation applied before a document is written.
//!
//! Handlers only check presence. Types, numeric bounds and enum membership are
//! enforced here, so a payload that gets past a handler can still be refused
//! at insert time.

use bson::DateTime;
use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SchemaError {
    #[error("`{0}` is required")]
    Missing(&'static str),

    #[error("cast to {expected} failed for `{field}`")]
    Cast {
        field: &'static str,
        expected: &'static str,
    },

    #[error("`{field}` ({value}) is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("`{value}` is not a valid value for `{field}`")]
    NotInEnum { field: &'static str, value: String },
}

fn present<'a>(payload: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    payload.get(field).filter(|v| !v.is_null())
}

/// Strings pass through; numbers and booleans are stored as their text.
pub fn optional_string(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, SchemaError> {
    match present(payload, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(SchemaError::Cast {
            field,
            expected: "String",
        }),
    }
}

pub fn required_string(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<String, SchemaError> {
    optional_string(payload, field)?.ok_or(SchemaError::Missing(field))
}

pub fn optional_number(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<f64>, SchemaError> {
    let cast = SchemaError::Cast {
        field,
        expected: "Number",
    };
    match present(payload, field) {
        None => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or(cast),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or(cast),
        Some(_) => Err(cast),
    }
}

pub fn required_number(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<f64, SchemaError> {
    optional_number(payload, field)?.ok_or(SchemaError::Missing(field))
}

/// Integral number within `[min, max]`.
pub fn optional_bounded_int(
    payload: &Map<String, Value>,
    field: &'static str,
    min: i64,
    max: i64,
) -> Result<Option<i32>, SchemaError> {
    let Some(n) = optional_number(payload, field)? else {
        return Ok(None);
    };
    if n.fract() != 0.0 {
        return Err(SchemaError::Cast {
            field,
            expected: "Integer",
        });
    }
    let value = n as i64;
    if value < min || value > max {
        return Err(SchemaError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    // min/max are well inside i32 for every caller
    Ok(Some(value as i32))
}

pub fn required_bool(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<bool, SchemaError> {
    match present(payload, field) {
        None => Err(SchemaError::Missing(field)),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s == "true" => Ok(true),
        Some(Value::String(s)) if s == "false" => Ok(false),
        Some(_) => Err(SchemaError::Cast {
            field,
            expected: "Boolean",
        }),
    }
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` dates (midnight UTC) and epoch
/// milliseconds.
pub fn optional_date(
    payload: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<DateTime>, SchemaError> {
    let cast = SchemaError::Cast {
        field,
        expected: "Date",
    };
    match present(payload, field) {
        None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => parse_date(s.trim()).map(Some).ok_or(cast),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|ms| Some(DateTime::from_millis(ms)))
            .ok_or(cast),
        Some(_) => Err(cast),
    }
}

fn parse_date(raw: &str) -> Option<DateTime> {
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(DateTime::from_chrono(ts.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(DateTime::from_chrono(midnight))
}

/// Value must be one of `allowed`, compared case-sensitively.
pub fn optional_enum(
    payload: &Map<String, Value>,
    field: &'static str,
    allowed: &[&str],
) -> Result<Option<String>, SchemaError> {
    let Some(value) = optional_string(payload, field)? else {
        return Ok(None);
    };
    if allowed.contains(&value.as_str()) {
        Ok(Some(value))
    } else {
        Err(SchemaError::NotInEnum { field, value })
    }
}
