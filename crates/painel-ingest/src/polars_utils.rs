//! Polars AnyValue utility functions.
//!
//! Cells are compared and displayed through one canonical string form:
//! nulls are empty, floats drop trailing zeros and dates are ISO
//! `YYYY-MM-DD`.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Days between 0001-01-01 (chrono's CE day 1) and the Unix epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since 1970-01-01, the physical representation of a Polars date.
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

/// Converts a Polars AnyValue to its canonical string form.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Date(days) => date_from_epoch_days(days)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts an AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
    .filter(|v| !v.is_nan())
}

/// Reads a date cell. Text cells are not parsed here.
pub fn any_to_date(value: AnyValue<'_>) -> Option<NaiveDate> {
    match value {
        AnyValue::Date(days) => date_from_epoch_days(days),
        _ => None,
    }
}

fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

/// Canonical string values of a column, or None if the column is absent.
pub fn column_strings(df: &DataFrame, name: &str) -> Option<Vec<String>> {
    let column = df.column(name).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_conversion_round_trips() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_epoch_days(date), 0);
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(date_from_epoch_days(date_to_epoch_days(date)), Some(date));
    }

    #[test]
    fn numeric_strings_drop_trailing_zeros() {
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(10.5), "10.5");
        assert_eq!(format_numeric(100.0), "100");
    }

    #[test]
    fn dates_render_as_iso() {
        let days = date_to_epoch_days(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        assert_eq!(any_to_string(AnyValue::Date(days)), "2025-03-05");
        assert_eq!(any_to_string(AnyValue::Null), "");
    }
}
