//! Dataset loader.
//!
//! Turns a raw [`CsvTable`] into a typed frame:
//!
//! 1. renames headers to canonical names
//! 2. inserts every column the schema relies on, empty when the source
//!    lacks it
//! 3. parses currency, date and code columns
//! 4. appends derived year, month and status columns
//!
//! Text cells that are blank become nulls. Currency cells never are: a
//! blank amount is `0.0`.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use tracing::{debug, info, info_span, warn};

use painel_model::{DerivedColumn, SchemaSpec, SourceSpec};
use painel_normalization::{classify_status, pad_code, parse_currency, parse_date};

use crate::csv_table::{CsvTable, dedupe_headers, read_csv_table};
use crate::dataset::Dataset;
use crate::error::{IngestError, Result};
use crate::polars_utils::date_to_epoch_days;
use crate::source::DataSource;

/// Fetches, reads and normalizes one source.
///
/// `now` stamps the dataset and its date is the reference day for derived
/// status columns.
pub fn load_dataset(
    source: &dyn DataSource,
    spec: &SourceSpec,
    schema: &SchemaSpec,
    now: NaiveDateTime,
) -> Result<Dataset> {
    let span = info_span!("load_dataset", location = %spec.location);
    let _guard = span.enter();
    let start = Instant::now();

    let bytes = source.fetch(&spec.location)?;
    let table = read_csv_table(&bytes, spec)?;
    debug!(
        headers = table.headers.len(),
        rows = table.rows.len(),
        "csv read"
    );
    let data = build_frame(&table, schema, now.date()).map_err(|source| IngestError::Frame {
        location: spec.location.clone(),
        source,
    })?;
    info!(
        rows = data.height(),
        columns = data.width(),
        duration_ms = start.elapsed().as_millis(),
        "dataset loaded"
    );
    Ok(Dataset::new(spec.location.clone(), data, now))
}

/// Builds the normalized frame for a raw table.
pub fn build_frame(
    table: &CsvTable,
    schema: &SchemaSpec,
    today: NaiveDate,
) -> PolarsResult<DataFrame> {
    let height = table.rows.len();
    let mut raw = renamed_columns(table, schema);
    insert_missing_columns(&mut raw, schema, height);

    let mut parsed_dates: BTreeMap<&str, Vec<Option<NaiveDate>>> = BTreeMap::new();
    let mut columns: Vec<Column> = Vec::with_capacity(raw.len() + schema.derived.len());
    for (name, values) in &raw {
        let column = if schema.is_currency(name) {
            let amounts: Vec<f64> = values.iter().map(|value| parse_currency(value)).collect();
            Series::new(name.as_str().into(), amounts)
        } else if schema.is_date(name) {
            let dates: Vec<Option<NaiveDate>> = values
                .iter()
                .map(|value| parse_date(value, schema.day_first))
                .collect();
            let unparsed = values
                .iter()
                .zip(&dates)
                .filter(|(value, date)| !value.is_empty() && date.is_none())
                .count();
            if unparsed > 0 {
                debug!(column = %name, unparsed, "date cells left empty");
            }
            let series = date_series(name, &dates)?;
            parsed_dates.insert(name.as_str(), dates);
            series
        } else if let Some(width) = schema.code_width(name) {
            let codes: Vec<Option<String>> = values
                .iter()
                .map(|value| non_empty(pad_code(value, width)))
                .collect();
            Series::new(name.as_str().into(), codes)
        } else {
            let text: Vec<Option<String>> =
                values.iter().map(|value| non_empty(value.clone())).collect();
            Series::new(name.as_str().into(), text)
        };
        columns.push(column.into_column());
    }

    for derived in &schema.derived {
        let dates = match parsed_dates.get(derived.source()) {
            Some(dates) => dates.clone(),
            None => raw
                .iter()
                .find(|(name, _)| name == derived.source())
                .map(|(_, values)| {
                    values
                        .iter()
                        .map(|value| parse_date(value, schema.day_first))
                        .collect()
                })
                .unwrap_or_else(|| vec![None; height]),
        };
        let series = derive_series(derived, &dates, today);
        columns.retain(|column| column.name().as_str() != derived.target());
        columns.push(series.into_column());
    }

    DataFrame::new(columns)
}

fn renamed_columns(table: &CsvTable, schema: &SchemaSpec) -> Vec<(String, Vec<String>)> {
    let headers: Vec<String> = table
        .headers
        .iter()
        .map(|header| {
            schema
                .renames
                .iter()
                .find(|rename| rename.from.trim() == header)
                .map(|rename| rename.to.clone())
                .unwrap_or_else(|| header.clone())
        })
        .collect();
    dedupe_headers(headers)
        .into_iter()
        .enumerate()
        .map(|(idx, name)| (name, table.column(idx)))
        .collect()
}

fn insert_missing_columns(
    raw: &mut Vec<(String, Vec<String>)>,
    schema: &SchemaSpec,
    height: usize,
) {
    for name in schema.ensured_columns() {
        if raw.iter().any(|(existing, _)| *existing == name) {
            continue;
        }
        warn!(column = %name, "column missing from source; inserted as empty");
        raw.push((name, vec![String::new(); height]));
    }
}

fn derive_series(derived: &DerivedColumn, dates: &[Option<NaiveDate>], today: NaiveDate) -> Series {
    match derived {
        DerivedColumn::Year { into, .. } => {
            let years: Vec<Option<i32>> = dates.iter().map(|date| date.map(|d| d.year())).collect();
            Series::new(into.as_str().into(), years)
        }
        DerivedColumn::Month { into, .. } => {
            let months: Vec<Option<i32>> = dates
                .iter()
                .map(|date| date.map(|d| d.month() as i32))
                .collect();
            Series::new(into.as_str().into(), months)
        }
        DerivedColumn::Status {
            into, window_days, ..
        } => {
            let labels: Vec<Option<String>> = dates
                .iter()
                .map(|date| {
                    classify_status(*date, today, *window_days)
                        .map(|status| status.label().to_string())
                })
                .collect();
            Series::new(into.as_str().into(), labels)
        }
    }
}

fn date_series(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Series> {
    let days: Vec<Option<i32>> = dates.iter().map(|date| date.map(date_to_epoch_days)).collect();
    Series::new(name.into(), days).cast(&DataType::Date)
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polars_utils::{any_to_date, column_strings};
    use painel_model::ColumnRename;

    fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
        CsvTable {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|v| (*v).to_string()).collect())
                .collect(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 16).unwrap()
    }

    #[test]
    fn rename_into_existing_name_is_deduplicated() {
        let schema = SchemaSpec {
            renames: vec![ColumnRename::new("Fim", "Término")],
            ..SchemaSpec::default()
        };
        let table = table(&["Término", "Fim"], &[&["a", "b"]]);
        let df = build_frame(&table, &schema, today()).unwrap();
        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["Término", "Término.1"]);
    }

    #[test]
    fn derived_columns_replace_source_columns_of_same_name() {
        let schema = SchemaSpec {
            date_columns: vec!["Data".to_string()],
            derived: vec![DerivedColumn::Year {
                from: "Data".to_string(),
                into: "Ano".to_string(),
            }],
            ..SchemaSpec::default()
        };
        let df = build_frame(
            &table(&["Data", "Ano"], &[&["05/03/2024", "velho"], &["", "x"]]),
            &schema,
            today(),
        )
        .unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(column_strings(&df, "Ano").unwrap(), vec!["2024", ""]);
        let first = df.column("Data").unwrap().get(0).unwrap();
        assert_eq!(any_to_date(first), NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn derivation_parses_undeclared_text_source() {
        let schema = SchemaSpec {
            derived: vec![DerivedColumn::Month {
                from: "Emissão".to_string(),
                into: "Mês".to_string(),
            }],
            ..SchemaSpec::default()
        };
        let df = build_frame(&table(&["Emissão"], &[&["31/12/2024"]]), &schema, today()).unwrap();
        assert_eq!(column_strings(&df, "Mês").unwrap(), vec!["12"]);
        assert_eq!(column_strings(&df, "Emissão").unwrap(), vec!["31/12/2024"]);
    }

    #[test]
    fn empty_table_still_has_schema_columns() {
        let schema = SchemaSpec {
            currency_columns: vec!["Valor".to_string()],
            required_columns: vec!["Setor".to_string()],
            ..SchemaSpec::default()
        };
        let df = build_frame(&CsvTable::default(), &schema, today()).unwrap();
        assert_eq!(df.height(), 0);
        assert!(df.column("Valor").is_ok());
        assert!(df.column("Setor").is_ok());
    }
}
