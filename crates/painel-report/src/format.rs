//! Cell formatting for report tables.

use polars::prelude::{AnyValue, DataFrame};

use painel_ingest::{any_to_date, any_to_f64, any_to_string};
use painel_model::{ColumnFormat, ReportColumn};
use painel_normalization::{
    CURRENCY_SYMBOL, format_currency, format_date, parse_currency, parse_date,
};
use serde::Serialize;

use painel_core::FilteredView;

/// Headers and display strings, ready for an external renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormattedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FormattedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Formats the view's rows for the given report columns.
///
/// With no columns declared, every column of the view is shown as text.
pub fn format_table(view: &FilteredView, columns: &[ReportColumn]) -> FormattedTable {
    let data = view.data();
    let columns: Vec<ReportColumn> = if columns.is_empty() {
        data.get_column_names()
            .into_iter()
            .map(|name| ReportColumn::new(name.as_str(), ColumnFormat::Text))
            .collect()
    } else {
        columns.to_vec()
    };
    let headers = columns.iter().map(|column| column.header().to_string()).collect();
    let rows = (0..data.height())
        .map(|idx| {
            columns
                .iter()
                .map(|column| format_cell(cell(data, &column.column, idx), column.format))
                .collect()
        })
        .collect();
    FormattedTable { headers, rows }
}

fn cell<'a>(data: &'a DataFrame, column: &str, idx: usize) -> AnyValue<'a> {
    data.column(column)
        .ok()
        .and_then(|values| values.get(idx).ok())
        .unwrap_or(AnyValue::Null)
}

/// Display string of one cell. Nulls are blank in every format.
pub fn format_cell(value: AnyValue<'_>, format: ColumnFormat) -> String {
    if matches!(value, AnyValue::Null) {
        return String::new();
    }
    match format {
        ColumnFormat::Text | ColumnFormat::Code => match any_to_date(value.clone()) {
            Some(date) => format_date(date),
            None => any_to_string(value),
        },
        ColumnFormat::Currency => match value {
            AnyValue::String(text) => format_currency(parse_currency(text)),
            AnyValue::StringOwned(ref text) => format_currency(parse_currency(text)),
            other => any_to_f64(other).map(format_currency).unwrap_or_default(),
        },
        ColumnFormat::Date => match any_to_date(value.clone()) {
            Some(date) => format_date(date),
            None => {
                let raw = any_to_string(value);
                parse_date(&raw, true).map(format_date).unwrap_or(raw)
            }
        },
        ColumnFormat::Integer => match any_to_f64(value.clone()) {
            Some(number) => format_integer(number),
            None => any_to_string(value),
        },
        ColumnFormat::Number => match any_to_f64(value.clone()) {
            Some(number) => format_decimal(number),
            None => any_to_string(value),
        },
    }
}

/// `1234.5` as `1.234,50`.
pub fn format_decimal(value: f64) -> String {
    format_currency(value)
        .trim_start_matches(CURRENCY_SYMBOL)
        .trim_start()
        .to_string()
}

/// `1234.0` as `1.234`.
pub fn format_integer(value: f64) -> String {
    let decimal = format_decimal(value.round());
    decimal
        .strip_suffix(",00")
        .map(str::to_string)
        .unwrap_or(decimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_formats_use_brazilian_separators() {
        assert_eq!(format_decimal(1234.5), "1.234,50");
        assert_eq!(format_decimal(-0.5), "-0,50");
        assert_eq!(format_integer(1234567.0), "1.234.567");
        assert_eq!(format_integer(2.6), "3");
    }

    #[test]
    fn currency_cells_accept_text() {
        assert_eq!(
            format_cell(AnyValue::String("1.500,5"), ColumnFormat::Currency),
            "R$ 1.500,50"
        );
        assert_eq!(format_cell(AnyValue::Float64(12.0), ColumnFormat::Currency), "R$ 12,00");
        assert_eq!(format_cell(AnyValue::Null, ColumnFormat::Currency), "");
    }

    #[test]
    fn date_cells_in_text_are_reformatted() {
        assert_eq!(
            format_cell(AnyValue::String("2025-03-05"), ColumnFormat::Date),
            "05/03/2025"
        );
        assert_eq!(
            format_cell(AnyValue::String("sem data"), ColumnFormat::Date),
            "sem data"
        );
    }
}
