//! Filter engine.
//!
//! A view is the AND of every active criterion over the dataset. Each
//! criterion is evaluated row by row into one shared mask, so the result
//! does not depend on the order criteria are given in.

use polars::prelude::*;
use tracing::debug;

use painel_ingest::{any_to_date, any_to_f64, any_to_string, column_strings};
use painel_model::{Criterion, FilterMode, FilterValue};
use painel_normalization::format_date;

use crate::error::{CoreError, Result};

/// Rows of a dataset that satisfy a set of criteria.
#[derive(Debug, Clone)]
pub struct FilteredView {
    data: DataFrame,
}

impl FilteredView {
    pub fn new(data: DataFrame) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    /// Canonical string values of a column, `None` when it is absent.
    pub fn column_strings(&self, name: &str) -> Option<Vec<String>> {
        column_strings(&self.data, name)
    }
}

/// Applies `criteria` to `dataset`. The dataset itself is never modified.
///
/// Inactive criteria are ignored, so `apply(dataset, &[])` yields every row.
pub fn apply(dataset: &DataFrame, criteria: &[Criterion]) -> Result<FilteredView> {
    let masks = CriterionMasks::evaluate(dataset, criteria)?;
    select(dataset, &masks.combined())
}

/// Per-criterion row masks over one dataset.
///
/// Each active criterion is evaluated once; views that leave some criteria
/// out are then combined from these masks without rescanning the data.
#[derive(Debug, Clone)]
pub struct CriterionMasks {
    height: usize,
    masks: Vec<(String, Vec<bool>)>,
}

impl CriterionMasks {
    pub fn evaluate(dataset: &DataFrame, criteria: &[Criterion]) -> Result<Self> {
        let height = dataset.height();
        let mut masks = Vec::new();
        for criterion in criteria.iter().filter(|criterion| criterion.is_active()) {
            let column = dataset
                .column(&criterion.column)
                .map_err(|_| CoreError::UnknownColumn {
                    column: criterion.column.clone(),
                })?;
            let Some(matcher) = Matcher::new(criterion.mode, &criterion.value) else {
                debug!(column = %criterion.column, "threshold is not numeric; criterion ignored");
                continue;
            };
            let mut mask = Vec::with_capacity(height);
            for idx in 0..height {
                mask.push(matcher.matches(column.get(idx)?));
            }
            debug!(
                column = %criterion.column,
                mode = ?criterion.mode,
                matching = mask.iter().filter(|keep| **keep).count(),
                "criterion evaluated"
            );
            masks.push((criterion.column.clone(), mask));
        }
        Ok(Self { height, masks })
    }

    /// Number of criteria that constrain rows.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Whether some criterion filters on `column`.
    pub fn constrains(&self, column: &str) -> bool {
        self.masks.iter().any(|(name, _)| name == column)
    }

    /// AND of every criterion.
    pub fn combined(&self) -> Vec<bool> {
        self.combine(|_| true)
    }

    /// AND of every criterion not on `column`.
    pub fn without_column(&self, column: &str) -> Vec<bool> {
        self.combine(|name| name != column)
    }

    fn combine(&self, include: impl Fn(&str) -> bool) -> Vec<bool> {
        let mut combined = vec![true; self.height];
        for (name, mask) in self.masks.iter().filter(|(name, _)| include(name)) {
            for (keep, matched) in combined.iter_mut().zip(mask) {
                *keep &= *matched;
            }
        }
        combined
    }
}

/// Rows of `dataset` whose mask entry is set.
pub fn select(dataset: &DataFrame, mask: &[bool]) -> Result<FilteredView> {
    if mask.iter().all(|keep| *keep) {
        return Ok(FilteredView::new(dataset.clone()));
    }
    let mask = BooleanChunked::from_slice("mask".into(), mask);
    Ok(FilteredView::new(dataset.filter(&mask)?))
}

/// One criterion prepared for row-by-row evaluation.
enum Matcher {
    Exact(Vec<ExactEntry>),
    Contains(Vec<String>),
    AtLeast(f64),
    AtMost(f64),
}

struct ExactEntry {
    text: String,
    number: Option<f64>,
}

impl Matcher {
    fn new(mode: FilterMode, value: &FilterValue) -> Option<Self> {
        let matcher = match mode {
            FilterMode::Exact => Self::Exact(
                value
                    .entries()
                    .into_iter()
                    .map(|text| {
                        let number = match value {
                            FilterValue::Number(number) => Some(*number),
                            _ => text.replace(',', ".").parse::<f64>().ok(),
                        };
                        ExactEntry { text, number }
                    })
                    .collect(),
            ),
            FilterMode::Contains => Self::Contains(
                value
                    .entries()
                    .iter()
                    .map(|entry| entry.to_lowercase())
                    .collect(),
            ),
            FilterMode::AtLeast => Self::AtLeast(value.as_number()?),
            FilterMode::AtMost => Self::AtMost(value.as_number()?),
        };
        Some(matcher)
    }

    fn matches(&self, cell: AnyValue<'_>) -> bool {
        if matches!(cell, AnyValue::Null) {
            return false;
        }
        match self {
            Self::Exact(entries) => {
                let forms = cell_forms(&cell);
                let number = if is_numeric(&cell) { any_to_f64(cell) } else { None };
                entries.iter().any(|entry| {
                    forms.iter().any(|form| *form == entry.text)
                        || matches!(
                            (number, entry.number),
                            (Some(have), Some(wanted)) if have == wanted
                        )
                })
            }
            Self::Contains(needles) => {
                let forms: Vec<String> = cell_forms(&cell)
                    .into_iter()
                    .map(|form| form.to_lowercase())
                    .collect();
                needles
                    .iter()
                    .any(|needle| forms.iter().any(|form| form.contains(needle.as_str())))
            }
            Self::AtLeast(threshold) => any_to_f64(cell).is_some_and(|value| value >= *threshold),
            Self::AtMost(threshold) => any_to_f64(cell).is_some_and(|value| value <= *threshold),
        }
    }
}

/// Strings a cell can be matched by: its canonical form, plus the
/// `dd/mm/yyyy` display form for dates.
fn cell_forms(cell: &AnyValue<'_>) -> Vec<String> {
    let canonical = any_to_string(cell.clone());
    match any_to_date(cell.clone()) {
        Some(date) => vec![canonical, format_date(date)],
        None => vec![canonical.trim().to_string()],
    }
}

fn is_numeric(cell: &AnyValue<'_>) -> bool {
    matches!(
        cell,
        AnyValue::Int8(_)
            | AnyValue::Int16(_)
            | AnyValue::Int32(_)
            | AnyValue::Int64(_)
            | AnyValue::UInt8(_)
            | AnyValue::UInt16(_)
            | AnyValue::UInt32(_)
            | AnyValue::UInt64(_)
            | AnyValue::Float32(_)
            | AnyValue::Float64(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
        let columns: Vec<Column> = columns
            .into_iter()
            .map(|(name, values)| {
                let values: Vec<Option<String>> = values
                    .into_iter()
                    .map(|value| (!value.is_empty()).then(|| value.to_string()))
                    .collect();
                Series::new(name.into(), values).into_column()
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn contains_is_case_insensitive_and_skips_nulls() {
        let df = test_df(vec![("Setor", vec!["Saúde", "ADMINISTRAÇÃO", "", "Obras"])]);
        let view = apply(&df, &[Criterion::contains("Setor", "a")]).unwrap();
        assert_eq!(
            view.column_strings("Setor").unwrap(),
            vec!["Saúde", "ADMINISTRAÇÃO", "Obras"]
        );
    }

    #[test]
    fn list_value_means_membership() {
        let df = test_df(vec![(
            "Modalidade",
            vec!["Pregão", "Dispensa", "Concorrência"],
        )]);
        let criterion = Criterion::one_of("Modalidade", ["Pregão", "Concorrência"]);
        let view = apply(&df, &[criterion]).unwrap();
        assert_eq!(view.height(), 2);
    }

    #[test]
    fn thresholds_compare_numbers() {
        let values = Series::new("Valor".into(), vec![10.0, 250.5, 1000.0]).into_column();
        let df = DataFrame::new(vec![values]).unwrap();
        let at_least = Criterion::new("Valor", FilterMode::AtLeast, FilterValue::text("250,5"));
        let at_most = Criterion::new("Valor", FilterMode::AtMost, FilterValue::Number(999.0));
        let view = apply(&df, &[at_least, at_most]).unwrap();
        assert_eq!(view.column_strings("Valor").unwrap(), vec!["250.5"]);
    }

    #[test]
    fn exact_text_matches_integer_cells() {
        let years = Series::new("Ano".into(), vec![Some(2024i32), Some(2025), None]).into_column();
        let df = DataFrame::new(vec![years]).unwrap();
        let view = apply(&df, &[Criterion::exact("Ano", "2025")]).unwrap();
        assert_eq!(view.height(), 1);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let df = test_df(vec![("Setor", vec!["A"])]);
        let error = apply(&df, &[Criterion::exact("Fornecedor", "X")]).unwrap_err();
        assert!(matches!(
            error,
            CoreError::UnknownColumn { column } if column == "Fornecedor"
        ));
    }

    #[test]
    fn inactive_criteria_do_not_check_columns() {
        let df = test_df(vec![("Setor", vec!["A", "B"])]);
        let view = apply(&df, &[Criterion::exact("Fornecedor", "  ")]).unwrap();
        assert_eq!(view.height(), 2);
    }

    #[test]
    fn masks_leave_out_one_column() {
        let df = test_df(vec![
            ("Setor", vec!["A", "B", "A", "C"]),
            ("Modalidade", vec!["Pregão", "Pregão", "Dispensa", "Pregão"]),
        ]);
        let criteria = [
            Criterion::exact("Setor", "A"),
            Criterion::exact("Modalidade", "Pregão"),
        ];
        let masks = CriterionMasks::evaluate(&df, &criteria).unwrap();
        assert_eq!(masks.len(), 2);
        assert!(masks.constrains("Setor"));
        assert!(!masks.constrains("Fornecedor"));
        assert_eq!(masks.combined(), vec![true, false, false, false]);
        assert_eq!(masks.without_column("Setor"), vec![true, true, false, true]);
        assert_eq!(masks.without_column("Modalidade"), vec![true, false, true, false]);

        let siblings = select(&df, &masks.without_column("Setor")).unwrap();
        assert_eq!(siblings.column_strings("Setor").unwrap(), vec!["A", "B", "C"]);
    }
}
