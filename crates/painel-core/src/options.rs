//! Option lists for filter controls.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;

use painel_model::{DashboardSpec, FilterValue};

use crate::dashboard::FilterState;
use crate::error::Result;
use crate::filter::{CriterionMasks, FilteredView, select};

/// Distinct non-blank values of `column` in the view, sorted ascending.
///
/// Values in `selected` that no longer occur in the view are appended in
/// selection order, so a control never loses its current choice.
pub fn derive_options(view: &FilteredView, column: &str, selected: &[String]) -> Vec<String> {
    let distinct: BTreeSet<String> = view
        .column_strings(column)
        .unwrap_or_default()
        .into_iter()
        .filter(|value| !value.trim().is_empty())
        .collect();
    let mut options: Vec<String> = distinct.iter().cloned().collect();
    for value in selected {
        let value = value.trim();
        if value.is_empty()
            || distinct.contains(value)
            || options.iter().any(|option| option == value)
        {
            continue;
        }
        options.push(value.to_string());
    }
    options
}

/// Options of every cascading control, keyed by control id.
///
/// A control's options come from the rows that pass every other active
/// criterion, so a multi-select control keeps offering values next to the
/// ones already picked. Controls whose column nothing filters on share the
/// fully filtered `view`.
pub fn derive_all(
    spec: &DashboardSpec,
    dataset: &DataFrame,
    masks: &CriterionMasks,
    view: &FilteredView,
    state: &FilterState,
) -> Result<BTreeMap<String, Vec<String>>> {
    let mut options = BTreeMap::new();
    for control in spec.cascading_controls() {
        let selected = state
            .get(&control.id)
            .map(FilterValue::entries)
            .unwrap_or_default();
        let values = if masks.constrains(&control.column) {
            let siblings = select(dataset, &masks.without_column(&control.column))?;
            derive_options(&siblings, &control.column, &selected)
        } else {
            derive_options(view, &control.column, &selected)
        };
        options.insert(control.id.clone(), values);
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn view(values: Vec<Option<&str>>) -> FilteredView {
        let series = Series::new("Fornecedor".into(), values).into_column();
        FilteredView::new(DataFrame::new(vec![series]).unwrap())
    }

    #[test]
    fn sorted_distinct_without_blanks() {
        let view = view(vec![Some("Beta"), None, Some("Alfa"), Some("Beta"), Some(" ")]);
        assert_eq!(derive_options(&view, "Fornecedor", &[]), vec!["Alfa", "Beta"]);
    }

    #[test]
    fn keeps_selection_missing_from_view() {
        let view = view(vec![Some("Beta")]);
        let selected = vec!["Zeta".to_string(), "Beta".to_string(), "Gama".to_string()];
        assert_eq!(
            derive_options(&view, "Fornecedor", &selected),
            vec!["Beta", "Zeta", "Gama"]
        );
    }

    #[test]
    fn absent_column_yields_only_selection() {
        let view = view(vec![Some("Beta")]);
        assert_eq!(
            derive_options(&view, "Setor", &["A".to_string()]),
            vec!["A"]
        );
    }
}
