use painel_core::FilterState;
use painel_model::{DashboardSpec, FilterValue};

/// One line describing every filter control, in control order.
///
/// Unset controls show their placeholder (`Todos` / `Todas`); list values
/// are joined with `, `.
///
/// ```text
/// Setor: Obras, Saúde | Fornecedor: Todos | Ano: 2025
/// ```
pub fn filter_summary(spec: &DashboardSpec, state: &FilterState) -> String {
    spec.controls
        .iter()
        .map(|control| {
            let value = state
                .get(&control.id)
                .map(FilterValue::display)
                .filter(|display| !display.is_empty())
                .unwrap_or_else(|| control.placeholder.label().to_string());
            format!("{}: {value}", control.label)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}
