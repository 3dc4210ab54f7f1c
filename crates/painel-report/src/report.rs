//! The report artifact handed to the PDF layer.

use chrono::NaiveDateTime;
use serde::Serialize;

use painel_core::{AggregateValue, FilterState, PipelineRun, sort_groups_desc};
use painel_model::{AggregateKind, DashboardSpec};
use painel_normalization::format_currency;

use crate::filename::report_filename;
use crate::format::{FormattedTable, format_decimal, format_integer, format_table};
use crate::summary::filter_summary;

/// Title of the table holding the scalar aggregates.
pub const TOTALS_TITLE: &str = "Resumo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    pub title: String,
    #[serde(flatten)]
    pub table: FormattedTable,
}

/// Everything the renderer needs to lay out one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub dashboard: String,
    pub title: String,
    pub filename: String,
    /// `dd/mm/yyyy HH:MM`, when the report is timestamped.
    pub generated_at: Option<String>,
    pub filter_summary: String,
    pub row_count: usize,
    pub summaries: Vec<SummaryTable>,
    pub detail: FormattedTable,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds the report for the current run.
///
/// Returns `None` when there is no run, so exporting before any data was
/// loaded does nothing.
pub fn build_report(
    spec: &DashboardSpec,
    state: &FilterState,
    run: Option<&PipelineRun>,
    generated_at: Option<NaiveDateTime>,
) -> Option<Report> {
    let run = run?;
    Some(Report {
        dashboard: spec.id.clone(),
        title: spec.title.clone(),
        filename: report_filename(&spec.subject, generated_at),
        generated_at: generated_at.map(|at| at.format("%d/%m/%Y %H:%M").to_string()),
        filter_summary: filter_summary(spec, state),
        row_count: run.view.height(),
        summaries: summary_tables(spec, run),
        detail: format_table(&run.view, &spec.report.columns),
    })
}

/// A totals table for the scalar aggregates, then one table per grouping,
/// largest group first.
pub fn summary_tables(spec: &DashboardSpec, run: &PipelineRun) -> Vec<SummaryTable> {
    let mut totals = FormattedTable {
        headers: vec!["Indicador".to_string(), "Valor".to_string()],
        rows: Vec::new(),
    };
    let mut groups = Vec::new();
    for aggregate in &spec.aggregates {
        let Some(result) = run.aggregate(&aggregate.id) else {
            continue;
        };
        match (&aggregate.kind, &result.value) {
            (AggregateKind::Sum { column }, AggregateValue::Total(total)) => {
                let value = if spec.schema.is_currency(column) {
                    format_currency(*total)
                } else {
                    format_decimal(*total)
                };
                totals.rows.push(vec![aggregate.label.clone(), value]);
            }
            (AggregateKind::Count, AggregateValue::Count(count)) => {
                totals
                    .rows
                    .push(vec![aggregate.label.clone(), format_integer(*count as f64)]);
            }
            (AggregateKind::GroupSum { group, value }, AggregateValue::GroupTotals(entries)) => {
                let mut entries = entries.clone();
                sort_groups_desc(&mut entries);
                let currency = spec.schema.is_currency(value);
                groups.push(SummaryTable {
                    title: aggregate.label.clone(),
                    table: FormattedTable {
                        headers: vec![group.clone(), value.clone()],
                        rows: entries
                            .into_iter()
                            .map(|entry| {
                                let total = if currency {
                                    format_currency(entry.total)
                                } else {
                                    format_decimal(entry.total)
                                };
                                vec![entry.group, total]
                            })
                            .collect(),
                    },
                });
            }
            (AggregateKind::GroupCount { group }, AggregateValue::GroupCounts(entries)) => {
                let mut entries = entries.clone();
                entries.sort_by(|a, b| b.count.cmp(&a.count));
                groups.push(SummaryTable {
                    title: aggregate.label.clone(),
                    table: FormattedTable {
                        headers: vec![group.clone(), "Quantidade".to_string()],
                        rows: entries
                            .into_iter()
                            .map(|entry| vec![entry.group, format_integer(entry.count as f64)])
                            .collect(),
                    },
                });
            }
            _ => {}
        }
    }

    let mut tables = Vec::with_capacity(groups.len() + 1);
    if !totals.is_empty() {
        tables.push(SummaryTable {
            title: TOTALS_TITLE.to_string(),
            table: totals,
        });
    }
    tables.extend(groups);
    tables
}
