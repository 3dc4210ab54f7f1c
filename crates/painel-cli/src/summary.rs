use std::collections::BTreeMap;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use painel_catalog::Catalog;
use painel_core::DashboardView;
use painel_report::{FormattedTable, Report};

use painel_cli::session::RunOutcome;

pub fn print_dashboards(catalog: &Catalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dashboard"),
        header_cell("Title"),
        header_cell("Source"),
        header_cell("Controls"),
        header_cell("Aggregates"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for spec in catalog.iter() {
        table.add_row(vec![
            Cell::new(&spec.id)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(&spec.title),
            Cell::new(&spec.source.location),
            Cell::new(spec.controls.len()),
            Cell::new(spec.aggregates.len()),
        ]);
    }
    println!("{table}");
}

pub fn print_outcome(outcome: &RunOutcome, rows: usize) {
    let spec = outcome.dashboard.spec();
    println!("{}", spec.title);
    let run = match &outcome.view {
        DashboardView::Ready(run) => run,
        DashboardView::Unavailable { message } => {
            eprintln!("{message}");
            return;
        }
    };
    let Some(report) = &outcome.report else {
        return;
    };
    println!("Filtros: {}", report.filter_summary);
    println!("Registros: {}", report.row_count);

    for summary in &report.summaries {
        println!();
        println!("{}", summary.title);
        println!("{}", formatted_table(&summary.table, None));
    }

    print_options(outcome, &run.options);
    print_detail(report, rows);
}

fn print_options(outcome: &RunOutcome, options: &BTreeMap<String, Vec<String>>) {
    if options.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Control"),
        header_cell("Options"),
        header_cell("Selected"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for control in outcome.dashboard.spec().cascading_controls() {
        let Some(values) = options.get(&control.id) else {
            continue;
        };
        let selected = match outcome.state.get(&control.id) {
            Some(value) => Cell::new(value.display()),
            None => dim_cell(control.placeholder.label()),
        };
        table.add_row(vec![
            Cell::new(&control.label),
            Cell::new(values.len()),
            selected,
        ]);
    }
    println!();
    println!("{table}");
}

fn print_detail(report: &Report, rows: usize) {
    if rows == 0 {
        return;
    }
    println!();
    if report.detail.is_empty() {
        println!("Nenhum registro encontrado.");
        return;
    }
    println!("{}", formatted_table(&report.detail, Some(rows)));
    if report.row_count > rows {
        println!("... {} de {} registros", rows, report.row_count);
    }
}

fn formatted_table(formatted: &FormattedTable, limit: Option<usize>) -> Table {
    let mut table = Table::new();
    table.set_header(formatted.headers.iter().map(|header| header_cell(header)));
    apply_table_style(&mut table);
    let limit = limit.unwrap_or(formatted.rows.len());
    for row in formatted.rows.iter().take(limit) {
        table.add_row(row);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
