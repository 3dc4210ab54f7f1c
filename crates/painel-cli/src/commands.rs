use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use painel_cli::session::{RunOutcome, load_catalog_from, run_dashboard};

use crate::cli::{Cli, RunArgs};
use crate::summary::print_dashboards;

pub fn run_dashboards(cli: &Cli) -> Result<()> {
    let catalog = load_catalog_from(cli.catalog.as_deref())?;
    print_dashboards(&catalog);
    Ok(())
}

pub fn run_dashboard_command(cli: &Cli, args: &RunArgs) -> Result<RunOutcome> {
    let catalog = load_catalog_from(cli.catalog.as_deref())?;
    let mut now = Local::now().naive_local();
    if let Some(today) = args.today {
        now = today.and_time(now.time());
    }
    let outcome = run_dashboard(
        &catalog,
        &args.dashboard,
        &args.data_dir,
        &args.filters,
        now,
        args.timestamp,
    )?;

    if let (Some(path), Some(report)) = (&args.report_json, &outcome.report) {
        let json = report.to_json().context("serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("write report {}", path.display()))?;
        info!(path = %path.display(), filename = %report.filename, "report written");
    }
    Ok(outcome)
}
