//! One dashboard run driven from the command line.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use tracing::{debug, info_span};

use painel_catalog::{Catalog, load_builtin_catalog, load_catalog};
use painel_core::{Dashboard, DashboardView, FilterState};
use painel_ingest::{DatasetCache, FileSource, RefreshPolicy};
use painel_report::{Report, build_report};

use crate::logging::redact_value;

/// Everything produced by one run.
#[derive(Debug)]
pub struct RunOutcome {
    pub dashboard: Dashboard,
    pub state: FilterState,
    pub view: DashboardView,
    /// `None` when the dataset was unavailable.
    pub report: Option<Report>,
}

impl RunOutcome {
    pub fn is_available(&self) -> bool {
        self.view.run().is_some()
    }
}

/// Parses a `CONTROL=VALUE` argument.
pub fn parse_filter_arg(raw: &str) -> std::result::Result<(String, String), String> {
    let (control, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CONTROL=VALUE, got {raw:?}"))?;
    let control = control.trim();
    if control.is_empty() {
        return Err(format!("missing control name in {raw:?}"));
    }
    Ok((control.to_string(), value.trim().to_string()))
}

/// The catalog at `path`, or the built-in one.
pub fn load_catalog_from(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            load_catalog(path).with_context(|| format!("load catalog {}", path.display()))
        }
        None => load_builtin_catalog().context("load built-in catalog"),
    }
}

/// Starts from the dashboard defaults, applies `filters` in order and
/// renders against the CSV files in `data_dir`.
pub fn run_dashboard(
    catalog: &Catalog,
    id: &str,
    data_dir: &Path,
    filters: &[(String, String)],
    now: NaiveDateTime,
    timestamp: bool,
) -> Result<RunOutcome> {
    let spec = catalog.get(id).ok_or_else(|| {
        anyhow!(
            "unknown dashboard {id:?} (available: {})",
            catalog.ids().join(", ")
        )
    })?;
    let span = info_span!("run", dashboard = %id);
    let _guard = span.enter();

    let dashboard = Dashboard::new(spec.clone());
    let mut state = dashboard.default_state(now.date());
    for (control, value) in filters {
        debug!(control = %control, value = %redact_value(value), "filter input");
        dashboard.set_input(&mut state, control, value)?;
    }

    let source = FileSource::new(data_dir);
    let cache = DatasetCache::new(RefreshPolicy::default());
    let view = dashboard.render(&cache, &source, now, &state);
    let report = build_report(
        dashboard.spec(),
        &state,
        view.run(),
        timestamp.then_some(now),
    );
    Ok(RunOutcome {
        dashboard,
        state,
        view,
        report,
    })
}
