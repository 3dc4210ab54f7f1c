//! Declarative dashboard pipeline.
//!
//! Every dashboard runs the same steps: resolve the filter state into
//! criteria, compute one filtered view, derive the cascading option lists
//! from that view and compute the declared aggregates over it. What
//! differs between dashboards lives in their [`DashboardSpec`].

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, info, info_span, warn};

use painel_ingest::{
    DataSource, Dataset, DatasetCache, IngestError, Snapshot, TickOutcome, load_dataset,
};
use painel_model::{AggregateKind, ControlDefault, Criterion, DashboardSpec, FilterValue};

use crate::aggregate::{GroupCount, GroupTotal, group_count, group_sum, sum_column};
use crate::error::{CoreError, Result};
use crate::filter::{CriterionMasks, FilteredView, select};
use crate::options::derive_all;

/// Current value of each filter control, keyed by control id.
///
/// A control without an entry is unset and filters nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    values: BTreeMap<String, FilterValue>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a control. An empty value clears it instead.
    pub fn set(&mut self, control: impl Into<String>, value: FilterValue) {
        let control = control.into();
        if value.is_empty() {
            self.values.remove(&control);
        } else {
            self.values.insert(control, value);
        }
    }

    pub fn clear_control(&mut self, control: &str) {
        self.values.remove(control);
    }

    pub fn get(&self, control: &str) -> Option<&FilterValue> {
        self.values.get(control)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(id, value)| (id.as_str(), value))
    }

    /// `(label, value)` of every set control, in control order.
    pub fn active_labels<'a>(&self, spec: &'a DashboardSpec) -> Vec<(&'a str, String)> {
        spec.controls
            .iter()
            .filter_map(|control| {
                self.get(&control.id)
                    .map(|value| (control.label.as_str(), value.display()))
            })
            .collect()
    }
}

/// Result of one aggregate over a view.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateValue {
    Total(f64),
    Count(usize),
    GroupTotals(Vec<GroupTotal>),
    GroupCounts(Vec<GroupCount>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub id: String,
    pub label: String,
    pub value: AggregateValue,
}

/// Everything a dashboard shows for one filter state.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub view: FilteredView,
    /// Option lists of the cascading controls, keyed by control id.
    pub options: BTreeMap<String, Vec<String>>,
    pub aggregates: Vec<AggregateResult>,
}

impl PipelineRun {
    pub fn aggregate(&self, id: &str) -> Option<&AggregateResult> {
        self.aggregates.iter().find(|aggregate| aggregate.id == id)
    }
}

/// What a dashboard displays: its run, or a message when data is missing.
#[derive(Debug, Clone)]
pub enum DashboardView {
    Ready(PipelineRun),
    Unavailable { message: String },
}

impl DashboardView {
    pub fn run(&self) -> Option<&PipelineRun> {
        match self {
            Self::Ready(run) => Some(run),
            Self::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    spec: DashboardSpec,
}

impl Dashboard {
    pub fn new(spec: DashboardSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &DashboardSpec {
        &self.spec
    }

    pub fn id(&self) -> &str {
        &self.spec.id
    }

    /// Source location of the dashboard's dataset.
    pub fn location(&self) -> &str {
        &self.spec.source.location
    }

    /// Cache entry of this dashboard's dataset.
    ///
    /// The dataset is loaded with this dashboard's own schema, so two
    /// dashboards reading the same location keep separate entries.
    pub fn cache_key(&self) -> &str {
        &self.spec.id
    }

    /// Initial state: every control at its declared default.
    pub fn default_state(&self, today: NaiveDate) -> FilterState {
        let mut state = FilterState::new();
        for control in &self.spec.controls {
            match &control.default {
                ControlDefault::None => {}
                ControlDefault::Value { value } => state.set(control.id.clone(), value.clone()),
                ControlDefault::CurrentYear => {
                    state.set(control.id.clone(), FilterValue::text(today.year().to_string()));
                }
            }
        }
        state
    }

    /// The "clear filters" action: back to the defaults, not to nothing.
    pub fn clear(&self, today: NaiveDate) -> FilterState {
        self.default_state(today)
    }

    /// Sets a control from raw user input. Multi-select controls split the
    /// input on commas; blank input clears the control.
    pub fn set_input(&self, state: &mut FilterState, control: &str, raw: &str) -> Result<()> {
        let spec = self
            .spec
            .control(control)
            .ok_or_else(|| CoreError::UnknownControl {
                dashboard: self.spec.id.clone(),
                control: control.to_string(),
            })?;
        state.set(spec.id.clone(), FilterValue::from_input(raw, spec.multi));
        Ok(())
    }

    /// One criterion per control that has a value.
    pub fn criteria(&self, state: &FilterState) -> Vec<Criterion> {
        self.spec
            .controls
            .iter()
            .filter_map(|control| {
                state.get(&control.id).map(|value| {
                    Criterion::new(control.column.clone(), control.mode, value.clone())
                })
            })
            .collect()
    }

    /// Evaluates every criterion once, then computes the aggregates over
    /// the filtered view and each cascading control's options over the rows
    /// its sibling criteria keep.
    pub fn run(&self, dataset: &Dataset, state: &FilterState) -> Result<PipelineRun> {
        let span = info_span!("dashboard", id = %self.spec.id);
        let _guard = span.enter();
        let start = Instant::now();

        let criteria = self.criteria(state);
        let masks = CriterionMasks::evaluate(&dataset.data, &criteria)?;
        let view = select(&dataset.data, &masks.combined())?;
        let options = derive_all(&self.spec, &dataset.data, &masks, &view, state)?;
        let aggregates = self
            .spec
            .aggregates
            .iter()
            .map(|aggregate| AggregateResult {
                id: aggregate.id.clone(),
                label: aggregate.label.clone(),
                value: compute(&aggregate.kind, &view),
            })
            .collect();

        debug!(
            criteria = criteria.len(),
            rows = view.height(),
            total_rows = dataset.height(),
            duration_ms = start.elapsed().as_millis(),
            "pipeline run"
        );
        Ok(PipelineRun {
            view,
            options,
            aggregates,
        })
    }

    /// Cached dataset of this dashboard, loaded on first access.
    pub fn dataset(
        &self,
        cache: &DatasetCache,
        source: &dyn DataSource,
        now: NaiveDateTime,
    ) -> std::result::Result<Arc<Snapshot>, IngestError> {
        cache.get_or_load(self.cache_key(), now, || self.load(source, now))
    }

    /// Refresh tick for this dashboard's source.
    pub fn refresh(
        &self,
        cache: &DatasetCache,
        source: &dyn DataSource,
        now: NaiveDateTime,
    ) -> TickOutcome {
        cache.on_tick(self.cache_key(), now, || self.load(source, now))
    }

    /// Loads (if needed) and runs the dashboard.
    ///
    /// Failures never escape: they become an `Unavailable` view and leave
    /// the cache and every other dashboard untouched.
    pub fn render(
        &self,
        cache: &DatasetCache,
        source: &dyn DataSource,
        now: NaiveDateTime,
        state: &FilterState,
    ) -> DashboardView {
        let snapshot = match self.dataset(cache, source, now) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(dashboard = %self.spec.id, error = %error, "dataset unavailable");
                return DashboardView::Unavailable {
                    message: format!(
                        "Erro ao carregar dados de {}: {}",
                        error.location(),
                        error.reason()
                    ),
                };
            }
        };
        match self.run(&snapshot.dataset, state) {
            Ok(run) => {
                info!(dashboard = %self.spec.id, rows = run.view.height(), "dashboard rendered");
                DashboardView::Ready(run)
            }
            Err(error) => {
                warn!(dashboard = %self.spec.id, error = %error, "dashboard run failed");
                DashboardView::Unavailable {
                    message: format!("Erro ao processar o painel {}: {error}", self.spec.title),
                }
            }
        }
    }

    fn load(&self, source: &dyn DataSource, now: NaiveDateTime) -> painel_ingest::Result<Dataset> {
        load_dataset(source, &self.spec.source, &self.spec.load_schema(), now)
    }
}

fn compute(kind: &AggregateKind, view: &FilteredView) -> AggregateValue {
    match kind {
        AggregateKind::Sum { column } => AggregateValue::Total(sum_column(view, column)),
        AggregateKind::Count => AggregateValue::Count(view.height()),
        AggregateKind::GroupSum { group, value } => {
            AggregateValue::GroupTotals(group_sum(view, group, value))
        }
        AggregateKind::GroupCount { group } => {
            AggregateValue::GroupCounts(group_count(view, group))
        }
    }
}
