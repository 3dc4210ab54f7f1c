//! Declarative dashboard definitions.
//!
//! A [`DashboardSpec`] describes one dashboard end to end: where its data
//! comes from, how the raw spreadsheet is normalized, which filter controls
//! it offers, which aggregates it shows and which columns go into the
//! exported report. One generic pipeline consumes these definitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::criterion::{FilterMode, FilterValue};
use crate::status::DEFAULT_STATUS_WINDOW_DAYS;

/// Complete definition of one dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSpec {
    /// Stable identifier (e.g. "contratos").
    pub id: String,
    /// Title shown on screen and at the top of the report.
    pub title: String,
    /// Report subject, encoded into the exported file name.
    pub subject: String,
    pub source: SourceSpec,
    #[serde(default)]
    pub schema: SchemaSpec,
    #[serde(default)]
    pub controls: Vec<ControlSpec>,
    #[serde(default)]
    pub aggregates: Vec<AggregateSpec>,
    #[serde(default)]
    pub report: ReportSpec,
}

impl DashboardSpec {
    pub fn control(&self, id: &str) -> Option<&ControlSpec> {
        self.controls.iter().find(|control| control.id == id)
    }

    /// Controls whose option lists are re-derived from the filtered view.
    pub fn cascading_controls(&self) -> impl Iterator<Item = &ControlSpec> {
        self.controls.iter().filter(|control| control.cascading)
    }

    /// Every column referenced by a control, an aggregate or the report.
    pub fn referenced_columns(&self) -> BTreeSet<String> {
        let mut columns = BTreeSet::new();
        for control in &self.controls {
            columns.insert(control.column.clone());
        }
        for aggregate in &self.aggregates {
            columns.extend(aggregate.kind.columns().into_iter().map(str::to_string));
        }
        for column in &self.report.columns {
            columns.insert(column.column.clone());
        }
        columns
    }

    /// Loader schema extended with every referenced source column, so
    /// filters, aggregates and report columns never meet a missing column.
    pub fn load_schema(&self) -> SchemaSpec {
        let mut schema = self.schema.clone();
        let derived: BTreeSet<String> = schema
            .derived
            .iter()
            .map(|column| column.target().to_string())
            .collect();
        for column in self.referenced_columns() {
            if !derived.contains(&column) && !schema.required_columns.contains(&column) {
                schema.required_columns.push(column);
            }
        }
        schema
    }
}

/// Location of the tabular source and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Source identifier handed to the data source (file name, key, URL).
    pub location: String,
    /// Rows preceding the header row (banner lines in published sheets).
    #[serde(default)]
    pub skip_rows: usize,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl SourceSpec {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            skip_rows: 0,
            delimiter: default_delimiter(),
        }
    }
}

/// Normalization applied by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSpec {
    #[serde(default)]
    pub renames: Vec<ColumnRename>,
    /// Columns that must exist even when the source omits them.
    #[serde(default)]
    pub required_columns: Vec<String>,
    #[serde(default)]
    pub currency_columns: Vec<String>,
    #[serde(default)]
    pub date_columns: Vec<String>,
    #[serde(default)]
    pub code_columns: Vec<CodeColumn>,
    #[serde(default)]
    pub derived: Vec<DerivedColumn>,
    /// Whether ambiguous dates are read day-first (dd/mm/yyyy).
    #[serde(default = "default_day_first")]
    pub day_first: bool,
}

fn default_day_first() -> bool {
    true
}

impl Default for SchemaSpec {
    fn default() -> Self {
        Self {
            renames: Vec::new(),
            required_columns: Vec::new(),
            currency_columns: Vec::new(),
            date_columns: Vec::new(),
            code_columns: Vec::new(),
            derived: Vec::new(),
            day_first: default_day_first(),
        }
    }
}

impl SchemaSpec {
    /// Columns the loader guarantees to exist before derivation runs.
    pub fn ensured_columns(&self) -> BTreeSet<String> {
        let mut columns: BTreeSet<String> = self.required_columns.iter().cloned().collect();
        columns.extend(self.renames.iter().map(|rename| rename.to.clone()));
        columns.extend(self.currency_columns.iter().cloned());
        columns.extend(self.date_columns.iter().cloned());
        columns.extend(self.code_columns.iter().map(|code| code.column.clone()));
        columns.extend(self.derived.iter().map(|derived| derived.source().to_string()));
        columns
    }

    /// Columns known to exist after loading, derived ones included.
    pub fn declared_columns(&self) -> BTreeSet<String> {
        let mut columns = self.ensured_columns();
        columns.extend(self.derived.iter().map(|derived| derived.target().to_string()));
        columns
    }

    pub fn is_currency(&self, column: &str) -> bool {
        self.currency_columns.iter().any(|name| name == column)
    }

    pub fn is_date(&self, column: &str) -> bool {
        self.date_columns.iter().any(|name| name == column)
    }

    pub fn code_width(&self, column: &str) -> Option<usize> {
        self.code_columns
            .iter()
            .find(|code| code.column == column)
            .map(|code| code.width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

impl ColumnRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Classification code column, zero-padded to a fixed width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeColumn {
    pub column: String,
    pub width: usize,
}

/// Column computed from another column after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedColumn {
    /// Calendar year of a date column.
    Year { from: String, into: String },
    /// Month number (1-12) of a date column.
    Month { from: String, into: String },
    /// Vigency status of an end-date column.
    Status {
        from: String,
        into: String,
        #[serde(default = "default_window_days")]
        window_days: i64,
    },
}

fn default_window_days() -> i64 {
    DEFAULT_STATUS_WINDOW_DAYS
}

impl DerivedColumn {
    pub fn source(&self) -> &str {
        match self {
            Self::Year { from, .. } | Self::Month { from, .. } | Self::Status { from, .. } => from,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Year { into, .. } | Self::Month { into, .. } | Self::Status { into, .. } => into,
        }
    }
}

/// Label used in filter summaries when a control is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Placeholder {
    #[default]
    Todos,
    Todas,
}

impl Placeholder {
    pub fn label(self) -> &'static str {
        match self {
            Placeholder::Todos => "Todos",
            Placeholder::Todas => "Todas",
        }
    }
}

/// Value a control returns to when filters are cleared.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlDefault {
    #[default]
    None,
    Value { value: FilterValue },
    /// The calendar year of "today" at reset time.
    CurrentYear,
}

/// One filter control of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSpec {
    pub id: String,
    pub label: String,
    pub column: String,
    #[serde(default)]
    pub mode: FilterMode,
    /// Multi-select control (list values).
    #[serde(default)]
    pub multi: bool,
    /// Options re-derived from the filtered view.
    #[serde(default)]
    pub cascading: bool,
    #[serde(default)]
    pub default: ControlDefault,
    #[serde(default)]
    pub placeholder: Placeholder,
}

/// Aggregate shown on a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: AggregateKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateKind {
    /// Sum of a numeric column.
    Sum { column: String },
    /// Number of rows in the view.
    Count,
    /// Sum of `value` per distinct `group`.
    GroupSum { group: String, value: String },
    /// Row count per distinct `group`.
    GroupCount { group: String },
}

impl AggregateKind {
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::Sum { column } => vec![column.as_str()],
            Self::Count => Vec::new(),
            Self::GroupSum { group, value } => vec![group.as_str(), value.as_str()],
            Self::GroupCount { group } => vec![group.as_str()],
        }
    }
}

/// Columns of the exported detail table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSpec {
    #[serde(default)]
    pub columns: Vec<ReportColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportColumn {
    pub column: String,
    /// Header text; defaults to the column name.
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub format: ColumnFormat,
}

impl ReportColumn {
    pub fn new(column: impl Into<String>, format: ColumnFormat) -> Self {
        Self {
            column: column.into(),
            header: None,
            format,
        }
    }

    pub fn header(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.column)
    }
}

/// Display conversion applied to a report cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnFormat {
    #[default]
    Text,
    Currency,
    Date,
    Code,
    Integer,
    Number,
}
