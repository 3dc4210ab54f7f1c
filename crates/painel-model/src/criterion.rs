//! Filter criteria.
//!
//! A criterion is an optional constraint: when its value is empty it
//! contributes nothing, so clearing a single control never excludes rows.

use serde::{Deserialize, Serialize};

/// How a criterion compares a cell against its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Equality, or membership when the value is a list.
    #[default]
    #[serde(alias = "one_of")]
    Exact,
    /// Case-insensitive substring of the stringified cell.
    Contains,
    /// Numeric cell greater than or equal to the value.
    AtLeast,
    /// Numeric cell less than or equal to the value.
    AtMost,
}

/// Value carried by a criterion or a filter control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Builds a value from raw control input.
    ///
    /// Multi-select controls split on commas; blank entries are dropped.
    pub fn from_input(raw: &str, multi: bool) -> Self {
        if multi {
            Self::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect(),
            )
        } else {
            Self::Text(raw.trim().to_string())
        }
    }

    /// True when the value constrains nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Number(value) => value.is_nan(),
            Self::Text(value) => value.trim().is_empty(),
            Self::List(values) => values.iter().all(|value| value.trim().is_empty()),
        }
    }

    /// Non-blank entries as strings. Numbers render without trailing zeros.
    pub fn entries(&self) -> Vec<String> {
        match self {
            Self::Number(value) if value.is_nan() => Vec::new(),
            Self::Number(value) => vec![format_number(*value)],
            Self::Text(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    Vec::new()
                } else {
                    vec![trimmed.to_string()]
                }
            }
            Self::List(values) => values
                .iter()
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Numeric reading of the value, used by threshold modes.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) if !value.is_nan() => Some(*value),
            Self::Number(_) => None,
            Self::Text(value) => value.trim().replace(',', ".").parse::<f64>().ok(),
            Self::List(values) => values
                .iter()
                .find_map(|value| value.trim().replace(',', ".").parse::<f64>().ok()),
        }
    }

    /// Human-readable form used in filter summaries.
    pub fn display(&self) -> String {
        self.entries().join(", ")
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One `(column, mode, value)` filter constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub column: String,
    pub mode: FilterMode,
    pub value: FilterValue,
}

impl Criterion {
    pub fn new(column: impl Into<String>, mode: FilterMode, value: FilterValue) -> Self {
        Self {
            column: column.into(),
            mode,
            value,
        }
    }

    pub fn exact(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterMode::Exact, FilterValue::text(value))
    }

    pub fn contains(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(column, FilterMode::Contains, FilterValue::text(value))
    }

    pub fn one_of<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(column, FilterMode::Exact, FilterValue::list(values))
    }

    /// Whether the criterion constrains anything.
    pub fn is_active(&self) -> bool {
        !self.value.is_empty()
    }
}
