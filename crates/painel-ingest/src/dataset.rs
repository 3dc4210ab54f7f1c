use chrono::NaiveDateTime;
use polars::prelude::DataFrame;

/// An immutable, normalized dataset loaded from one source.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Source location the data came from.
    pub source: String,
    pub data: DataFrame,
    pub loaded_at: NaiveDateTime,
}

impl Dataset {
    pub fn new(source: impl Into<String>, data: DataFrame, loaded_at: NaiveDateTime) -> Self {
        Self {
            source: source.into(),
            data,
            loaded_at,
        }
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }
}
