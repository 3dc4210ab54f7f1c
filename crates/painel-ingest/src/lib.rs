//! Dataset loading for the dashboards.
//!
//! A loader fetches a published spreadsheet through a [`DataSource`], reads
//! it as CSV, normalizes headers and cell values according to the
//! dashboard's [`SchemaSpec`](painel_model::SchemaSpec) and produces an
//! immutable [`Dataset`] backed by a Polars `DataFrame`. The
//! [`DatasetCache`] keeps the latest dataset per source and swaps it
//! wholesale on refresh.

pub mod cache;
pub mod csv_table;
pub mod dataset;
pub mod error;
pub mod loader;
pub mod polars_utils;
pub mod source;

pub use cache::{DatasetCache, RefreshPolicy, RefreshWindow, Snapshot, TickOutcome};
pub use csv_table::{CsvTable, read_csv_table};
pub use dataset::Dataset;
pub use error::{IngestError, Result};
pub use loader::{build_frame, load_dataset};
pub use polars_utils::{
    any_to_date, any_to_f64, any_to_string, column_strings, date_from_epoch_days,
    date_to_epoch_days, format_numeric,
};
pub use source::{DataSource, FileSource, MemorySource};
