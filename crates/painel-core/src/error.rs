use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("column not found in dataset: {column}")]
    UnknownColumn { column: String },

    #[error("dashboard {dashboard} has no control {control}")]
    UnknownControl { dashboard: String, control: String },

    #[error(transparent)]
    Frame(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
