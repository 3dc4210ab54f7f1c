use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to fetch {location}: {message}")]
    Fetch { location: String, message: String },

    #[error("failed to read CSV {location}: {source}")]
    Csv {
        location: String,
        #[source]
        source: csv::Error,
    },

    #[error("invalid delimiter {delimiter:?} for {location}: must be a single ASCII character")]
    Delimiter { location: String, delimiter: char },

    #[error("failed to build dataset {location}: {source}")]
    Frame {
        location: String,
        #[source]
        source: polars::error::PolarsError,
    },
}

impl IngestError {
    pub(crate) fn fetch(location: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Whether the failure happened before any data was read.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Fetch { location, .. }
            | Self::Csv { location, .. }
            | Self::Delimiter { location, .. }
            | Self::Frame { location, .. } => location,
        }
    }

    /// The cause without the location prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::Fetch { message, .. } => message.clone(),
            Self::Csv { source, .. } => source.to_string(),
            Self::Delimiter { delimiter, .. } => format!("invalid delimiter {delimiter:?}"),
            Self::Frame { source, .. } => source.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
