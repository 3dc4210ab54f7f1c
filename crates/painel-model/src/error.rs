use thiserror::Error;

#[derive(Debug, Error)]
pub enum PainelError {
    #[error("unknown status label: {0:?}")]
    UnknownStatus(String),
}

pub type Result<T> = std::result::Result<T, PainelError>;
