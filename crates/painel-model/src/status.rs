//! Vigency status derived from an end date.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PainelError;

/// Days before the end date during which a record is "about to expire".
pub const DEFAULT_STATUS_WINDOW_DAYS: i64 = 10;

/// Three-valued vigency classification.
///
/// Records whose end date is missing or unparseable carry no status at all;
/// that absence is modelled as `Option<Status>` by the callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    /// More than the window remains before the end date.
    Vigente,
    /// Between zero and the window (inclusive) days remain.
    ProximoDoVencimento,
    /// The end date has passed.
    Vencido,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Vigente, Status::ProximoDoVencimento, Status::Vencido];

    /// Display label, as shown in dashboards and used as the filter value.
    pub fn label(self) -> &'static str {
        match self {
            Status::Vigente => "Vigente",
            Status::ProximoDoVencimento => "Próximo do Vencimento",
            Status::Vencido => "Vencido",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = PainelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PainelError::UnknownStatus(trimmed.to_string()))
    }
}
