//! Shared data model for the dashboard pipeline.
//!
//! Every other crate in the workspace speaks in these types: filter
//! criteria, the derived vigency status, and the declarative dashboard
//! definitions consumed by the loader, the filter engine and the report
//! formatter.

pub mod criterion;
pub mod dashboard;
pub mod error;
pub mod status;

pub use criterion::{Criterion, FilterMode, FilterValue};
pub use dashboard::{
    AggregateKind, AggregateSpec, CodeColumn, ColumnFormat, ColumnRename, ControlDefault,
    ControlSpec, DashboardSpec, DerivedColumn, Placeholder, ReportColumn, ReportSpec, SchemaSpec,
    SourceSpec,
};
pub use error::{PainelError, Result};
pub use status::{DEFAULT_STATUS_WINDOW_DAYS, Status};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_with_blank_value_is_inactive() {
        let criterion = Criterion::new("Setor", FilterMode::Contains, FilterValue::text("  "));
        assert!(!criterion.is_active());
    }

    #[test]
    fn status_labels_round_trip() {
        for status in Status::ALL {
            assert_eq!(status.label().parse::<Status>().ok(), Some(status));
        }
    }
}
