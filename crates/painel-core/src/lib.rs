//! Filter-and-aggregate pipeline behind every dashboard.
//!
//! - [`filter`]: criteria to filtered view
//! - [`options`]: cascading option lists from a view
//! - [`aggregate`]: sums and groupings over a view
//! - [`dashboard`]: the declarative pipeline tying them together

pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod options;

pub use aggregate::{GroupCount, GroupTotal, group_count, group_sum, sort_groups_desc, sum_column};
pub use dashboard::{
    AggregateResult, AggregateValue, Dashboard, DashboardView, FilterState, PipelineRun,
};
pub use error::{CoreError, Result};
pub use filter::{CriterionMasks, FilteredView, apply, select};
pub use options::{derive_all, derive_options};
