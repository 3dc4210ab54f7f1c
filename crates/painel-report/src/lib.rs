//! Report formatting for dashboard exports.
//!
//! Produces a renderer-neutral [`Report`]: display strings only, serialized
//! as JSON. Page layout and PDF generation happen outside this workspace.

pub mod filename;
pub mod format;
pub mod report;
pub mod summary;

pub use filename::{report_filename, slugify};
pub use format::{FormattedTable, format_cell, format_decimal, format_integer, format_table};
pub use report::{Report, SummaryTable, TOTALS_TITLE, build_report, summary_tables};
pub use summary::filter_summary;
