//! CLI argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use painel_cli::session::parse_filter_arg;

#[derive(Parser)]
#[command(
    name = "painel",
    version,
    about = "Painéis de transparência - filtros, totais e relatórios sobre planilhas publicadas",
    long_about = "Run the transparency dashboards over local copies of their published sheets.\n\n\
                  Each dashboard reads one CSV file, applies the requested filters and prints\n\
                  its totals, groupings and the first rows of the filtered data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Dashboard catalog (TOML). Defaults to the built-in catalog.
    #[arg(long = "catalog", value_name = "PATH", env = "PAINEL_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include filter values in logs (they can contain personal names).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the dashboards of the catalog.
    Dashboards,

    /// Run one dashboard and print its totals and rows.
    Run(RunArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Dashboard id (see `painel dashboards`).
    #[arg(value_name = "DASHBOARD")]
    pub dashboard: String,

    /// Directory holding the dashboard CSV files.
    #[arg(long = "data-dir", value_name = "DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Filter as CONTROL=VALUE; repeat for more controls. Multi-select
    /// controls take comma-separated values, an empty value clears a default.
    #[arg(
        short = 'f',
        long = "filter",
        value_name = "CONTROL=VALUE",
        value_parser = parse_filter_arg
    )]
    pub filters: Vec<(String, String)>,

    /// Reference date for statuses and year defaults (default: today).
    #[arg(long = "today", value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,

    /// Write the report as JSON to this path.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Number of detail rows to print.
    #[arg(long = "rows", default_value_t = 10)]
    pub rows: usize,

    /// Stamp the report with the generation time.
    #[arg(long = "timestamp")]
    pub timestamp: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
