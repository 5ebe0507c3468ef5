//! CLI argument definitions for the claims tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use claims_cli::view::ViewArgs;

#[derive(Parser)]
#[command(
    name = "claims",
    version,
    about = "Browse, filter, export and import healthcare claims",
    long_about = "Browse, filter, sort and export healthcare claims, and import new claims \
                  from CSV files.\n\n\
                  The working set is the built-in claims plus every claim imported into \
                  the data directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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

    /// Allow claim values (patient data) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Configuration file (default: ./claims.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding imported claims and import history.
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show one page of the claims table.
    List(ViewArgs),

    /// Export the filtered claims with the visible columns.
    Export(ExportArgs),

    /// Show claim counts and amounts for the filtered claims.
    Stats(ViewArgs),

    /// List the distinct values of a column (quick filter choices).
    Values(ValuesArgs),

    /// List the column groups and their columns.
    Columns,

    /// List the import target fields.
    Fields,

    /// Write the sample import file.
    Sample(SampleArgs),

    /// Show the headers, first rows and suggested mapping of an import file.
    Preview(PreviewArgs),

    /// Import claims from a CSV file.
    Import(ImportArgs),

    /// Show the import history, newest first.
    History(HistoryArgs),

    /// Remove every imported claim and the import history.
    Clear(ClearArgs),
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: ExportFormatArg,

    /// Write to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Export only these claim ids (repeatable).
    #[arg(long = "select", value_name = "ID")]
    pub select: Vec<String>,
}

#[derive(Args)]
pub struct ValuesArgs {
    /// Column key, title or label.
    #[arg(value_name = "COLUMN")]
    pub column: String,
}

#[derive(Args)]
pub struct SampleArgs {
    /// Write to this file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Map a file column onto a claim field (repeatable). Without any
    /// mapping the suggested mapping is used.
    #[arg(long = "map", value_name = "SOURCE=TARGET")]
    pub map: Vec<String>,

    /// Start from the suggested mapping and apply --map on top of it.
    #[arg(long = "auto-map")]
    pub auto_map: bool,

    /// Operator email recorded in the import history.
    #[arg(long = "email", value_name = "EMAIL")]
    pub email: Option<String>,

    /// Require every required field on each row, mapped or not.
    #[arg(long = "strict")]
    pub strict: bool,

    /// Validate and report without saving anything.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Show at most this many entries.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm the removal.
    #[arg(long = "yes")]
    pub yes: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Tsv,
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
