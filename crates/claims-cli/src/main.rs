//! Claims command-line tool.

use clap::{ColorChoice, Parser};
use claims_cli::config::AppConfig;
use claims_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    Workspace, run_clear, run_columns, run_export, run_fields, run_history, run_import, run_list,
    run_preview, run_sample, run_stats, run_values,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Fields => return run_fields(),
        Command::Sample(args) => return run_sample(args),
        _ => {}
    }
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let mut workspace = Workspace::open(config)?;
    match cli.command {
        Command::List(args) => run_list(&workspace, &args),
        Command::Export(args) => run_export(&workspace, &args),
        Command::Stats(args) => run_stats(&workspace, &args),
        Command::Values(args) => run_values(&workspace, &args),
        Command::Columns => run_columns(&workspace),
        Command::Preview(args) => run_preview(&workspace, &args),
        Command::Import(args) => run_import(&mut workspace, &args),
        Command::History(args) => run_history(&workspace, &args),
        Command::Clear(args) => run_clear(&mut workspace, &args),
        Command::Fields | Command::Sample(_) => Ok(()),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let mut config = LogConfig::default()
        .with_level_filter(level_filter)
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_log_data(cli.log_data);
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
