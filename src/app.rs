//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments (plus `.env` defaults)
//! - sets up logging
//! - loads the sales data (CSV directory or demo series)
//! - prints a page report or hands over to the TUI

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{Command, DashArgs, ReportArgs};
use crate::domain::{clamp_horizon, DashboardConfig, DataSource, Page};
use crate::error::AppError;
use crate::io::DatasetCache;

pub mod pipeline;

/// Environment fallback for `--data-dir`.
pub const DATA_DIR_ENV: &str = "SALES_DATA_DIR";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Entry point for the `salesdash` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    // We want `salesdash` and `salesdash --demo` to behave like `salesdash tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    if let Err(err) = crate::logging::initialize() {
        eprintln!("warning: {err}");
    }

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Report(args) => handle_report(args, crate::io::global()),
    }
}

fn handle_report(args: ReportArgs, cache: &DatasetCache) -> Result<(), AppError> {
    let config = config_from_args(&args.dash, args.page);
    let dataset = cache.get_or_load(&config.source)?;

    let view = pipeline::build_view(config.page, dataset, config.horizon)?;
    println!("{}", crate::report::format_page(&view));

    if !args.no_plot {
        let plot = match &view {
            pipeline::PageView::Overview(v) => {
                Some(crate::plot::render_overview_plot(v, config.plot_width, config.plot_height))
            }
            pipeline::PageView::Forecasts(v) => {
                Some(crate::plot::render_forecast_plot(v, config.plot_width, config.plot_height))
            }
            _ => None,
        };
        if let Some(plot) = plot {
            println!("{plot}");
        }
    }

    let stats = &dataset.stats;
    if !stats.row_errors.is_empty() {
        eprintln!("{} row(s) skipped while loading; see Data Quality.", stats.row_errors.len());
    }
    Ok(())
}

fn handle_tui(args: DashArgs) -> Result<(), AppError> {
    let config = config_from_args(&args, Page::Overview);
    crate::tui::run(config)
}

/// Build the run configuration from parsed flags and the environment.
pub fn config_from_args(args: &DashArgs, page: Page) -> DashboardConfig {
    let env_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
    DashboardConfig {
        source: resolve_source(args, env_dir),
        horizon: clamp_horizon(usize::from(args.horizon)),
        page,
        plot_width: args.width,
        plot_height: args.height,
    }
}

/// `--demo` wins, then `--data-dir`, then the environment, then `./data`.
fn resolve_source(args: &DashArgs, env_dir: Option<PathBuf>) -> DataSource {
    if args.demo {
        return DataSource::Demo {
            seed: args.seed,
            days: args.demo_days as usize,
        };
    }
    let dir = args
        .data_dir
        .clone()
        .or(env_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    DataSource::Directory(dir)
}

/// Rewrite argv so `salesdash` defaults to `salesdash tui`.
///
/// Rules:
/// - `salesdash`                      -> `salesdash tui`
/// - `salesdash --demo ...`           -> `salesdash tui --demo ...`
/// - `salesdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
