//! Command-line parsing for the retail sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analytics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::MAX_DEMO_DAYS;
use crate::domain::{Page, HORIZON_MAX, HORIZON_MIN};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "salesdash", version, about = "Retail sales forecasting dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(DashArgs),
    /// Print one page as plain text (useful for scripting).
    Report(ReportArgs),
}

/// Options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct DashArgs {
    /// Directory holding train.csv, stores.csv and holidays_events.csv.
    ///
    /// Falls back to `SALES_DATA_DIR`, then `./data`.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Forecast horizon in days (30-90).
    #[arg(
        long,
        default_value_t = HORIZON_MIN as u16,
        value_parser = clap::value_parser!(u16).range(HORIZON_MIN as i64..=HORIZON_MAX as i64)
    )]
    pub horizon: u16,

    /// Use a generated demo series instead of reading CSV files.
    #[arg(long)]
    pub demo: bool,

    /// Random seed for the demo series.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of days in the demo series.
    #[arg(
        long,
        default_value_t = 1095,
        value_parser = clap::value_parser!(u32).range(1..=MAX_DEMO_DAYS as i64)
    )]
    pub demo_days: u32,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for the text report.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Page to print.
    #[arg(short = 'p', long, value_enum, default_value_t = Page::Overview)]
    pub page: Page,

    /// Disable the terminal plot on pages that have one.
    #[arg(long)]
    pub no_plot: bool,

    #[command(flatten)]
    pub dash: DashArgs,
}
