//! `salesdash` library crate.
//!
//! The binary (`salesdash`) is a thin wrapper around this library so that:
//!
//! - aggregation and forecasting logic is testable without spawning processes
//! - the CLI report and the TUI share one page pipeline
//! - code stays easy to navigate as the project grows

pub mod analytics;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
