//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the aggregated daily table (`DailySalesRecord`)
//! - forecast output (`ForecastPoint`) and the static model table (`ModelScore`)
//! - navigation and run configuration (`Page`, `DashboardConfig`)

pub mod types;

pub use types::*;
