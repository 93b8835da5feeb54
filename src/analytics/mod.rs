//! Aggregations over the daily table.
//!
//! Every function here is pure: it takes the (read-only) daily records and
//! returns a fresh value. Views call them on every activation.

use thiserror::Error;

pub mod forecast;
pub mod insights;
pub mod models;
pub mod promotion;
pub mod seasonal;
pub mod summary;
pub mod trend;

pub use forecast::*;
pub use insights::*;
pub use models::*;
pub use promotion::*;
pub use seasonal::*;
pub use summary::*;
pub use trend::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Cannot compute from an empty sales series")]
    EmptySeries,

    #[error("Forecast horizon must be at least 1 day (got {0})")]
    InvalidHorizon(usize),
}

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
