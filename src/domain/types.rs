//! Shared domain types.
//!
//! The daily table is produced once by the loader and then only read; forecast
//! points and model rows are cheap values rebuilt on every view activation.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;

/// Smallest forecast horizon offered by the horizon selector.
pub const HORIZON_MIN: usize = 30;
/// Largest forecast horizon offered by the horizon selector.
pub const HORIZON_MAX: usize = 90;
/// Step used by the TUI `+`/`-` keys.
pub const HORIZON_STEP: usize = 5;

/// One calendar day of aggregated sales.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySalesRecord {
    pub date: NaiveDate,
    /// Sum of `sales` over every store/family row for this date.
    pub total_sales: f64,
    /// Sum of `onpromotion` over every row for this date.
    pub promotion_count: u64,
    pub is_holiday: bool,
}

impl DailySalesRecord {
    pub fn has_promotion(&self) -> bool {
        self.promotion_count > 0
    }
}

/// A single forecasted day with a fixed ±15% band.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// A row of the model comparison table.
///
/// These are literal reference values, not the output of any training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelScore {
    pub model_name: &'static str,
    pub mae: f64,
    pub rmse: f64,
    pub mape: f64,
}

/// The five dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Page {
    Overview,
    Seasonal,
    Models,
    Forecasts,
    Insights,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::Seasonal,
        Page::Models,
        Page::Forecasts,
        Page::Insights,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Seasonal => "Seasonal Analysis",
            Page::Models => "Model Performance",
            Page::Forecasts => "Forecasts",
            Page::Insights => "Business Insights",
        }
    }

    pub fn index(self) -> usize {
        Page::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    /// Page for a 1-based number key.
    pub fn from_number(n: usize) -> Option<Page> {
        n.checked_sub(1).and_then(|i| Page::ALL.get(i).copied())
    }

    pub fn next(self) -> Page {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    pub fn prev(self) -> Page {
        Page::ALL[(self.index() + Page::ALL.len() - 1) % Page::ALL.len()]
    }
}

/// Where the daily table comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// Directory holding `train.csv`, `stores.csv` and `holidays_events.csv`.
    Directory(PathBuf),
    /// Seeded synthetic series.
    Demo { seed: u64, days: usize },
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus `.env`/environment defaults).
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub horizon: usize,
    pub page: Page,
    pub plot_width: usize,
    pub plot_height: usize,
}

/// Clamp a requested horizon into the selector's range.
pub fn clamp_horizon(days: usize) -> usize {
    days.clamp(HORIZON_MIN, HORIZON_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_cycles_in_both_directions() {
        assert_eq!(Page::Overview.next(), Page::Seasonal);
        assert_eq!(Page::Insights.next(), Page::Overview);
        assert_eq!(Page::Overview.prev(), Page::Insights);
        assert_eq!(Page::Forecasts.prev(), Page::Models);
    }

    #[test]
    fn page_number_keys() {
        assert_eq!(Page::from_number(1), Some(Page::Overview));
        assert_eq!(Page::from_number(5), Some(Page::Insights));
        assert_eq!(Page::from_number(0), None);
        assert_eq!(Page::from_number(6), None);
    }

    #[test]
    fn horizon_clamped_to_selector_range() {
        assert_eq!(clamp_horizon(0), HORIZON_MIN);
        assert_eq!(clamp_horizon(45), 45);
        assert_eq!(clamp_horizon(400), HORIZON_MAX);
    }
}
