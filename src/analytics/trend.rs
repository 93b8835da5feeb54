//! Trend views of the series: a rolling daily trend line, and the first year
//! compared with the most recent year.

use chrono::NaiveDate;

use crate::analytics::{mean, AnalyticsError};
use crate::domain::DailySalesRecord;

/// Window (days) compared at each end of the series.
pub const YEAR_WINDOW: usize = 365;
/// Width (days) of the rolling trend drawn over daily sales.
pub const ROLLING_WINDOW: usize = 30;

/// Centred rolling mean of daily sales.
///
/// Day `i` averages positions `i - window/2 .. i + window/2` (end exclusive),
/// clipped to the series, so the first and last days use a shorter window.
pub fn rolling_trend(daily: &[DailySalesRecord], window: usize) -> Vec<(NaiveDate, f64)> {
    let half = (window / 2).max(1);
    let sales: Vec<f64> = daily.iter().map(|r| r.total_sales).collect();
    daily
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(sales.len());
            (r.date, mean(&sales[lo..hi]).unwrap_or(r.total_sales))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSummary {
    pub recent_mean: f64,
    pub earlier_mean: f64,
    pub direction: TrendDirection,
    /// Absolute relative change in percent (0 when the earlier mean is not positive).
    pub change_pct: f64,
}

pub fn long_range_trend(daily: &[DailySalesRecord]) -> Result<TrendSummary, AnalyticsError> {
    let sales: Vec<f64> = daily.iter().map(|r| r.total_sales).collect();
    let window = YEAR_WINDOW.min(sales.len());
    let recent = mean(&sales[sales.len() - window..]).ok_or(AnalyticsError::EmptySeries)?;
    let earlier = mean(&sales[..window]).ok_or(AnalyticsError::EmptySeries)?;

    let direction = if recent > earlier {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };
    let change_pct = if earlier > 0.0 {
        ((recent - earlier) / earlier * 100.0).abs()
    } else {
        0.0
    };

    Ok(TrendSummary {
        recent_mean: recent,
        earlier_mean: earlier,
        direction,
        change_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn series(values: &[f64]) -> Vec<DailySalesRecord> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| DailySalesRecord {
                date: start + Duration::days(i as i64),
                total_sales: v,
                promotion_count: 0,
                is_holiday: false,
            })
            .collect()
    }

    #[test]
    fn compares_first_and_last_year() {
        let mut values = vec![100.0; 365];
        values.extend(vec![125.0; 365]);
        let t = long_range_trend(&series(&values)).unwrap();
        assert_eq!(t.direction, TrendDirection::Increasing);
        assert!((t.change_pct - 25.0).abs() < 1e-9);
        assert!((t.recent_mean - 125.0).abs() < 1e-9);
    }

    #[test]
    fn decline_reports_absolute_change() {
        let mut values = vec![200.0; 365];
        values.extend(vec![150.0; 365]);
        let t = long_range_trend(&series(&values)).unwrap();
        assert_eq!(t.direction, TrendDirection::Decreasing);
        assert!((t.change_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn rolling_trend_uses_clipped_centred_window() {
        let trend = rolling_trend(&series(&[1.0, 2.0, 3.0, 4.0, 5.0]), 4);
        let values: Vec<f64> = trend.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![1.5, 2.0, 2.5, 3.5, 4.0]);
        assert_eq!(trend[0].0, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    }

    #[test]
    fn rolling_trend_of_flat_series_is_flat() {
        let trend = rolling_trend(&series(&[80.0; 90]), ROLLING_WINDOW);
        assert_eq!(trend.len(), 90);
        assert!(trend.iter().all(|(_, v)| (v - 80.0).abs() < 1e-9));
        assert!(rolling_trend(&[], ROLLING_WINDOW).is_empty());
    }

    #[test]
    fn empty_is_an_error() {
        assert_eq!(long_range_trend(&[]), Err(AnalyticsError::EmptySeries));
    }
}
