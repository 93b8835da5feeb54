//! Seasonal trend-extrapolation forecast.
//!
//! The forecast blends three fixed ingredients:
//!
//! - the mean of the trailing 30 observed days
//! - a trend ratio (last-30 mean vs first-30 mean), ramped linearly over the horizon
//! - calendar multipliers for weekday/weekend and Nov–Dec/January
//!
//! Nothing is fitted; the same series and horizon always give the same points.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::analytics::{mean, AnalyticsError};
use crate::domain::{DailySalesRecord, ForecastPoint};

/// Window (days) for the recent/earlier means.
pub const TREND_WINDOW: usize = 30;
/// Relative half-width of the forecast band.
pub const BAND: f64 = 0.15;

pub const WEEKEND_FACTOR: f64 = 1.3;
pub const WEEKDAY_FACTOR: f64 = 0.9;
pub const PEAK_MONTH_FACTOR: f64 = 1.4;
pub const JANUARY_FACTOR: f64 = 0.8;

/// Summary figures shown above the forecast table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
}

/// Multiplier for the day of week: weekends sell more.
pub fn weekly_factor(date: NaiveDate) -> f64 {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => WEEKEND_FACTOR,
        _ => WEEKDAY_FACTOR,
    }
}

/// Multiplier for the calendar month: holiday peak in Nov/Dec, dip in January.
pub fn monthly_factor(date: NaiveDate) -> f64 {
    match date.month() {
        11 | 12 => PEAK_MONTH_FACTOR,
        1 => JANUARY_FACTOR,
        _ => 1.0,
    }
}

/// Relative change between the trailing and leading windows of the series.
///
/// Returns `0.0` when the leading mean is not positive.
pub fn trend_factor(sales: &[f64]) -> Result<f64, AnalyticsError> {
    let recent = recent_mean(sales)?;
    let window = TREND_WINDOW.min(sales.len());
    let earlier = mean(&sales[..window]).ok_or(AnalyticsError::EmptySeries)?;
    if earlier > 0.0 {
        Ok((recent - earlier) / earlier)
    } else {
        Ok(0.0)
    }
}

fn recent_mean(sales: &[f64]) -> Result<f64, AnalyticsError> {
    let window = TREND_WINDOW.min(sales.len());
    mean(&sales[sales.len() - window..]).ok_or(AnalyticsError::EmptySeries)
}

/// Generate one forecast point per day for `horizon` days after the last record.
pub fn generate_forecast(
    history: &[DailySalesRecord],
    horizon: usize,
) -> Result<Vec<ForecastPoint>, AnalyticsError> {
    let last = history.last().ok_or(AnalyticsError::EmptySeries)?;
    if horizon == 0 {
        return Err(AnalyticsError::InvalidHorizon(horizon));
    }

    let sales: Vec<f64> = history.iter().map(|r| r.total_sales).collect();
    let recent = recent_mean(&sales)?;
    let trend = trend_factor(&sales)?;

    let mut out = Vec::with_capacity(horizon);
    for i in 0..horizon {
        let date = last.date + Duration::days(i as i64 + 1);
        let base = recent * (1.0 + trend * (i as f64 / horizon as f64));
        let point = base * weekly_factor(date) * monthly_factor(date);
        out.push(ForecastPoint {
            date,
            point_estimate: point,
            lower_bound: point * (1.0 - BAND),
            upper_bound: point * (1.0 + BAND),
        });
    }

    tracing::debug!(horizon, recent, trend, "generated forecast");
    Ok(out)
}

/// Mean/min/max/total of the point estimates.
pub fn summarize_forecast(points: &[ForecastPoint]) -> Option<ForecastSummary> {
    if points.is_empty() {
        return None;
    }
    let values: Vec<f64> = points.iter().map(|p| p.point_estimate).collect();
    let total: f64 = values.iter().sum();
    Some(ForecastSummary {
        mean: total / values.len() as f64,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(start: NaiveDate, values: &[f64]) -> Vec<DailySalesRecord> {
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

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn factors_depend_only_on_calendar() {
        // 2023-06-03 is a Saturday, 2023-06-05 a Monday.
        assert_eq!(weekly_factor(day(2023, 6, 3)), 1.3);
        assert_eq!(weekly_factor(day(2023, 6, 4)), 1.3);
        assert_eq!(weekly_factor(day(2023, 6, 5)), 0.9);

        assert_eq!(monthly_factor(day(2023, 11, 15)), 1.4);
        assert_eq!(monthly_factor(day(2023, 12, 1)), 1.4);
        assert_eq!(monthly_factor(day(2024, 1, 31)), 0.8);
        assert_eq!(monthly_factor(day(2024, 7, 4)), 1.0);
    }

    #[test]
    fn flat_series_has_zero_trend_and_seasonal_points() {
        // Last record Friday 2023-06-02; forecast starts Saturday.
        let hist = series(day(2023, 5, 1), &[100.0; 33]);
        assert_eq!(hist.last().unwrap().date, day(2023, 6, 2));

        let fc = generate_forecast(&hist, 30).unwrap();
        assert_eq!(fc.len(), 30);
        assert_eq!(fc[0].date, day(2023, 6, 3));
        assert!((fc[0].point_estimate - 130.0).abs() < 1e-9);
        assert!((fc[2].point_estimate - 90.0).abs() < 1e-9);

        for w in fc.windows(2) {
            assert_eq!(w[1].date - w[0].date, Duration::days(1));
        }
    }

    #[test]
    fn trend_ramps_linearly_over_horizon() {
        // First 30 days at 100, last 30 at 200 => trend = 1.0.
        let mut values = vec![100.0; 30];
        values.extend(vec![200.0; 30]);
        let hist = series(day(2023, 3, 1), &values);
        assert!((trend_factor(&values).unwrap() - 1.0).abs() < 1e-12);

        let fc = generate_forecast(&hist, 40).unwrap();
        // Day 10 of 40: base = 200 * (1 + 1.0 * 10/40) = 250.
        let p = &fc[10];
        let expected = 250.0 * weekly_factor(p.date) * monthly_factor(p.date);
        assert!((p.point_estimate - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_leading_mean_gives_zero_trend() {
        let mut values = vec![0.0; 30];
        values.extend(vec![50.0; 10]);
        assert_eq!(trend_factor(&values).unwrap(), 0.0);
    }

    #[test]
    fn short_series_uses_whole_series_for_both_windows() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(trend_factor(&values).unwrap(), 0.0);
        let hist = series(day(2024, 5, 6), &values);
        let fc = generate_forecast(&hist, 1).unwrap();
        // 2024-05-09 is a Thursday.
        assert!((fc[0].point_estimate - 20.0 * 0.9).abs() < 1e-9);
    }

    #[test]
    fn bounds_bracket_every_point() {
        let values: Vec<f64> = (0..120).map(|i| 500.0 + (i as f64 * 7.3) % 90.0).collect();
        let hist = series(day(2022, 10, 1), &values);
        let fc = generate_forecast(&hist, 90).unwrap();
        for p in &fc {
            assert!(p.lower_bound <= p.point_estimate);
            assert!(p.point_estimate <= p.upper_bound);
            assert!((p.lower_bound - 0.85 * p.point_estimate).abs() < 1e-9);
            assert!((p.upper_bound - 1.15 * p.point_estimate).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let hist = series(day(2024, 1, 1), &[1.0, 2.0]);
        assert_eq!(generate_forecast(&hist, 0), Err(AnalyticsError::InvalidHorizon(0)));
    }

    #[test]
    fn empty_history_is_rejected() {
        assert_eq!(generate_forecast(&[], 30), Err(AnalyticsError::EmptySeries));
    }

    #[test]
    fn summary_over_points() {
        let hist = series(day(2023, 5, 1), &[100.0; 33]);
        let fc = generate_forecast(&hist, 7).unwrap();
        let s = summarize_forecast(&fc).unwrap();
        // Sat, Sun at 130 then five weekdays at 90.
        assert!((s.total - (2.0 * 130.0 + 5.0 * 90.0)).abs() < 1e-9);
        assert!((s.min - 90.0).abs() < 1e-9);
        assert!((s.max - 130.0).abs() < 1e-9);
        assert!((s.mean - s.total / 7.0).abs() < 1e-9);
        assert!(summarize_forecast(&[]).is_none());
    }
}
