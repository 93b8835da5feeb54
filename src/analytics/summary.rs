//! Overview figures: headline metrics, monthly totals, distribution, data quality.

use chrono::{Datelike, NaiveDate};

use crate::analytics::AnalyticsError;
use crate::domain::DailySalesRecord;
use crate::io::ingest::LoadStats;

#[derive(Debug, Clone, PartialEq)]
pub struct KeyMetrics {
    pub total_sales: f64,
    pub average_daily_sales: f64,
    pub peak_sales: f64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// `describe()`-style statistics of daily sales.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1); `NaN` for a single observation.
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQuality {
    pub total_days: usize,
    pub rows_read: usize,
    pub rows_used: usize,
    pub skipped_rows: usize,
    pub blank_sales_rows: usize,
    pub unmatched_store_rows: usize,
    pub stores_loaded: usize,
    pub holiday_dates: usize,
    pub days_with_promotions: usize,
    pub days_with_holidays: usize,
    /// First few skipped rows as `file:line: message`.
    pub sample_errors: Vec<String>,
}

/// Sales total for one calendar month, labelled by its last day.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    pub month_end: NaiveDate,
    pub total_sales: f64,
}

pub fn key_metrics(daily: &[DailySalesRecord]) -> Result<KeyMetrics, AnalyticsError> {
    let (first, last) = match (daily.first(), daily.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return Err(AnalyticsError::EmptySeries),
    };
    let total: f64 = daily.iter().map(|r| r.total_sales).sum();
    let peak = daily
        .iter()
        .map(|r| r.total_sales)
        .fold(f64::NEG_INFINITY, f64::max);
    Ok(KeyMetrics {
        total_sales: total,
        average_daily_sales: total / daily.len() as f64,
        peak_sales: peak,
        first_date: first.date,
        last_date: last.date,
    })
}

/// Calendar-month totals for every month between the first and last record.
///
/// Months with no records are present with a zero total.
pub fn monthly_totals(daily: &[DailySalesRecord]) -> Vec<MonthlyTotal> {
    let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let (mut year, mut month) = (first.date.year(), first.date.month());
    let end = (last.date.year(), last.date.month());
    let mut idx = 0usize;

    loop {
        let mut total = 0.0;
        while idx < daily.len()
            && daily[idx].date.year() == year
            && daily[idx].date.month() == month
        {
            total += daily[idx].total_sales;
            idx += 1;
        }
        if let Some(month_end) = month_end(year, month) {
            out.push(MonthlyTotal {
                month_end,
                total_sales: total,
            });
        }
        if (year, month) == end {
            break;
        }
        (year, month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    }

    out
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1).and_then(|d| d.pred_opt())
}

pub fn distribution(daily: &[DailySalesRecord]) -> Result<Distribution, AnalyticsError> {
    if daily.is_empty() {
        return Err(AnalyticsError::EmptySeries);
    }
    let mut values: Vec<f64> = daily.iter().map(|r| r.total_sales).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n as f64 - 1.0)).sqrt()
    } else {
        f64::NAN
    };

    Ok(Distribution {
        count: n,
        mean,
        std,
        min: values[0],
        p25: quantile_sorted(&values, 0.25),
        p50: quantile_sorted(&values, 0.50),
        p75: quantile_sorted(&values, 0.75),
        max: values[n - 1],
    })
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() as f64 - 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Skipped rows listed individually in [`DataQuality::sample_errors`].
pub const SAMPLE_ERRORS: usize = 5;

pub fn data_quality(daily: &[DailySalesRecord], stats: &LoadStats) -> DataQuality {
    DataQuality {
        total_days: daily.len(),
        rows_read: stats.rows_read,
        rows_used: stats.rows_used,
        skipped_rows: stats.row_errors.len(),
        blank_sales_rows: stats.blank_sales_rows,
        unmatched_store_rows: stats.unmatched_store_rows,
        stores_loaded: stats.stores_loaded,
        holiday_dates: stats.holiday_dates,
        days_with_promotions: daily.iter().filter(|r| r.has_promotion()).count(),
        days_with_holidays: daily.iter().filter(|r| r.is_holiday).count(),
        sample_errors: stats
            .row_errors
            .iter()
            .take(SAMPLE_ERRORS)
            .map(|e| format!("{}:{}: {}", e.file, e.line, e.message))
            .collect(),
    }
}
