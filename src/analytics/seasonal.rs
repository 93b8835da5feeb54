//! Calendar breakdowns: weekday, month, and day-of-month averages.

use chrono::{Datelike, Weekday};

use crate::analytics::mean;
use crate::domain::DailySalesRecord;

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Short month label for a 1-based month number.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// Mean daily sales grouped by calendar position.
///
/// `None` entries mean the dataset has no day in that bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalBreakdown {
    /// Monday first.
    pub by_weekday: [Option<f64>; 7],
    /// January first.
    pub by_month: [Option<f64>; 12],
    /// `(day_of_month, mean)` for the days that occur, ascending.
    pub by_day_of_month: Vec<(u32, f64)>,
}

/// An extreme (best or worst) bucket and its mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extreme<K> {
    pub key: K,
    pub mean: f64,
}

impl SeasonalBreakdown {
    pub fn best_weekday(&self) -> Option<Extreme<Weekday>> {
        extreme(&self.by_weekday, |a, b| a > b).map(|(i, mean)| Extreme { key: WEEKDAYS[i], mean })
    }

    pub fn worst_weekday(&self) -> Option<Extreme<Weekday>> {
        extreme(&self.by_weekday, |a, b| a < b).map(|(i, mean)| Extreme { key: WEEKDAYS[i], mean })
    }

    /// Best month as a 1-based month number.
    pub fn best_month(&self) -> Option<Extreme<u32>> {
        extreme(&self.by_month, |a, b| a > b).map(|(i, mean)| Extreme { key: i as u32 + 1, mean })
    }

    pub fn worst_month(&self) -> Option<Extreme<u32>> {
        extreme(&self.by_month, |a, b| a < b).map(|(i, mean)| Extreme { key: i as u32 + 1, mean })
    }

    /// Spread of the monthly means relative to their average, in percent.
    pub fn seasonal_variation_pct(&self) -> Option<f64> {
        let present: Vec<f64> = self.by_month.iter().flatten().copied().collect();
        let avg = mean(&present)?;
        if avg <= 0.0 {
            return None;
        }
        let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = present.iter().copied().fold(f64::INFINITY, f64::min);
        Some((max - min) / avg * 100.0)
    }
}

/// First index whose value beats every other under `better`; ties keep the earliest.
fn extreme(values: &[Option<f64>], better: impl Fn(f64, f64) -> bool) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().enumerate() {
        let Some(v) = *v else { continue };
        match best {
            Some((_, b)) if !better(v, b) => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

pub fn seasonal_breakdown(daily: &[DailySalesRecord]) -> SeasonalBreakdown {
    let mut wd: [(f64, usize); 7] = [(0.0, 0); 7];
    let mut mo: [(f64, usize); 12] = [(0.0, 0); 12];
    let mut dom: [(f64, usize); 31] = [(0.0, 0); 31];

    for r in daily {
        let w = r.date.weekday().num_days_from_monday() as usize;
        wd[w].0 += r.total_sales;
        wd[w].1 += 1;

        let m = r.date.month0() as usize;
        mo[m].0 += r.total_sales;
        mo[m].1 += 1;

        let d = r.date.day0() as usize;
        dom[d].0 += r.total_sales;
        dom[d].1 += 1;
    }

    let avg = |(sum, n): (f64, usize)| if n > 0 { Some(sum / n as f64) } else { None };

    SeasonalBreakdown {
        by_weekday: wd.map(avg),
        by_month: mo.map(avg),
        by_day_of_month: dom
            .iter()
            .enumerate()
            .filter_map(|(i, &acc)| avg(acc).map(|m| (i as u32 + 1, m)))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(y: i32, m: u32, d: u32, sales: f64) -> DailySalesRecord {
        DailySalesRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            total_sales: sales,
            promotion_count: 0,
            is_holiday: false,
        }
    }

    #[test]
    fn weekday_means_reindexed_monday_first() {
        // 2024-01-01 is a Monday.
        let daily = vec![
            rec(2024, 1, 1, 10.0),
            rec(2024, 1, 8, 30.0),
            rec(2024, 1, 6, 50.0),
            rec(2024, 1, 7, 70.0),
        ];
        let s = seasonal_breakdown(&daily);
        assert_eq!(s.by_weekday[0], Some(20.0));
        assert_eq!(s.by_weekday[1], None);
        assert_eq!(s.by_weekday[5], Some(50.0));
        assert_eq!(s.by_weekday[6], Some(70.0));

        let best = s.best_weekday().unwrap();
        assert_eq!(best.key, Weekday::Sun);
        assert_eq!(best.mean, 70.0);
        assert_eq!(s.worst_weekday().unwrap().key, Weekday::Mon);
    }

    #[test]
    fn month_means_skip_absent_months() {
        let daily = vec![
            rec(2023, 1, 10, 80.0),
            rec(2024, 1, 10, 120.0),
            rec(2023, 12, 24, 300.0),
        ];
        let s = seasonal_breakdown(&daily);
        assert_eq!(s.by_month[0], Some(100.0));
        assert_eq!(s.by_month[11], Some(300.0));
        assert!(s.by_month[1..11].iter().all(Option::is_none));

        assert_eq!(s.best_month().unwrap().key, 12);
        assert_eq!(s.worst_month().unwrap().key, 1);
        assert_eq!(month_name(12), "Dec");

        // (300 - 100) / 200 * 100
        assert!((s.seasonal_variation_pct().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn day_of_month_only_present_days() {
        let daily = vec![rec(2024, 1, 31, 5.0), rec(2024, 3, 31, 15.0), rec(2024, 2, 1, 1.0)];
        let s = seasonal_breakdown(&daily);
        assert_eq!(s.by_day_of_month, vec![(1, 1.0), (31, 10.0)]);
    }

    #[test]
    fn empty_series_has_no_extremes() {
        let s = seasonal_breakdown(&[]);
        assert!(s.best_weekday().is_none());
        assert!(s.best_month().is_none());
        assert!(s.seasonal_variation_pct().is_none());
    }
}
