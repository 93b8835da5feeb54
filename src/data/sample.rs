//! Synthetic daily sales for running the dashboard without the CSV inputs.
//!
//! The series has the same shape the forecast assumes: slow linear growth,
//! a Nov/Dec peak with a January dip, busier weekends, and occasional
//! promotion days with a sales bump. Output is deterministic per `(seed, days)`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Bernoulli, Uniform};

use crate::analytics::{monthly_factor, weekly_factor};
use crate::domain::DailySalesRecord;
use crate::error::AppError;
use crate::io::ingest::{Dataset, LoadStats};

const BASE_SALES: f64 = 1000.0;
/// Added to the base every 30 days.
const GROWTH_PER_30_DAYS: f64 = 0.5;
const PROMO_PROBABILITY: f64 = 0.08;
const PROMO_MULTIPLIER: f64 = 1.5;
/// Half-width of the uniform multiplicative noise.
const NOISE: f64 = 0.1;
/// Upper bound on `--demo-days` (about a century).
pub const MAX_DEMO_DAYS: u32 = 36_500;

pub fn demo_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default()
}

/// Generate `days` consecutive days starting 2021-01-01.
pub fn generate_demo(seed: u64, days: usize) -> Result<Dataset, AppError> {
    if days == 0 || days > MAX_DEMO_DAYS as usize {
        return Err(AppError::new(
            2,
            format!("Demo day count must be between 1 and {MAX_DEMO_DAYS} (got {days})."),
        ));
    }

    let start = demo_start();
    let mut rng = StdRng::seed_from_u64(demo_seed(seed, start, days));
    let promo = Bernoulli::new(PROMO_PROBABILITY)
        .map_err(|e| AppError::new(4, format!("Promotion distribution error: {e}")))?;
    let noise = Uniform::new_inclusive(1.0 - NOISE, 1.0 + NOISE);
    let promo_items = Uniform::new_inclusive(1u64, 40u64);

    let mut daily = Vec::with_capacity(days);
    for i in 0..days {
        let date = start + Duration::days(i as i64);

        let growth = i as f64 / 30.0 * GROWTH_PER_30_DAYS;
        let has_promo = promo.sample(&mut rng);
        let promo_factor = if has_promo { PROMO_MULTIPLIER } else { 1.0 };

        let sales = ((BASE_SALES + growth)
            * monthly_factor(date)
            * weekly_factor(date)
            * promo_factor
            * noise.sample(&mut rng))
        .floor();

        daily.push(DailySalesRecord {
            date,
            total_sales: sales.max(0.0),
            promotion_count: if has_promo { promo_items.sample(&mut rng) } else { 0 },
            is_holiday: false,
        });
    }

    tracing::info!(seed, days, "generated demo dataset");

    Ok(Dataset {
        daily,
        stats: LoadStats {
            rows_read: days,
            rows_used: days,
            ..LoadStats::default()
        },
    })
}

fn demo_seed(seed: u64, start: NaiveDate, days: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    start.hash(&mut hasher);
    days.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    #[test]
    fn demo_is_deterministic_per_seed() {
        let a = generate_demo(7, 120).unwrap();
        let b = generate_demo(7, 120).unwrap();
        let c = generate_demo(8, 120).unwrap();
        assert_eq!(a.daily, b.daily);
        assert_ne!(a.daily, c.daily);
    }

    #[test]
    fn demo_days_are_contiguous_from_start() {
        let ds = generate_demo(1, 400).unwrap();
        assert_eq!(ds.daily.len(), 400);
        assert_eq!(ds.daily[0].date, demo_start());
        for w in ds.daily.windows(2) {
            assert_eq!(w[1].date - w[0].date, Duration::days(1));
        }
        assert!(ds.daily.iter().all(|r| r.total_sales >= 0.0));
        assert!(ds.daily.iter().all(|r| !r.is_holiday));
    }

    #[test]
    fn demo_weekends_outsell_weekdays_on_average() {
        let ds = generate_demo(3, 730).unwrap();
        let (mut we, mut wd) = (Vec::new(), Vec::new());
        for r in ds.daily.iter().filter(|r| !r.has_promotion()) {
            match r.date.weekday() {
                Weekday::Sat | Weekday::Sun => we.push(r.total_sales),
                _ => wd.push(r.total_sales),
            }
        }
        let avg = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
        assert!(avg(&we) > avg(&wd));
    }

    #[test]
    fn demo_follows_forecast_seasonal_factors() {
        let ds = generate_demo(4, 400).unwrap();
        for (i, r) in ds.daily.iter().enumerate().filter(|(_, r)| !r.has_promotion()) {
            let expected = (BASE_SALES + i as f64 / 30.0 * GROWTH_PER_30_DAYS)
                * monthly_factor(r.date)
                * weekly_factor(r.date);
            let low = (expected * (1.0 - NOISE)).floor();
            let high = expected * (1.0 + NOISE);
            assert!(r.total_sales >= low && r.total_sales <= high, "{}", r.date);
        }
    }

    #[test]
    fn day_count_outside_bounds_rejected() {
        assert_eq!(generate_demo(1, 0).unwrap_err().exit_code(), 2);
        let err = generate_demo(1, MAX_DEMO_DAYS as usize + 1).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(generate_demo(1, MAX_DEMO_DAYS as usize).is_ok());
    }
}
