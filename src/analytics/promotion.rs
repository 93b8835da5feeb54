//! Promotion lift: mean sales on promotion days vs. days without.

use crate::analytics::mean;
use crate::domain::DailySalesRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct PromotionImpact {
    pub mean_with: Option<f64>,
    pub mean_without: Option<f64>,
    pub days_with: usize,
    pub days_without: usize,
}

impl PromotionImpact {
    /// Lift in percent; `None` unless both groups exist and the baseline is positive.
    pub fn lift_pct(&self) -> Option<f64> {
        lift_pct(self.mean_with?, self.mean_without?)
    }
}

/// `(with − without) / without × 100`, undefined for a non-positive baseline.
pub fn lift_pct(mean_with: f64, mean_without: f64) -> Option<f64> {
    if mean_without > 0.0 {
        Some((mean_with - mean_without) / mean_without * 100.0)
    } else {
        None
    }
}

pub fn promotion_impact(daily: &[DailySalesRecord]) -> PromotionImpact {
    let (with, without): (Vec<&DailySalesRecord>, Vec<&DailySalesRecord>) =
        daily.iter().partition(|r| r.has_promotion());
    let with: Vec<f64> = with.iter().map(|r| r.total_sales).collect();
    let without: Vec<f64> = without.iter().map(|r| r.total_sales).collect();

    PromotionImpact {
        mean_with: mean(&with),
        mean_without: mean(&without),
        days_with: with.len(),
        days_without: without.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(d: u32, sales: f64, promo: u64) -> DailySalesRecord {
        DailySalesRecord {
            date: NaiveDate::from_ymd_opt(2024, 4, d).unwrap(),
            total_sales: sales,
            promotion_count: promo,
            is_holiday: false,
        }
    }

    #[test]
    fn lift_of_120_over_100_is_20_percent() {
        assert!((lift_pct(120.0, 100.0).unwrap() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn impact_groups_by_promotion_count() {
        let daily = vec![rec(1, 110.0, 3), rec(2, 130.0, 1), rec(3, 90.0, 0), rec(4, 110.0, 0)];
        let p = promotion_impact(&daily);
        assert_eq!(p.days_with, 2);
        assert_eq!(p.days_without, 2);
        assert_eq!(p.mean_with, Some(120.0));
        assert_eq!(p.mean_without, Some(100.0));
        assert!((p.lift_pct().unwrap() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn lift_undefined_without_both_groups() {
        let only_promo = vec![rec(1, 10.0, 1)];
        assert!(promotion_impact(&only_promo).lift_pct().is_none());

        let zero_baseline = vec![rec(1, 10.0, 1), rec(2, 0.0, 0)];
        assert!(promotion_impact(&zero_baseline).lift_pct().is_none());
    }
}
