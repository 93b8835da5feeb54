//! Business-insight findings derived from the other aggregations.
//!
//! The narrative text lives in `report`; this module only gathers the numbers
//! the recommendations quote.

use chrono::Weekday;

use crate::analytics::{
    long_range_trend, promotion_impact, seasonal_breakdown, AnalyticsError, Extreme,
    PromotionImpact, TrendSummary,
};
use crate::domain::DailySalesRecord;

/// Recommendation tabs on the insights page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightTab {
    Inventory,
    Promotion,
    Staffing,
    SupplyChain,
}

impl InsightTab {
    pub const ALL: [InsightTab; 4] = [
        InsightTab::Inventory,
        InsightTab::Promotion,
        InsightTab::Staffing,
        InsightTab::SupplyChain,
    ];

    pub fn title(self) -> &'static str {
        match self {
            InsightTab::Inventory => "Inventory Planning",
            InsightTab::Promotion => "Promotion Timing",
            InsightTab::Staffing => "Staffing",
            InsightTab::SupplyChain => "Supply Chain",
        }
    }

    pub fn next(self) -> InsightTab {
        let idx = InsightTab::ALL.iter().position(|t| *t == self).unwrap_or(0);
        InsightTab::ALL[(idx + 1) % InsightTab::ALL.len()]
    }
}

/// Fixed "expected impact" figures: (label, range, caption).
pub const EXPECTED_IMPACT: [(&str, &str, &str); 3] = [
    ("Inventory Cost Reduction", "20-30%", "Potential savings"),
    ("Promotion ROI Improvement", "15-25%", "Better timing"),
    ("Labor Cost Reduction", "10-15%", "Optimized staffing"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub best_month: Extreme<u32>,
    pub worst_month: Extreme<u32>,
    pub seasonal_variation_pct: f64,
    pub best_weekday: Extreme<Weekday>,
    pub worst_weekday: Extreme<Weekday>,
    pub promotion: PromotionImpact,
    pub trend: TrendSummary,
}

pub fn compute_insights(daily: &[DailySalesRecord]) -> Result<Insights, AnalyticsError> {
    let seasonal = seasonal_breakdown(daily);
    let missing = || AnalyticsError::EmptySeries;

    Ok(Insights {
        best_month: seasonal.best_month().ok_or_else(missing)?,
        worst_month: seasonal.worst_month().ok_or_else(missing)?,
        seasonal_variation_pct: seasonal.seasonal_variation_pct().unwrap_or(0.0),
        best_weekday: seasonal.best_weekday().ok_or_else(missing)?,
        worst_weekday: seasonal.worst_weekday().ok_or_else(missing)?,
        promotion: promotion_impact(daily),
        trend: long_range_trend(daily)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::TrendDirection;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn insights_from_two_years() {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let daily: Vec<DailySalesRecord> = (0..730)
            .map(|i| {
                let date = start + Duration::days(i);
                let sales = if i < 365 { 100.0 } else { 150.0 };
                DailySalesRecord {
                    date,
                    total_sales: sales,
                    promotion_count: u64::from(i % 10 == 0),
                    is_holiday: false,
                }
            })
            .collect();

        let ins = compute_insights(&daily).unwrap();
        assert_eq!(ins.trend.direction, TrendDirection::Increasing);
        assert!((ins.trend.change_pct - 50.0).abs() < 1e-9);
        assert!(ins.promotion.days_with > 0);
        assert!(ins.best_month.mean >= ins.worst_month.mean);
    }

    #[test]
    fn empty_series_is_an_error() {
        assert_eq!(compute_insights(&[]), Err(AnalyticsError::EmptySeries));
    }

    #[test]
    fn tabs_cycle() {
        assert_eq!(InsightTab::Inventory.next(), InsightTab::Promotion);
        assert_eq!(InsightTab::SupplyChain.next(), InsightTab::Inventory);
    }
}
