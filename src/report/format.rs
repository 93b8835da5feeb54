//! Plain-text rendering of each page.
//!
//! We keep formatting code in one place so:
//! - the analytics code stays clean and testable
//! - the CLI report and the TUI text panels read the same wording

use crate::analytics::{
    column_min, month_name, weekday_name, InsightTab, Insights, Metric, EXPECTED_IMPACT,
    MONTH_NAMES, WEEKDAYS,
};
use crate::app::pipeline::{ForecastView, ModelsView, OverviewView, PageView, SeasonalView};

/// Format a whole page as text.
pub fn format_page(view: &PageView) -> String {
    match view {
        PageView::Overview(v) => format_overview(v),
        PageView::Seasonal(v) => format_seasonal(v),
        PageView::Models(v) => format_models(v),
        PageView::Forecasts(v) => format_forecast(v),
        PageView::Insights(v) => format_insights(v),
    }
}

pub fn format_overview(view: &OverviewView) -> String {
    let m = &view.metrics;
    let d = &view.distribution;
    let mut out = String::new();

    out.push_str("=== Sales Overview ===\n");
    out.push_str(&format!("Total Sales:         {}\n", fmt_money(m.total_sales)));
    out.push_str(&format!("Average Daily Sales: {}\n", fmt_money(m.average_daily_sales)));
    out.push_str(&format!("Peak Sales Day:      {}\n", fmt_money(m.peak_sales)));
    out.push_str(&format!("Date Range:          {} to {}\n", m.first_date, m.last_date));

    out.push_str("\nMonthly Sales:\n");
    for t in &view.monthly {
        let month = t.month_end.format("%Y-%m");
        out.push_str(&format!("  {month}  {:>16}\n", fmt_money(t.total_sales)));
    }

    out.push_str("\nSales Distribution:\n");
    for (label, value) in distribution_rows(d) {
        out.push_str(&format!("  {label:<6} {value:>18}\n"));
    }

    out.push_str("\nData Quality:\n");
    for line in quality_lines(view) {
        out.push_str(&format!("  {line}\n"));
    }
    out
}

/// `(label, value)` rows of the distribution table.
pub fn distribution_rows(d: &crate::analytics::Distribution) -> Vec<(&'static str, String)> {
    vec![
        ("count", format!("{:.2}", d.count as f64)),
        ("mean", format!("{:.2}", d.mean)),
        ("std", fmt_opt_2(d.std)),
        ("min", format!("{:.2}", d.min)),
        ("25%", format!("{:.2}", d.p25)),
        ("50%", format!("{:.2}", d.p50)),
        ("75%", format!("{:.2}", d.p75)),
        ("max", format!("{:.2}", d.max)),
    ]
}

pub fn quality_lines(view: &OverviewView) -> Vec<String> {
    let q = &view.quality;
    let mut lines = vec![
        format!("Total Days: {}", q.total_days),
        format!("Rows Read: {} (used {})", q.rows_read, q.rows_used),
        format!("Skipped Rows: {}", q.skipped_rows),
        format!("Rows With Blank Sales: {}", q.blank_sales_rows),
        format!("Stores Loaded: {}", q.stores_loaded),
        format!("Rows With Unknown Store: {}", q.unmatched_store_rows),
        format!("Holiday Dates: {}", q.holiday_dates),
        format!("Days with Promotions: {}", q.days_with_promotions),
        format!("Days with Holidays: {}", q.days_with_holidays),
    ];
    for e in &q.sample_errors {
        lines.push(format!("  {e}"));
    }
    if q.skipped_rows > q.sample_errors.len() {
        lines.push(format!("  ... and {} more", q.skipped_rows - q.sample_errors.len()));
    }
    lines
}

pub fn format_seasonal(view: &SeasonalView) -> String {
    let b = &view.breakdown;
    let mut out = String::new();

    out.push_str("=== Seasonal Patterns ===\n");
    out.push_str("Average Sales by Day of Week:\n");
    for (day, value) in WEEKDAYS.iter().zip(b.by_weekday.iter()) {
        out.push_str(&format!("  {:<10} {:>14}\n", weekday_name(*day), fmt_opt_money(*value)));
    }
    out.push_str(&weekday_extremes(view).join("\n"));
    out.push('\n');

    out.push_str("\nAverage Sales by Month:\n");
    for (name, value) in MONTH_NAMES.iter().zip(b.by_month.iter()) {
        out.push_str(&format!("  {:<10} {:>14}\n", name, fmt_opt_money(*value)));
    }
    out.push_str(&month_extremes(view).join("\n"));
    out.push('\n');

    out.push_str("\nPromotion Impact:\n");
    for line in promotion_lines(view) {
        out.push_str(&format!("  {line}\n"));
    }

    out.push_str("\nAverage Sales by Day of Month:\n");
    for (dom, value) in &b.by_day_of_month {
        out.push_str(&format!("  {dom:>2} {:>14}\n", fmt_money(*value)));
    }
    out
}

pub fn weekday_extremes(view: &SeasonalView) -> Vec<String> {
    let b = &view.breakdown;
    let mut lines = Vec::new();
    if let Some(best) = b.best_weekday() {
        lines.push(format!("Best Day: {} ({})", weekday_name(best.key), fmt_money(best.mean)));
    }
    if let Some(worst) = b.worst_weekday() {
        lines.push(format!("Worst Day: {} ({})", weekday_name(worst.key), fmt_money(worst.mean)));
    }
    lines
}

pub fn month_extremes(view: &SeasonalView) -> Vec<String> {
    let b = &view.breakdown;
    let mut lines = Vec::new();
    if let Some(best) = b.best_month() {
        lines.push(format!("Best Month: {} ({})", month_name(best.key), fmt_money(best.mean)));
    }
    if let Some(worst) = b.worst_month() {
        lines.push(format!("Worst Month: {} ({})", month_name(worst.key), fmt_money(worst.mean)));
    }
    lines
}

pub fn promotion_lines(view: &SeasonalView) -> Vec<String> {
    let p = &view.promotion;
    match (p.lift_pct(), p.mean_with, p.mean_without) {
        (Some(lift), Some(with), Some(without)) => vec![
            format!("Promotion Lift: {lift:.1}%"),
            format!("Sales with Promotion: {}", fmt_money(with)),
            format!("Sales without Promotion: {}", fmt_money(without)),
        ],
        _ => vec![format!(
            "Promotion lift unavailable ({} promotion days, {} without).",
            p.days_with, p.days_without
        )],
    }
}

pub fn format_models(view: &ModelsView) -> String {
    let mut out = String::new();
    out.push_str("=== Model Performance Comparison ===\n");
    out.push_str(MODELS_NOTE);
    out.push_str("\n\n");

    out.push_str(
        format!("{:<16} {:>10} {:>10} {:>8}", "model", "MAE", "RMSE", "MAPE")
            .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<10} {:-<10} {:-<8}", "", "", "", "").trim_end());
    out.push('\n');

    for row in &view.rows {
        let mark = |metric: Metric| {
            if metric.value(row) == column_min(metric) { "*" } else { " " }
        };
        out.push_str(&format!(
            "{:<16} {:>9.0}{} {:>9.0}{} {:>7.2}{}\n",
            row.model_name,
            row.mae,
            mark(Metric::Mae),
            row.rmse,
            mark(Metric::Rmse),
            row.mape,
            mark(Metric::Mape),
        ));
    }
    out.push_str("(* = best in column)\n\n");
    out.push_str(&best_model_line(view));
    out.push('\n');
    out
}

pub const MODELS_NOTE: &str = "Note: these are static reference figures showing typical ranges for \
common forecasting models. They are not computed from the loaded data.";

pub fn best_model_line(view: &ModelsView) -> String {
    format!(
        "Best Model: {} with MAPE of {:.2}%",
        view.best.model_name, view.best.mape
    )
}

pub fn format_forecast(view: &ForecastView) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Sales Forecast ({} days) ===\n", view.horizon));
    for line in forecast_summary_lines(view) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');

    let header = format!(
        "{:<12} {:>14} {:>14} {:>14}",
        "date", "forecast", "lower_bound", "upper_bound"
    );
    out.push_str(header.trim_end());
    out.push('\n');
    out.push_str(format!("{:-<12} {:-<14} {:-<14} {:-<14}", "", "", "", "").trim_end());
    out.push('\n');
    for p in &view.points {
        out.push_str(&format!(
            "{:<12} {:>14} {:>14} {:>14}\n",
            p.date.format("%Y-%m-%d"),
            fmt_money(p.point_estimate),
            fmt_money(p.lower_bound),
            fmt_money(p.upper_bound),
        ));
    }
    out
}

pub fn forecast_summary_lines(view: &ForecastView) -> Vec<String> {
    let s = &view.summary;
    vec![
        format!("Average Forecast: {}", fmt_money(s.mean)),
        format!("Min Forecast:     {}", fmt_money(s.min)),
        format!("Max Forecast:     {}", fmt_money(s.max)),
        format!("Total Forecasted: {}", fmt_money(s.total)),
    ]
}

pub fn format_insights(ins: &Insights) -> String {
    let mut out = String::new();
    out.push_str("=== Business Insights & Recommendations ===\n\nKey Findings:\n");
    for line in key_findings(ins) {
        out.push_str(&format!("  {line}\n"));
    }
    for tab in InsightTab::ALL {
        out.push_str(&format!("\n{}:\n", tab.title()));
        for line in recommendation_lines(tab, ins) {
            out.push_str(&format!("  {line}\n"));
        }
    }
    out.push_str("\nExpected Business Impact:\n");
    for (label, range, caption) in EXPECTED_IMPACT {
        out.push_str(&format!("  {label}: {range} ({caption})\n"));
    }
    out
}

pub fn key_findings(ins: &Insights) -> Vec<String> {
    let mut lines = vec![
        "Seasonal Demand Patterns:".to_string(),
        format!(
            "- Peak sales month: {} ({} avg)",
            month_name(ins.best_month.key),
            fmt_money(ins.best_month.mean)
        ),
        format!(
            "- Lowest sales month: {} ({} avg)",
            month_name(ins.worst_month.key),
            fmt_money(ins.worst_month.mean)
        ),
        format!("- Seasonal variation: {:.1}%", ins.seasonal_variation_pct),
        "Weekly Patterns:".to_string(),
        format!(
            "- Best day: {} ({} avg)",
            weekday_name(ins.best_weekday.key),
            fmt_money(ins.best_weekday.mean)
        ),
        format!(
            "- Worst day: {} ({} avg)",
            weekday_name(ins.worst_weekday.key),
            fmt_money(ins.worst_weekday.mean)
        ),
    ];

    let p = &ins.promotion;
    if let (Some(lift), Some(with), Some(without)) = (p.lift_pct(), p.mean_with, p.mean_without) {
        lines.push("Promotion Impact:".to_string());
        lines.push(format!("- Sales lift during promotions: {lift:.1}%"));
        lines.push(format!("- Average with promotion: {}", fmt_money(with)));
        lines.push(format!("- Average without promotion: {}", fmt_money(without)));
    }

    lines.push("Trend Analysis:".to_string());
    lines.push(format!("- Overall trend: {}", ins.trend.direction.as_str()));
    lines.push(format!("- Year-over-year change: {:.1}%", ins.trend.change_pct));
    lines.push(format!("- Recent average: {}", fmt_money(ins.trend.recent_mean)));
    lines
}

pub fn recommendation_lines(tab: InsightTab, ins: &Insights) -> Vec<String> {
    let best_month = month_name(ins.best_month.key);
    let worst_month = month_name(ins.worst_month.key);
    match tab {
        InsightTab::Inventory => vec![
            "1. Dynamic Safety Stock".to_string(),
            "   - Use forecast confidence intervals to set safety stock levels".to_string(),
            "   - Higher uncertainty -> higher safety stock".to_string(),
            "   - Target: maintain 95% service level while minimizing excess".to_string(),
            "2. Seasonal Inventory Buildup".to_string(),
            format!("   - Increase inventory 2-3 weeks before peak months ({best_month} and Dec)"),
            format!("   - Reduce inventory before low-sales months ({worst_month})"),
            "   - Expected impact: 20-30% reduction in inventory costs".to_string(),
            "3. Category-Specific Strategies".to_string(),
            "   - High-volume categories: lower safety stock (fast turnover)".to_string(),
            "   - Low-volume categories: higher safety stock (slow turnover)".to_string(),
        ],
        InsightTab::Promotion => vec![
            "1. Optimal Promotion Windows".to_string(),
            format!(
                "   - Schedule promotions during historically low-sales periods ({worst_month})"
            ),
            "   - Avoid promotions during peak seasons (maximize revenue)".to_string(),
            format!(
                "   - Current promotion lift: {:.1}%",
                ins.promotion.lift_pct().unwrap_or(0.0)
            ),
            "2. Promotion Planning".to_string(),
            "   - Plan inventory buildup 1-2 weeks before promotions".to_string(),
            "   - Coordinate with suppliers for increased demand".to_string(),
            "   - Expected impact: 15-25% improvement in promotion ROI".to_string(),
        ],
        InsightTab::Staffing => vec![
            "1. Demand-Based Scheduling".to_string(),
            "   - Align staff schedules with forecasted demand".to_string(),
            format!(
                "   - Increase staffing on {} (highest sales day)",
                weekday_name(ins.best_weekday.key)
            ),
            format!(
                "   - Reduce staffing on {} (lowest sales day)",
                weekday_name(ins.worst_weekday.key)
            ),
            "2. Weekly Patterns".to_string(),
            "   - Schedule more staff on weekends (higher sales)".to_string(),
            "   - Expected impact: 10-15% reduction in labor costs".to_string(),
        ],
        InsightTab::SupplyChain => vec![
            "1. Procurement Planning".to_string(),
            "   - Use 30-90 day forecasts for procurement decisions".to_string(),
            "   - Coordinate with suppliers based on forecasts".to_string(),
            "   - Expected impact: 15-20% reduction in supply chain costs".to_string(),
            "2. Warehouse Management".to_string(),
            "   - Optimize warehouse space based on forecasts".to_string(),
            "   - Plan for seasonal storage needs".to_string(),
        ],
    }
}

/// `$1,234,567` (rounded to whole units).
pub fn fmt_money(v: f64) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    let rounded = v.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

fn fmt_opt_money(v: Option<f64>) -> String {
    v.map(fmt_money).unwrap_or_else(|| "-".to_string())
}

fn fmt_opt_2(v: f64) -> String {
    if v.is_finite() { format!("{v:.2}") } else { "-".to_string() }
}
