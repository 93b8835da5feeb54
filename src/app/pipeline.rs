//! Shared data/view logic used by both the CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the page router:
//! source -> dataset -> (page, horizon) -> view
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::Duration;

use crate::analytics::{
    best_model, compute_insights, data_quality, distribution, generate_forecast, key_metrics,
    monthly_totals, promotion_impact, ranked_models, rolling_trend, seasonal_breakdown,
    summarize_forecast, DataQuality, Distribution, ForecastSummary, Insights, KeyMetrics,
    MonthlyTotal, PromotionImpact, SeasonalBreakdown, ROLLING_WINDOW,
};
use crate::domain::{DailySalesRecord, DataSource, ForecastPoint, ModelScore, Page};
use crate::error::AppError;
use crate::io::ingest::Dataset;

/// Days of history drawn behind the forecast.
pub const FORECAST_HISTORY_DAYS: i64 = 365;

#[derive(Debug, Clone)]
pub struct OverviewView {
    pub metrics: KeyMetrics,
    pub daily: Vec<(chrono::NaiveDate, f64)>,
    /// Centred rolling mean over `ROLLING_WINDOW` days.
    pub trend: Vec<(chrono::NaiveDate, f64)>,
    pub monthly: Vec<MonthlyTotal>,
    pub distribution: Distribution,
    pub quality: DataQuality,
}

#[derive(Debug, Clone)]
pub struct SeasonalView {
    pub breakdown: SeasonalBreakdown,
    pub promotion: PromotionImpact,
}

#[derive(Debug, Clone)]
pub struct ModelsView {
    pub rows: Vec<ModelScore>,
    pub best: ModelScore,
}

#[derive(Debug, Clone)]
pub struct ForecastView {
    pub horizon: usize,
    pub history: Vec<DailySalesRecord>,
    pub points: Vec<ForecastPoint>,
    pub summary: ForecastSummary,
}

/// One rendered-ready page, recomputed on every activation.
#[derive(Debug, Clone)]
pub enum PageView {
    Overview(OverviewView),
    Seasonal(SeasonalView),
    Models(ModelsView),
    Forecasts(ForecastView),
    Insights(Insights),
}

/// Load the daily table from the configured source.
pub fn load_source(source: &DataSource) -> Result<Dataset, AppError> {
    match source {
        DataSource::Directory(dir) => crate::io::ingest::load_dataset(dir),
        DataSource::Demo { seed, days } => crate::data::generate_demo(*seed, *days),
    }
}

/// Compute the view for `page`.
pub fn build_view(page: Page, dataset: &Dataset, horizon: usize) -> Result<PageView, AppError> {
    let daily = &dataset.daily;
    let view = match page {
        Page::Overview => PageView::Overview(OverviewView {
            metrics: key_metrics(daily)?,
            daily: daily.iter().map(|r| (r.date, r.total_sales)).collect(),
            trend: rolling_trend(daily, ROLLING_WINDOW),
            monthly: monthly_totals(daily),
            distribution: distribution(daily)?,
            quality: data_quality(daily, &dataset.stats),
        }),
        Page::Seasonal => PageView::Seasonal(SeasonalView {
            breakdown: seasonal_breakdown(daily),
            promotion: promotion_impact(daily),
        }),
        Page::Models => PageView::Models(ModelsView {
            rows: ranked_models(),
            best: best_model(),
        }),
        Page::Forecasts => PageView::Forecasts(build_forecast(daily, horizon)?),
        Page::Insights => PageView::Insights(compute_insights(daily)?),
    };
    tracing::debug!(page = page.display_name(), horizon, "built page view");
    Ok(view)
}

fn build_forecast(daily: &[DailySalesRecord], horizon: usize) -> Result<ForecastView, AppError> {
    let points = generate_forecast(daily, horizon)?;
    let summary = summarize_forecast(&points)
        .ok_or_else(|| AppError::new(4, "Forecast produced no points."))?;

    let history = match daily.last() {
        Some(last) => {
            let cutoff = last.date - Duration::days(FORECAST_HISTORY_DAYS);
            daily.iter().filter(|r| r.date >= cutoff).cloned().collect()
        }
        None => Vec::new(),
    };

    Ok(ForecastView {
        horizon,
        history,
        points,
        summary,
    })
}
