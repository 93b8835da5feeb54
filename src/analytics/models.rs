//! Model comparison reference table.
//!
//! The figures are fixed reference values shown for comparison; no model is
//! trained or evaluated here.

use crate::domain::ModelScore;

pub const MODEL_SCORES: [ModelScore; 6] = [
    ModelScore { model_name: "Naive Forecast", mae: 45000.0, rmse: 55000.0, mape: 12.5 },
    ModelScore { model_name: "Moving Average", mae: 38000.0, rmse: 48000.0, mape: 10.2 },
    ModelScore { model_name: "ARIMA", mae: 32000.0, rmse: 42000.0, mape: 8.5 },
    ModelScore { model_name: "SARIMA", mae: 28000.0, rmse: 36000.0, mape: 7.2 },
    ModelScore { model_name: "Prophet", mae: 25000.0, rmse: 33000.0, mape: 6.8 },
    ModelScore { model_name: "Random Forest", mae: 30000.0, rmse: 40000.0, mape: 8.0 },
];

/// Metric columns of the comparison table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Mae,
    Rmse,
    Mape,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Mae, Metric::Rmse, Metric::Mape];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Mae => "MAE",
            Metric::Rmse => "RMSE",
            Metric::Mape => "MAPE",
        }
    }

    pub fn value(self, score: &ModelScore) -> f64 {
        match self {
            Metric::Mae => score.mae,
            Metric::Rmse => score.rmse,
            Metric::Mape => score.mape,
        }
    }
}

/// Reference rows sorted ascending by MAE.
pub fn ranked_models() -> Vec<ModelScore> {
    let mut rows = MODEL_SCORES.to_vec();
    rows.sort_by(|a, b| a.mae.partial_cmp(&b.mae).unwrap_or(std::cmp::Ordering::Equal));
    rows
}

/// The top row of the MAE ranking.
pub fn best_model() -> ModelScore {
    ranked_models()[0]
}

/// Smallest value of a metric across the table (for highlighting).
pub fn column_min(metric: Metric) -> f64 {
    MODEL_SCORES
        .iter()
        .map(|s| metric.value(s))
        .fold(f64::INFINITY, f64::min)
}
