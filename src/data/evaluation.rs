//! Placeholder model-evaluation output.
//!
//! No model is trained or invoked anywhere in this application. The figures
//! and the "predicted" series below are fixed stand-ins shown on the
//! dashboard so the layout is complete; they are not computed from data.

use chrono::NaiveDateTime;

use super::model::{Channel, HourlyRecord};

/// Fixed scale applied to active power to draw the placeholder prediction.
pub const PLACEHOLDER_SCALE: f64 = 1.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

pub const PLACEHOLDER_METRICS: PlaceholderMetrics = PlaceholderMetrics {
    rmse: 0.245,
    mae: 0.180,
    r2: 0.92,
};

/// One point of the actual-vs-predicted overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedPoint {
    pub datetime: NaiveDateTime,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
}

/// Derive the placeholder prediction for a filtered copy of the table.
pub fn naive_prediction(records: &[HourlyRecord]) -> Vec<PredictedPoint> {
    records
        .iter()
        .map(|r| {
            let actual = r.value(Channel::GlobalActivePower);
            PredictedPoint {
                datetime: r.datetime,
                actual,
                predicted: actual.map(|v| v * PLACEHOLDER_SCALE),
            }
        })
        .collect()
}
