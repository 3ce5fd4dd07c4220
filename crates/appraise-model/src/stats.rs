use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Median, Statistics};

/// Median of a sample, `None` when the sample is empty.
///
/// Even-sized samples take the midpoint of the two central values.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(Data::new(values.to_vec()).median())
}

/// Coefficient of determination of `y_pred` against `y_true`.
///
/// A constant `y_true` scores 1.0 for a perfect prediction and 0.0
/// otherwise, so the result is always finite.
///
/// # Arguments
///
/// * `y_true` - Observed target values.
/// * `y_pred` - Predictions, same length as `y_true`.
///
/// # Returns
///
/// `1 - SS_res / SS_tot`, which may be negative for predictions worse than
/// the mean.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> f64 {
    assert_eq!(
        y_true.len(),
        y_pred.len(),
        "r2_score requires equally long inputs"
    );
    assert!(!y_true.is_empty(), "r2_score requires at least one sample");

    let mean = y_true.iter().mean();
    let ss_tot: f64 = y_true.iter().map(|y| (y - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

pub fn root_mean_squared_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .mean()
        .sqrt()
}

pub fn mean_absolute_error(y_true: &[f64], y_pred: &[f64]) -> f64 {
    y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).mean()
}

/// Goodness-of-fit summary on a held-out set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
    pub n_samples: usize,
}

impl EvaluationReport {
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Self {
        EvaluationReport {
            r2: r2_score(y_true, y_pred),
            rmse: root_mean_squared_error(y_true, y_pred),
            mae: mean_absolute_error(y_true, y_pred),
            n_samples: y_true.len(),
        }
    }
}
