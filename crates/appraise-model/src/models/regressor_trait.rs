use ndarray::Array2;

use crate::error::PipelineError;

/// Contract shared by the price regressors. Rows of `x` are listings and
/// columns are encoded features.
pub trait RegressorModel {
    /// Fit the model on an encoded feature matrix and its targets.
    fn fit(&mut self, x: &Array2<f32>, y: &[f64]) -> Result<(), PipelineError>;

    /// Predict one target per row of `x`.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f64>, PipelineError>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "regressor"
    }
}
