use anyhow::{Context, Result};
use appraise_model::io::read_listings_csv;
use appraise_model::pipeline::PricePipeline;
use appraise_model::projection::project_future_price;

use crate::predict::input::PredictConfig;
use crate::predict::output::write_predictions;

/// Predicted (and optionally projected) prices for an inference table.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    pub predicted: Vec<f64>,
    pub projected: Option<Vec<f64>>,
}

pub fn run_inference(config: &PredictConfig) -> Result<InferenceResult> {
    let pipeline = PricePipeline::load(&config.model_path)?;
    if let Some(report) = pipeline.evaluation() {
        log::info!(
            "Loaded model from {} (held-out R^2 {:.3})",
            config.model_path.display(),
            report.r2
        );
    }

    let data = read_listings_csv(&config.inference_data)?;
    let predicted = pipeline
        .predict(&data)
        .with_context(|| format!("Failed to predict {}", config.inference_data.display()))?;
    log::info!("Predicted {} listings", predicted.len());

    let projected = config.years.map(|years| {
        predicted
            .iter()
            .map(|&price| project_future_price(price, years, config.annual_rate))
            .collect::<Vec<f64>>()
    });

    write_predictions(
        &data,
        &predicted,
        projected.as_deref(),
        config.output_file.as_deref(),
    )?;

    Ok(InferenceResult {
        predicted,
        projected,
    })
}
