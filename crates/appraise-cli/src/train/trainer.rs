use anyhow::Result;
use appraise_model::config::PipelineConfig;
use appraise_model::pipeline::{run_training, TrainingSummary};

/// Run a training session and report the score and artifact location on
/// stdout.
pub fn run_training_session(config: &PipelineConfig) -> Result<TrainingSummary> {
    log::debug!(
        "Training config:\n{}",
        serde_json::to_string_pretty(config).unwrap_or_default()
    );

    let start_time = std::time::Instant::now();
    let summary = run_training(config)?;
    log::info!("Training completed in {:?}", start_time.elapsed());

    println!("Model R^2 score: {:.3}", summary.r2());
    println!("Model saved as {}", summary.output_path.display());
    Ok(summary)
}
