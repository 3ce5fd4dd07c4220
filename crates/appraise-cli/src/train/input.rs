use anyhow::{Context, Result};
use appraise_model::config::PipelineConfig;
use clap::ArgMatches;
use std::fs;
use std::path::{Path, PathBuf};

use crate::util::validate_listing_table;

/// Load a training configuration from a JSON file. Fields that are absent
/// keep their defaults.
pub fn load_train_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let config_json = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
    let config: PipelineConfig = serde_json::from_str(&config_json)
        .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Build the training configuration from an optional config file and the
/// command line overrides.
pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<PipelineConfig> {
    let mut config = match config_path {
        Some(path) => load_train_config(path)?,
        None => {
            log::info!("No config provided; using defaults.");
            PipelineConfig::default()
        }
    };

    if let Some(data) = matches.get_one::<String>("data") {
        validate_listing_table(data)?;
        config.input_path = PathBuf::from(data);
    }

    if let Some(output_file) = matches.get_one::<String>("output_file") {
        config.output_path = PathBuf::from(output_file);
    }

    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = *seed;
    }

    config.validate()?;
    Ok(config)
}
