use anyhow::Result;
use clap::ArgMatches;
use std::path::PathBuf;

use crate::util::validate_listing_table;

#[derive(Debug, Clone, PartialEq)]
pub struct PredictConfig {
    pub model_path: PathBuf,
    pub inference_data: PathBuf,
    /// Where predictions are written; stdout when `None`.
    pub output_file: Option<PathBuf>,
    /// When set, a projected price this many years ahead is added.
    pub years: Option<f64>,
    pub annual_rate: Option<f64>,
}

impl PredictConfig {
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let model_path = matches
            .get_one::<PathBuf>("model_path")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("A model path is required"))?;

        let inference_data = matches
            .get_one::<String>("inference_data")
            .ok_or_else(|| anyhow::anyhow!("Inference data is required"))?;
        validate_listing_table(inference_data)?;

        Ok(PredictConfig {
            model_path,
            inference_data: PathBuf::from(inference_data),
            output_file: matches.get_one::<PathBuf>("output_file").cloned(),
            years: matches.get_one::<f64>("years").copied(),
            annual_rate: matches.get_one::<f64>("rate").copied(),
        })
    }
}
