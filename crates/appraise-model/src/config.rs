use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::PipelineError;

/// Default location of the listing dataset.
pub const DEFAULT_INPUT_PATH: &str = "data/NY-House-Dataset.csv";
/// Default location of the trained pipeline artifact.
pub const DEFAULT_OUTPUT_PATH: &str = "models/advanced_house_price_model.json";

/// Central configuration for the regressor.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub learning_rate: f32,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    GBDT {
        max_depth: u32,
        num_boost_round: u32,
        min_leaf_size: usize,
        training_optimization_level: u8,
        loss_type: String,
        debug: bool,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::GBDT {
            max_depth: 3,
            num_boost_round: 200,
            min_leaf_size: 1,
            training_optimization_level: 2,
            loss_type: "SquaredError".to_string(),
            debug: false,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbdt" => Ok(ModelType::default()),
            _ => Err(format!("Unknown model type: {}", s)),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::default(),
        }
    }
}

/// Everything a training run needs: where to read, where to write, how to
/// split and how to fit.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Fraction of cleaned rows held out for evaluation.
    pub test_fraction: f64,
    pub seed: u64,
    pub model: ModelConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            test_fraction: 0.2,
            seed: 42,
            model: ModelConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "test_fraction must lie in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if !(self.model.learning_rate > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.model.learning_rate
            )));
        }
        match &self.model.model_type {
            ModelType::GBDT {
                max_depth,
                num_boost_round,
                ..
            } => {
                if *num_boost_round == 0 || *max_depth == 0 {
                    return Err(PipelineError::InvalidConfig(
                        "max_depth and num_boost_round must be at least 1".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.seed, 42);
        assert!((cfg.test_fraction - 0.2).abs() < 1e-12);
        match cfg.model.model_type {
            ModelType::GBDT {
                num_boost_round,
                ref loss_type,
                ..
            } => {
                assert_eq!(num_boost_round, 200);
                assert_eq!(loss_type, "SquaredError");
            }
        }
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_test_fraction() {
        let cfg = PipelineConfig {
            test_fraction: 1.0,
            ..PipelineConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn model_type_parses_case_insensitively() {
        assert!(ModelType::from_str("GBDT").is_ok());
        assert!(ModelType::from_str("svm").is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: PipelineConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }
}
