//! The fitted price pipeline and the end-to-end training run.
//!
//! A `PricePipeline` bundles the fitted `Preprocessor` with the fitted
//! `GBDTRegressor`, so raw listing tables go in and prices come out. It is
//! persisted as a single JSON artifact.
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::cleaning::clean;
use crate::config::{ModelConfig, PipelineConfig};
use crate::data_handling::{train_test_split, Dataset};
use crate::error::PipelineError;
use crate::io::read_listings_csv;
use crate::models::{GBDTRegressor, RegressorModel};
use crate::preprocessing::Preprocessor;
use crate::schema::{Listing, CATEGORICAL_COLUMNS, FEATURE_COLUMNS, NUMERICAL_COLUMNS, PRICE};
use crate::stats::EvaluationReport;

/// Bumped whenever the artifact layout changes incompatibly.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Provenance stored next to the fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub format_version: u32,
    pub crate_version: String,
    pub trained_at: DateTime<Utc>,
    pub feature_columns: Vec<String>,
    pub target_column: String,
    pub encoded_width: usize,
    pub n_train: usize,
    /// Held-out rows behind `evaluation`; 0 until the pipeline is scored.
    #[serde(default)]
    pub n_eval: usize,
    pub seed: u64,
}

/// Preprocessing plus regression, fitted together and applied together.
#[derive(Debug, Serialize, Deserialize)]
pub struct PricePipeline {
    metadata: PipelineMetadata,
    preprocessor: Preprocessor,
    regressor: GBDTRegressor,
    evaluation: Option<EvaluationReport>,
}

impl PricePipeline {
    /// Fit the preprocessor and the regressor on training rows.
    pub fn fit(
        features: &Dataset,
        target: &Array1<f64>,
        model: &ModelConfig,
        seed: u64,
    ) -> Result<Self> {
        if features.nrows() == 0 {
            return Err(PipelineError::EmptyDataset.into());
        }

        let (preprocessor, x) =
            Preprocessor::fit_transform(features, &CATEGORICAL_COLUMNS, &NUMERICAL_COLUMNS)
                .context("Failed to fit preprocessor")?;

        log::debug!("Encoded features: {:?}", preprocessor.feature_names());

        let mut regressor = GBDTRegressor::new(model.clone());
        let start_time = std::time::Instant::now();
        regressor
            .fit(&x, &target.to_vec())
            .context("Failed to fit regressor")?;
        log::info!(
            "Fitted {} on {} rows x {} features in {:?}",
            regressor.name(),
            x.nrows(),
            x.ncols(),
            start_time.elapsed()
        );

        let metadata = PipelineMetadata {
            format_version: ARTIFACT_FORMAT_VERSION,
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            trained_at: Utc::now(),
            feature_columns: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            target_column: PRICE.to_string(),
            encoded_width: preprocessor.width(),
            n_train: features.nrows(),
            n_eval: 0,
            seed,
        };

        Ok(PricePipeline {
            metadata,
            preprocessor,
            regressor,
            evaluation: None,
        })
    }

    pub fn metadata(&self) -> &PipelineMetadata {
        &self.metadata
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn evaluation(&self) -> Option<&EvaluationReport> {
        self.evaluation.as_ref()
    }

    /// Predict a price for every row of `features`.
    pub fn predict(&self, features: &Dataset) -> Result<Vec<f64>> {
        let x = self
            .preprocessor
            .transform(features)
            .context("Failed to encode features")?;
        let predictions = self.regressor.predict(&x)?;
        Ok(predictions)
    }

    /// Predict prices for typed listings.
    pub fn predict_listings(&self, listings: &[Listing]) -> Result<Vec<f64>> {
        self.predict(&Listing::to_dataset(listings))
    }

    /// Score the pipeline on held-out rows and keep the report with the
    /// artifact.
    pub fn evaluate(
        &mut self,
        features: &Dataset,
        target: &Array1<f64>,
    ) -> Result<EvaluationReport> {
        if features.nrows() == 0 {
            return Err(PipelineError::EmptyDataset.into());
        }
        let predictions = self.predict(features)?;
        let report = EvaluationReport::compute(&target.to_vec(), &predictions);
        log::info!(
            "Evaluation on {} rows: R^2 {:.4}, RMSE {:.2}, MAE {:.2}",
            report.n_samples,
            report.r2,
            report.rmse,
            report.mae
        );
        self.metadata.n_eval = report.n_samples;
        self.evaluation = Some(report);
        Ok(report)
    }

    /// Write the artifact to `path`, replacing any existing file. The parent
    /// directory must already exist.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let io_error = |source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path)
            .map_err(io_error)
            .with_context(|| format!("Failed to create model file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self).map_err(PipelineError::Serialization)?;
        writer.flush().map_err(io_error)?;
        log::debug!("Wrote pipeline artifact to {}", path.display());
        Ok(())
    }

    /// Read an artifact written by [`PricePipeline::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|source| PipelineError::Io {
                path: path.to_path_buf(),
                source,
            })
            .with_context(|| format!("Failed to open model file: {}", path.display()))?;
        let pipeline: PricePipeline = serde_json::from_reader(BufReader::new(file))
            .map_err(PipelineError::Serialization)
            .with_context(|| format!("Failed to parse model file: {}", path.display()))?;

        if pipeline.metadata.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(PipelineError::IncompatibleArtifact {
                found: pipeline.metadata.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            }
            .into());
        }
        log::debug!(
            "Loaded pipeline trained at {} ({} encoded features)",
            pipeline.metadata.trained_at,
            pipeline.metadata.encoded_width
        );
        Ok(pipeline)
    }
}

/// Outcome of [`run_training`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub evaluation: EvaluationReport,
    pub n_rows: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub output_path: PathBuf,
}

impl TrainingSummary {
    pub fn r2(&self) -> f64 {
        self.evaluation.r2
    }
}

/// Load, clean, split, fit, score and save, as configured.
pub fn run_training(config: &PipelineConfig) -> Result<TrainingSummary> {
    config.validate()?;

    let raw = read_listings_csv(&config.input_path)?;
    let cleaned = clean(&raw, &FEATURE_COLUMNS, PRICE).context("Failed to clean listing data")?;
    let n_rows = cleaned.features.nrows();
    log::info!("{} listings remain after cleaning", n_rows);

    let split = train_test_split(n_rows, config.test_fraction, config.seed)?;
    let x_train = cleaned.features.select_rows(&split.train);
    let y_train = cleaned.target.select(ndarray::Axis(0), &split.train);
    let x_test = cleaned.features.select_rows(&split.test);
    let y_test = cleaned.target.select(ndarray::Axis(0), &split.test);
    log::info!(
        "Training on {} rows, evaluating on {} rows",
        split.train.len(),
        split.test.len()
    );

    let mut pipeline = PricePipeline::fit(&x_train, &y_train, &config.model, config.seed)?;
    let evaluation = pipeline.evaluate(&x_test, &y_test)?;
    pipeline.save(&config.output_path)?;

    Ok(TrainingSummary {
        evaluation,
        n_rows,
        n_train: split.train.len(),
        n_test: split.test.len(),
        output_path: config.output_path.clone(),
    })
}
