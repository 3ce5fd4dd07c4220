use std::fmt;

use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, ModelType};
use crate::error::PipelineError;
use crate::models::regressor_trait::RegressorModel;

/// Gradient Boosting Decision Tree (GBDT) regressor.
///
/// Each boosting round fits a depth-limited tree to the residuals of the
/// current ensemble and adds it with the configured shrinkage. Row and
/// feature subsampling are disabled, so a fit is fully determined by its
/// input data.
#[derive(Serialize, Deserialize)]
pub struct GBDTRegressor {
    model: Option<GBDT>,
    params: ModelConfig,
    feature_size: usize,
}

impl GBDTRegressor {
    pub fn new(params: ModelConfig) -> Self {
        GBDTRegressor {
            model: None,
            params,
            feature_size: 0,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn build_config(&self, feature_size: usize) -> Config {
        let mut config = Config::new();
        config.set_feature_size(feature_size);
        config.set_shrinkage(self.params.learning_rate);
        config.set_data_sample_ratio(1.0);
        config.set_feature_sample_ratio(1.0);

        match &self.params.model_type {
            ModelType::GBDT {
                max_depth,
                num_boost_round,
                min_leaf_size,
                training_optimization_level,
                loss_type,
                debug,
            } => {
                config.set_max_depth(*max_depth);
                config.set_iterations(*num_boost_round as usize);
                config.set_min_leaf_size(*min_leaf_size);
                config.set_training_optimization_level(*training_optimization_level);
                config.set_loss(loss_type);
                config.set_debug(*debug);
            }
        }
        config
    }
}

impl RegressorModel for GBDTRegressor {
    fn fit(&mut self, x: &Array2<f32>, y: &[f64]) -> Result<(), PipelineError> {
        if x.nrows() == 0 {
            return Err(PipelineError::EmptyDataset);
        }
        assert_eq!(x.nrows(), y.len(), "feature rows and targets differ in length");

        let feature_size = x.ncols();
        let config = self.build_config(feature_size);
        let mut gbdt = GBDT::new(&config);

        let mut train_x = DataVec::with_capacity(x.nrows());
        for (row, &label) in x.rows().into_iter().zip(y) {
            train_x.push(Data::new_training_data(row.to_vec(), 1.0, label as f32, None));
        }

        log::debug!(
            "Fitting GBDT on {} rows x {} features",
            x.nrows(),
            feature_size
        );
        gbdt.fit(&mut train_x);

        self.model = Some(gbdt);
        self.feature_size = feature_size;
        Ok(())
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<f64>, PipelineError> {
        let model = self.model.as_ref().ok_or(PipelineError::NotFitted)?;
        if x.ncols() != self.feature_size {
            return Err(PipelineError::FeatureWidthMismatch {
                expected: self.feature_size,
                found: x.ncols(),
            });
        }

        let mut test_x = DataVec::with_capacity(x.nrows());
        for row in x.rows() {
            test_x.push(Data::new_test_data(row.to_vec(), None));
        }
        Ok(model.predict(&test_x).into_iter().map(f64::from).collect())
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}

impl fmt::Debug for GBDTRegressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GBDTRegressor")
            .field("params", &self.params)
            .field("feature_size", &self.feature_size)
            .field("fitted", &self.is_fitted())
            .finish()
    }
}
