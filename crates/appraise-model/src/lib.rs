//! appraise-model: gradient-boosted price models for real-estate listings.
//!
//! This crate loads listing tables, cleans and encodes them, fits a GBDT
//! regressor, scores it on held-out rows and persists the fitted pipeline.
//! It also provides a compound-growth projection helper for turning a
//! current price estimate into a future one.
pub mod cleaning;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod projection;
pub mod schema;
pub mod stats;

pub use config::{ModelConfig, ModelType, PipelineConfig};
pub use error::PipelineError;
pub use pipeline::{run_training, PricePipeline, TrainingSummary};
pub use projection::project_future_price;
