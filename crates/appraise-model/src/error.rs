use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Fatal failure kinds raised by the training and inference pipeline.
///
/// Public functions return `anyhow::Result` with context attached; callers
/// that need to tell failures apart can `downcast_ref::<PipelineError>()`.
#[derive(Debug)]
pub enum PipelineError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
    MissingColumn(String),
    NonNumericColumn(String),
    MissingValue {
        column: String,
        row: usize,
    },
    EmptyDataset,
    InsufficientRows {
        rows: usize,
    },
    InvalidConfig(String),
    NotFitted,
    FeatureWidthMismatch {
        expected: usize,
        found: usize,
    },
    Serialization(serde_json::Error),
    IncompatibleArtifact {
        found: u32,
        expected: u32,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            PipelineError::Csv { path, source } => {
                write!(f, "Malformed CSV in {}: {}", path.display(), source)
            }
            PipelineError::MissingColumn(name) => write!(f, "Missing column '{}'", name),
            PipelineError::NonNumericColumn(name) => {
                write!(f, "Column '{}' holds non-numeric values", name)
            }
            PipelineError::MissingValue { column, row } => {
                write!(f, "Column '{}' has no value at row {}", column, row)
            }
            PipelineError::EmptyDataset => write!(f, "Dataset has no rows"),
            PipelineError::InsufficientRows { rows } => write!(
                f,
                "Need at least one training and one evaluation row, got {} rows",
                rows
            ),
            PipelineError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            PipelineError::NotFitted => write!(f, "Model has not been fitted"),
            PipelineError::FeatureWidthMismatch { expected, found } => write!(
                f,
                "Feature matrix has {} columns, model expects {}",
                found, expected
            ),
            PipelineError::Serialization(e) => write!(f, "Artifact (de)serialization failed: {}", e),
            PipelineError::IncompatibleArtifact { found, expected } => write!(
                f,
                "Artifact format version {} is not supported (expected {})",
                found, expected
            ),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Io { source, .. } => Some(source),
            PipelineError::Csv { source, .. } => Some(source),
            PipelineError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}
