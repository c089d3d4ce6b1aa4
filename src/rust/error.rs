use std::io;
use std::path::PathBuf;

use crate::classifier::ClassifierError;

/// Errors that abort a training, evaluation or export run.
///
/// Malformed training records never show up here: the loader skips them and
/// counts them instead.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Training data unavailable at {path}: {source}")]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Test set is empty; need at least one held-out example to evaluate")]
    EmptyTestSet,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error("Failed to serialize model: {0}")]
    SerializationFailure(String),
    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Model unavailable at {path}: {source}")]
    ModelUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Metadata error: {0}")]
    MetadataFailure(String),
    #[error("Hash mismatch: expected {expected}, got {actual} for {path}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}
