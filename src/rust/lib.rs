//! Train, evaluate and export text classifiers from tab-separated examples.
//!
//! A run loads `text<TAB>category` lines, shuffles them into training and
//! held-out partitions, trains a classifier, scores it with a confusion
//! matrix and per-category precision/recall/F1, and writes the model in a
//! binary and a JSON form next to a `metadata.yml` report.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use textcat::{HarnessConfig, TrainingPipeline};
//!
//! let config = HarnessConfig::default()
//!     .with_seed(42)
//!     .with_models_dir("models");
//!
//! let report = TrainingPipeline::new(config).run("data/sentiment.tsv", "sentiment")?;
//! println!("Accuracy: {:.2}%", report.evaluation.accuracy * 100.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Using the pieces directly
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use textcat::{BayesClassifier, Dataset, Evaluator, LabeledExample, Splitter, TrainingDriver};
//!
//! let dataset: Dataset = vec![
//!     LabeledExample::new("I love it", "pos"),
//!     LabeledExample::new("I hate it", "neg"),
//!     LabeledExample::new("love this", "pos"),
//!     LabeledExample::new("hate this", "neg"),
//! ].into();
//!
//! let split = Splitter::new(0.5)?.split_seeded(dataset, 7);
//! let mut classifier = BayesClassifier::new();
//! TrainingDriver::train(&mut classifier, &split.train)?;
//! let evaluation = Evaluator::evaluate(&classifier, &split.test)?;
//! assert_eq!(evaluation.test_size(), 2);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod metadata;
pub mod model_store;
pub mod pipeline;
pub mod splitter;
pub mod training;

pub use classifier::{BayesClassifier, ClassifierError, TextClassifier};
pub use config::{HarnessConfig, MetadataDefaults};
pub use dataset::{Dataset, LabeledExample};
pub use error::HarnessError;
pub use evaluation::{CategoryMetrics, ConfusionMatrix, Evaluation, Evaluator};
pub use metadata::{round4, DatasetInfo, ModelMetadata, TrainingConfig};
pub use model_store::{ExportedModel, ModelStore};
pub use pipeline::{PipelineReport, TrainingPipeline};
pub use splitter::{Split, Splitter};
pub use training::{TrainingDriver, TrainingReport};

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
