use std::collections::BTreeMap;

mod bayes;
mod error;
mod utils;

pub use bayes::BayesClassifier;
pub use error::ClassifierError;

/// The operations the training harness needs from a text classifier.
///
/// The harness never looks inside the probability model. It trains through
/// [`train`](TextClassifier::train), predicts through
/// [`classify_category`](TextClassifier::classify_category), introspects the
/// result for the metadata report and serializes it in two forms.
pub trait TextClassifier {
    /// Feeds one labeled example into the model, mutating it in place
    fn train(&mut self, text: &str, category: &str) -> Result<(), ClassifierError>;

    /// Returns a confidence percentage (0.0 to 100.0) for every known category
    fn classify(&self, text: &str) -> Result<BTreeMap<String, f64>, ClassifierError>;

    /// Returns the single best category for the text
    fn classify_category(&self, text: &str) -> Result<String, ClassifierError>;

    /// Number of distinct tokens the model has seen
    fn vocabulary_size(&self) -> usize;

    /// Number of training documents the model has seen
    fn total_documents(&self) -> u64;

    /// Known categories, sorted
    fn categories(&self) -> Vec<String>;

    /// Short tag identifying the algorithm, written to the metadata report
    fn model_type(&self) -> &'static str;

    /// Encodes the full state into the compact binary form
    fn to_bytes(&self) -> Result<Vec<u8>, ClassifierError>;

    /// Encodes the full state into the human-inspectable JSON form
    fn to_json(&self) -> Result<String, ClassifierError>;

    /// Restores a classifier from [`to_bytes`](TextClassifier::to_bytes) output
    fn from_bytes(bytes: &[u8]) -> Result<Self, ClassifierError>
    where
        Self: Sized;

    /// Restores a classifier from [`to_json`](TextClassifier::to_json) output
    fn from_json(json: &str) -> Result<Self, ClassifierError>
    where
        Self: Sized;
}
