//! The `metadata.yml` report written next to every exported model.

use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::TextClassifier;
use crate::config::MetadataDefaults;
use crate::error::HarnessError;
use crate::evaluation::Evaluation;
use crate::training::TrainingReport;

/// Rounds a metric to the four decimals stored in metadata
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn round_map(values: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    values.into_iter().map(|(k, v)| (k, round4(v))).collect()
}

/// Provenance of one training dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub dataset: String,
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub license: String,
}

/// How the model was trained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub test_split: f64,
    pub training_time_seconds: f64,
    pub trained_at: DateTime<Utc>,
}

/// Report describing a trained model and how well it did on held-out data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub version: String,
    pub description: String,
    pub model_type: String,
    pub trained_on: Vec<DatasetInfo>,
    pub categories: Vec<String>,
    pub vocabulary_size: usize,
    pub training_documents: u64,
    pub accuracy: f64,
    pub precision: BTreeMap<String, f64>,
    pub recall: BTreeMap<String, f64>,
    pub f1_score: BTreeMap<String, f64>,
    pub language: String,
    pub license: String,
    pub author: String,
    pub created_at: String,
    pub cadmium_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub training_config: TrainingConfig,
    /// SHA-256 of the binary model artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_sha256: Option<String>,
}

/// Inputs gathered over a run that the metadata report is assembled from
pub struct MetadataInputs<'a> {
    pub name: &'a str,
    pub dataset_name: &'a str,
    pub dataset_size: usize,
    pub test_split: f64,
    pub training: &'a TrainingReport,
    pub evaluation: &'a Evaluation,
    pub defaults: &'a MetadataDefaults,
}

impl ModelMetadata {
    /// Assembles the report from evaluator output and classifier introspection
    pub fn build<C: TextClassifier>(classifier: &C, inputs: MetadataInputs<'_>) -> Self {
        let MetadataInputs {
            name,
            dataset_name,
            dataset_size,
            test_split,
            training,
            evaluation,
            defaults,
        } = inputs;

        let mut categories = classifier.categories();
        categories.sort();

        Self {
            name: name.to_string(),
            version: defaults.version.clone(),
            description: format!(
                "{} text classifier trained on {} ({} categories)",
                classifier.model_type(),
                dataset_name,
                categories.len()
            ),
            model_type: classifier.model_type().to_string(),
            trained_on: vec![DatasetInfo {
                dataset: dataset_name.to_string(),
                size: dataset_size,
                source: defaults.dataset_source.clone(),
                license: defaults.dataset_license.clone(),
            }],
            categories,
            vocabulary_size: classifier.vocabulary_size(),
            training_documents: classifier.total_documents(),
            accuracy: round4(evaluation.accuracy),
            precision: round_map(evaluation.precision()),
            recall: round_map(evaluation.recall()),
            f1_score: round_map(evaluation.f1()),
            language: defaults.language.clone(),
            license: defaults.license.clone(),
            author: defaults.author.clone(),
            created_at: training.trained_at.format("%Y-%m-%d").to_string(),
            cadmium_version: defaults.cadmium_version.clone(),
            tags: defaults.tags.clone(),
            training_config: TrainingConfig {
                test_split: round4(test_split),
                training_time_seconds: round4(training.elapsed_seconds()),
                trained_at: training.trained_at,
            },
            model_sha256: None,
        }
    }

    pub fn to_yaml(&self) -> Result<String, HarnessError> {
        serde_yaml::to_string(self).map_err(|e| HarnessError::MetadataFailure(e.to_string()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, HarnessError> {
        serde_yaml::from_str(yaml).map_err(|e| HarnessError::MetadataFailure(e.to_string()))
    }
}
