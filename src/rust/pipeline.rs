use std::path::Path;
use log::info;

use crate::classifier::{BayesClassifier, TextClassifier};
use crate::config::HarnessConfig;
use crate::dataset::Dataset;
use crate::error::HarnessError;
use crate::evaluation::{Evaluation, Evaluator};
use crate::metadata::{MetadataInputs, ModelMetadata};
use crate::model_store::{ExportedModel, ModelStore};
use crate::splitter::Split;
use crate::training::{TrainingDriver, TrainingReport};

/// Summary of a finished training run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub dataset_size: usize,
    pub skipped_lines: usize,
    pub train_size: usize,
    pub test_size: usize,
    pub training: TrainingReport,
    pub evaluation: Evaluation,
    pub metadata: ModelMetadata,
    pub exported: ExportedModel,
}

/// Load, split, train, evaluate and export, strictly in that order
pub struct TrainingPipeline {
    config: HarnessConfig,
    store: ModelStore,
}

impl TrainingPipeline {
    pub fn new(config: HarnessConfig) -> Self {
        let store = ModelStore::new(&config.models_dir);
        Self { config, store }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Runs the pipeline with the naive Bayes classifier
    pub fn run<P: AsRef<Path>>(&self, data_file: P, output_name: &str) -> Result<PipelineReport, HarnessError> {
        self.run_with::<BayesClassifier, P>(data_file, output_name)
    }

    /// Runs the pipeline with a fresh `C`
    pub fn run_with<C, P>(&self, data_file: P, output_name: &str) -> Result<PipelineReport, HarnessError>
    where
        C: TextClassifier + Default,
        P: AsRef<Path>,
    {
        let data_file = data_file.as_ref();
        info!("=== Training '{}' from {:?} ===", output_name, data_file);

        let dataset = Dataset::load(data_file)?;
        let dataset_size = dataset.len();
        let skipped_lines = dataset.skipped();

        let split = self.split(dataset)?;
        info!("Split: {} training / {} test examples", split.train.len(), split.test.len());
        if split.test.is_empty() {
            return Err(HarnessError::EmptyTestSet);
        }

        let mut classifier = C::default();
        let training = TrainingDriver::train(&mut classifier, &split.train)?;
        let evaluation = Evaluator::evaluate(&classifier, &split.test)?;

        let dataset_name = data_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| data_file.display().to_string());
        let metadata = ModelMetadata::build(
            &classifier,
            MetadataInputs {
                name: output_name,
                dataset_name: &dataset_name,
                dataset_size,
                test_split: 1.0 - self.config.train_fraction,
                training: &training,
                evaluation: &evaluation,
                defaults: &self.config.metadata,
            },
        );

        let exported = self.store.export(output_name, &classifier, metadata.clone())?;
        info!("=== Model '{}' exported to {:?} ===", output_name, exported.model_path);

        Ok(PipelineReport {
            dataset_size,
            skipped_lines,
            train_size: split.train.len(),
            test_size: split.test.len(),
            training,
            evaluation,
            metadata: ModelMetadata {
                model_sha256: Some(exported.model_sha256.clone()),
                ..metadata
            },
            exported,
        })
    }

    fn split(&self, dataset: Dataset) -> Result<Split, HarnessError> {
        let splitter = self.config.splitter()?;
        Ok(match self.config.seed {
            Some(seed) => splitter.split_seeded(dataset, seed),
            None => splitter.split(dataset, &mut rand::thread_rng()),
        })
    }
}
