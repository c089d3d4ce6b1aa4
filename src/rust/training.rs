use std::time::{Duration, Instant};
use chrono::{DateTime, Utc};
use log::info;

use crate::classifier::TextClassifier;
use crate::dataset::Dataset;
use crate::error::HarnessError;

/// Outcome of one training pass
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Number of examples fed to the classifier
    pub documents: usize,
    /// Monotonic time spent inside the training calls
    pub elapsed: Duration,
    /// When training finished
    pub trained_at: DateTime<Utc>,
}

impl TrainingReport {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Feeds the training partition to a classifier, one example at a time.
///
/// Training is sequential and mutates the classifier in place. The first
/// failing example aborts the run; there is no partial-model recovery.
pub struct TrainingDriver;

impl TrainingDriver {
    pub fn train<C: TextClassifier>(
        classifier: &mut C,
        train: &Dataset,
    ) -> Result<TrainingReport, HarnessError> {
        info!("Training on {} examples...", train.len());
        let start_time = Instant::now();

        for example in train {
            classifier.train(&example.text, &example.category)?;
        }

        let elapsed = start_time.elapsed();
        info!("Training complete (took {:.2?})", elapsed);

        Ok(TrainingReport {
            documents: train.len(),
            elapsed,
            trained_at: Utc::now(),
        })
    }
}
