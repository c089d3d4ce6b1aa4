use std::env;
use std::path::PathBuf;

use crate::error::HarnessError;
use crate::splitter::Splitter;

/// Fixed descriptive fields written into every metadata report
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataDefaults {
    pub version: String,
    pub language: String,
    pub license: String,
    pub author: String,
    /// Framework version constraint recorded as `cadmium_version`
    pub cadmium_version: String,
    /// License of the training dataset
    pub dataset_license: String,
    /// Where the training dataset came from, if known
    pub dataset_source: Option<String>,
    pub tags: Vec<String>,
}

impl Default for MetadataDefaults {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            language: "en".to_string(),
            license: "MIT".to_string(),
            author: "textcat".to_string(),
            cadmium_version: ">= 0.1.0".to_string(),
            dataset_license: "MIT".to_string(),
            dataset_source: None,
            tags: vec!["text-classification".to_string(), "naive-bayes".to_string()],
        }
    }
}

/// Settings for a training run
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Share of the dataset used for training (the rest is held out)
    pub train_fraction: f64,
    /// Seed for the shuffle; `None` draws from the thread-local generator
    pub seed: Option<u64>,
    /// Directory that receives one sub-directory per exported model
    pub models_dir: PathBuf,
    pub metadata: MetadataDefaults,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            train_fraction: Splitter::DEFAULT_TRAIN_FRACTION,
            seed: None,
            models_dir: PathBuf::from("models"),
            metadata: MetadataDefaults::default(),
        }
    }
}

impl HarnessConfig {
    pub const SEED_VAR: &'static str = "TEXTCAT_SEED";
    pub const MODELS_DIR_VAR: &'static str = "TEXTCAT_MODELS_DIR";
    pub const TRAIN_FRACTION_VAR: &'static str = "TEXTCAT_TRAIN_FRACTION";

    /// Defaults overridden by `TEXTCAT_*` environment variables
    pub fn from_env() -> Result<Self, HarnessError> {
        let mut config = Self::default();

        if let Ok(dir) = env::var(Self::MODELS_DIR_VAR) {
            config.models_dir = PathBuf::from(dir);
        }
        if let Ok(seed) = env::var(Self::SEED_VAR) {
            let seed = seed.trim().parse::<u64>().map_err(|e| {
                HarnessError::InvalidConfig(format!("{} must be an unsigned integer: {}", Self::SEED_VAR, e))
            })?;
            config.seed = Some(seed);
        }
        if let Ok(fraction) = env::var(Self::TRAIN_FRACTION_VAR) {
            let fraction = fraction.trim().parse::<f64>().map_err(|e| {
                HarnessError::InvalidConfig(format!("{} must be a number: {}", Self::TRAIN_FRACTION_VAR, e))
            })?;
            config = config.with_train_fraction(fraction)?;
        }

        Ok(config)
    }

    pub fn with_train_fraction(mut self, train_fraction: f64) -> Result<Self, HarnessError> {
        // Validates the range.
        Splitter::new(train_fraction)?;
        self.train_fraction = train_fraction;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_models_dir(mut self, models_dir: impl Into<PathBuf>) -> Self {
        self.models_dir = models_dir.into();
        self
    }

    pub fn with_metadata(mut self, metadata: MetadataDefaults) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn splitter(&self) -> Result<Splitter, HarnessError> {
        Splitter::new(self.train_fraction)
    }
}
