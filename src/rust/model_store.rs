use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use sha2::{Digest, Sha256};
use log;

use crate::classifier::TextClassifier;
use crate::error::HarnessError;
use crate::metadata::ModelMetadata;

pub const MODEL_EXTENSION: &str = "model";
pub const JSON_EXTENSION: &str = "model.json";
pub const METADATA_FILE: &str = "metadata.yml";

/// Paths of the artifacts written for one exported model
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedModel {
    pub model_path: PathBuf,
    pub json_path: PathBuf,
    pub metadata_path: PathBuf,
    /// SHA-256 of the binary artifact
    pub model_sha256: String,
}

/// Writes and reads trained models under a models directory.
///
/// Each model gets its own sub-directory:
/// `<models_dir>/<name>/<name>.model`, `<name>.model.json` and `metadata.yml`.
#[derive(Debug, Clone)]
pub struct ModelStore {
    models_dir: PathBuf,
}

impl ModelStore {
    pub fn new<P: AsRef<Path>>(models_dir: P) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_dir(&self, name: &str) -> PathBuf {
        self.models_dir.join(name)
    }

    pub fn get_model_path(&self, name: &str) -> PathBuf {
        self.get_model_dir(name).join(format!("{}.{}", name, MODEL_EXTENSION))
    }

    pub fn get_json_path(&self, name: &str) -> PathBuf {
        self.get_model_dir(name).join(format!("{}.{}", name, JSON_EXTENSION))
    }

    pub fn get_metadata_path(&self, name: &str) -> PathBuf {
        self.get_model_dir(name).join(METADATA_FILE)
    }

    pub fn is_model_exported(&self, name: &str) -> bool {
        let model_path = self.get_model_path(name);
        let json_path = self.get_json_path(name);
        let metadata_path = self.get_metadata_path(name);
        log::debug!("Checking if model '{}' is exported:", name);
        log::debug!("  Model path: {:?} (exists: {})", model_path, model_path.exists());
        log::debug!("  JSON path: {:?} (exists: {})", json_path, json_path.exists());
        model_path.exists() && json_path.exists() && metadata_path.exists()
    }

    /// Serializes the classifier in both forms and writes them with the
    /// metadata report.
    ///
    /// Both encodings are produced in memory before anything touches the
    /// disk, so a serialization failure leaves no artifacts behind. Each file
    /// is then written to a temporary sibling and renamed into place.
    pub fn export<C: TextClassifier>(
        &self,
        name: &str,
        classifier: &C,
        mut metadata: ModelMetadata,
    ) -> Result<ExportedModel, HarnessError> {
        let bytes = classifier
            .to_bytes()
            .map_err(|e| HarnessError::SerializationFailure(e.to_string()))?;
        let json = classifier
            .to_json()
            .map_err(|e| HarnessError::SerializationFailure(e.to_string()))?;

        let model_sha256 = sha256_hex(&bytes);
        metadata.model_sha256 = Some(model_sha256.clone());
        let yaml = metadata.to_yaml()?;

        let model_dir = self.get_model_dir(name);
        log::info!("Creating model directory at {:?}", model_dir);
        fs::create_dir_all(&model_dir).map_err(|source| HarnessError::WriteFailure {
            path: model_dir.clone(),
            source,
        })?;

        let model_path = self.get_model_path(name);
        let json_path = self.get_json_path(name);
        let metadata_path = self.get_metadata_path(name);

        write_atomic(&model_path, &bytes)?;
        log::info!("Wrote {} bytes to {:?}", bytes.len(), model_path);
        write_atomic(&json_path, json.as_bytes())?;
        log::info!("Wrote {} bytes to {:?}", json.len(), json_path);
        write_atomic(&metadata_path, yaml.as_bytes())?;
        log::info!("Wrote metadata to {:?}", metadata_path);

        Ok(ExportedModel {
            model_path,
            json_path,
            metadata_path,
            model_sha256,
        })
    }

    /// Loads a classifier, choosing the codec from the file extension:
    /// `.json` files use the text form, anything else the binary form.
    pub fn load_classifier<C: TextClassifier, P: AsRef<Path>>(path: P) -> Result<C, HarnessError> {
        let path = path.as_ref();
        let unavailable = |source| HarnessError::ModelUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        log::info!("Loading {} model from {:?}", if is_json { "JSON" } else { "binary" }, path);
        let classifier = if is_json {
            let json = fs::read_to_string(path).map_err(unavailable)?;
            C::from_json(&json)?
        } else {
            let bytes = fs::read(path).map_err(unavailable)?;
            C::from_bytes(&bytes)?
        };
        Ok(classifier)
    }

    pub fn load_metadata(&self, name: &str) -> Result<ModelMetadata, HarnessError> {
        let path = self.get_metadata_path(name);
        let yaml = fs::read_to_string(&path)
            .map_err(|source| HarnessError::ModelUnavailable { path, source })?;
        ModelMetadata::from_yaml(&yaml)
    }

    /// Checks the binary artifact against the digest recorded in metadata.
    ///
    /// Returns `Ok(false)` when any artifact is missing or the metadata
    /// carries no digest.
    pub fn verify(&self, name: &str) -> Result<bool, HarnessError> {
        if !self.is_model_exported(name) {
            log::info!("Model '{}' is not fully exported", name);
            return Ok(false);
        }

        let metadata = self.load_metadata(name)?;
        let Some(expected) = metadata.model_sha256 else {
            log::warn!("Metadata for '{}' has no model digest", name);
            return Ok(false);
        };

        let model_path = self.get_model_path(name);
        let bytes = fs::read(&model_path).map_err(|source| HarnessError::ModelUnavailable {
            path: model_path.clone(),
            source,
        })?;
        let actual = sha256_hex(&bytes);
        log::debug!("Calculated hash: {}", actual);
        log::debug!("Expected hash:   {}", expected);

        if actual != expected {
            log::error!("Model hash mismatch: expected {}, got {}", expected, actual);
            return Err(HarnessError::ChecksumMismatch {
                path: model_path,
                expected,
                actual,
            });
        }
        Ok(true)
    }

    pub fn remove(&self, name: &str) -> Result<(), HarnessError> {
        let model_dir = self.get_model_dir(name);
        if model_dir.exists() {
            fs::remove_dir_all(&model_dir).map_err(|source| HarnessError::WriteFailure {
                path: model_dir,
                source,
            })?;
        }
        Ok(())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Writes `bytes` to a temporary sibling of `path` and renames it into place
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), HarnessError> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result = (|| -> io::Result<()> {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    result.map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        HarnessError::WriteFailure {
            path: path.to_path_buf(),
            source,
        }
    })
}
