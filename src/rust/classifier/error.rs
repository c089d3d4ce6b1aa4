/// Represents the different types of errors that can occur in a text classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Error occurred due to invalid input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// The classifier was asked to predict before it saw any training data
    #[error("Classifier has not been trained on any category")]
    Untrained,
    /// Error occurred while encoding the classifier state
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Error occurred while decoding a serialized classifier
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

