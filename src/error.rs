//! Error types for the voting ensemble

use thiserror::Error;

/// Result type alias for ensemble operations
pub type Result<T> = std::result::Result<T, EnsembleError>;

/// Main error type for the ensemble and the classifiers it drives
#[derive(Error, Debug)]
pub enum EnsembleError {
    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Number of classifiers and weights must be equal: expected {expected} weights, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },

    #[error("Classifier '{classifier}' does not support predict_proba")]
    CapabilityError { classifier: String },

    #[error("Training failed for classifier '{classifier}': {source}")]
    TrainingError {
        classifier: String,
        #[source]
        source: Box<EnsembleError>,
    },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Unknown class code {code}, expected a value below {n_classes}")]
    UnknownClass { code: usize, n_classes: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EnsembleError {
    /// True for errors raised by configuration validation
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EnsembleError::InvalidParameter { .. } | EnsembleError::WeightCountMismatch { .. }
        )
    }
}

impl From<ndarray::ShapeError> for EnsembleError {
    fn from(err: ndarray::ShapeError) -> Self {
        EnsembleError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
