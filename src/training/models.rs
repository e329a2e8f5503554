//! Classifier trait and parameter maps

use crate::error::{EnsembleError, Result};
use ndarray::{Array1, Array2};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Flat parameter mapping, keyed by parameter name
pub type Params = BTreeMap<String, Value>;

/// Trait for trainable classifiers driven by an ensemble.
///
/// Labels are always dense encoded class indices (`0..n_classes`); the
/// ensemble owns the mapping back to user-facing labels.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Kind name, e.g. `"LogisticRegression"`
    fn name(&self) -> &str;

    /// Fresh untrained copy with identical configuration
    fn clone_unfitted(&self) -> Box<dyn Classifier>;

    /// Fit the classifier to training data
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()>;

    /// Predict encoded class indices, one per row
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>>;

    /// Whether `predict_proba` is available
    fn supports_proba(&self) -> bool {
        false
    }

    /// Predict class probabilities, shape `(rows, n_classes)`
    fn predict_proba(&self, _x: &Array2<f64>) -> Result<Array2<f64>> {
        Err(EnsembleError::CapabilityError {
            classifier: self.name().to_string(),
        })
    }

    /// Configuration parameters. With `deep`, nested estimators contribute
    /// their own parameters as `"{name}__{param}"`.
    fn get_params(&self, _deep: bool) -> Params {
        Params::new()
    }

    /// Set a single parameter by name
    fn set_param(&mut self, key: &str, value: Value) -> Result<()> {
        Err(EnsembleError::InvalidParameter {
            name: key.to_string(),
            value: value.to_string(),
            reason: format!("not a parameter of {}", self.name()),
        })
    }
}

/// Describe a classifier specification as a parameter value
pub fn describe(classifier: &dyn Classifier) -> Value {
    let params = classifier
        .get_params(false)
        .into_iter()
        .collect::<serde_json::Map<String, Value>>();

    let mut out = serde_json::Map::new();
    out.insert("estimator".to_string(), Value::String(classifier.name().to_string()));
    out.insert("params".to_string(), Value::Object(params));
    Value::Object(out)
}
