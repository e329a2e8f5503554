//! Majority-vote ensemble classifier

use super::naming::name_classifiers;
use crate::error::{EnsembleError, Result};
use crate::preprocessing::LabelEncoder;
use crate::training::{describe, Classifier, Params};
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Debug};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// How member predictions are combined
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VoteMode {
    /// Hard voting: weighted plurality of predicted class labels
    #[default]
    ClassLabel,
    /// Soft voting: argmax of weighted-averaged class probabilities
    Probability,
}

impl VoteMode {
    /// Name used in configuration and parameter maps
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteMode::ClassLabel => "classlabel",
            VoteMode::Probability => "probability",
        }
    }
}

impl fmt::Display for VoteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteMode {
    type Err = EnsembleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "classlabel" => Ok(VoteMode::ClassLabel),
            "probability" => Ok(VoteMode::Probability),
            other => Err(EnsembleError::InvalidParameter {
                name: "vote".to_string(),
                value: other.to_string(),
                reason: "must be 'probability' or 'classlabel'".to_string(),
            }),
        }
    }
}

/// Configuration for the voting ensemble
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VotingConfig {
    /// Vote mode
    pub vote: VoteMode,
    /// One weight per classifier; `None` means uniform weights
    pub weights: Option<Vec<f64>>,
}

impl VotingConfig {
    /// Create a configuration with uniform weights
    pub fn new(vote: VoteMode) -> Self {
        Self { vote, weights: None }
    }

    /// Set the vote mode
    pub fn with_vote(mut self, vote: VoteMode) -> Self {
        self.vote = vote;
        self
    }

    /// Set per-classifier weights
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }
}

/// State produced by a successful fit; later parameter changes never touch it
#[derive(Debug)]
struct FittedState<L> {
    encoder: LabelEncoder<L>,
    classifiers: Vec<Box<dyn Classifier>>,
    vote: VoteMode,
    weights: Vec<f64>,
}

/// Majority-vote ensemble over a fixed list of classifiers.
///
/// Each member is cloned and trained on label-encoded targets during
/// [`fit`](VotingClassifier::fit); the unfitted specifications are kept
/// untouched for parameter introspection and refitting.
#[derive(Debug)]
pub struct VotingClassifier<L> {
    config: VotingConfig,
    names: Vec<String>,
    classifiers: Vec<Box<dyn Classifier>>,
    fitted: Option<FittedState<L>>,
}

impl<L> VotingClassifier<L>
where
    L: Ord + Clone + Debug,
{
    /// Create a hard-voting ensemble with uniform weights
    pub fn new(classifiers: Vec<Box<dyn Classifier>>) -> Self {
        Self::with_config(classifiers, VotingConfig::default())
    }

    /// Create an ensemble from an explicit configuration
    pub fn with_config(classifiers: Vec<Box<dyn Classifier>>, config: VotingConfig) -> Self {
        let names = name_classifiers(&classifiers);
        Self {
            config,
            names,
            classifiers,
            fitted: None,
        }
    }

    /// Set the vote mode
    pub fn with_vote(mut self, vote: VoteMode) -> Self {
        self.config.vote = vote;
        self
    }

    /// Set per-classifier weights
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.config.weights = Some(weights);
        self
    }

    /// Current configuration, applied at the next fit
    pub fn config(&self) -> &VotingConfig {
        &self.config
    }

    /// Number of ensemble members
    pub fn n_classifiers(&self) -> usize {
        self.classifiers.len()
    }

    /// Unfitted classifier specifications, in construction order
    pub fn classifiers(&self) -> &[Box<dyn Classifier>] {
        &self.classifiers
    }

    /// Unfitted specifications paired with their unique names
    pub fn named_classifiers(&self) -> impl Iterator<Item = (&str, &dyn Classifier)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.classifiers.iter().map(|clf| &**clf as &dyn Classifier))
    }

    /// Whether the last fit succeeded
    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Distinct training labels in encoded order
    pub fn classes(&self) -> Result<&[L]> {
        Ok(self.fitted_state()?.encoder.classes())
    }

    /// Label encoder built by the last fit
    pub fn label_encoder(&self) -> Result<&LabelEncoder<L>> {
        Ok(&self.fitted_state()?.encoder)
    }

    /// Trained clones, in construction order
    pub fn fitted_classifiers(&self) -> Result<&[Box<dyn Classifier>]> {
        Ok(&self.fitted_state()?.classifiers)
    }

    /// Fit every member on `x` and the encoded `y`.
    ///
    /// Any previous fitted state is discarded before validation, so a
    /// failed fit always leaves the ensemble unfitted.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<L>) -> Result<&mut Self> {
        self.fitted = None;
        self.validate()?;

        if x.nrows() != y.len() {
            return Err(EnsembleError::ShapeError {
                expected: format!("{} target values (one per row)", x.nrows()),
                actual: y.len().to_string(),
            });
        }

        let encoder = LabelEncoder::fit(y.iter())?;
        let encoded = encoder.transform(y.iter())?;

        debug!(
            n_classifiers = self.classifiers.len(),
            n_classes = encoder.n_classes(),
            n_samples = x.nrows(),
            vote = %self.config.vote,
            "Fitting voting ensemble"
        );

        // Gather every outcome first so the reported failure is the first in
        // construction order, not the first a worker thread finishes.
        let outcomes: Vec<Result<Box<dyn Classifier>>> = self
            .names
            .par_iter()
            .zip(self.classifiers.par_iter())
            .map(|(name, spec)| {
                let mut clf = spec.clone_unfitted();
                clf.fit(x, &encoded).map_err(|e| {
                    warn!(classifier = %name, error = %e, "Classifier failed to train");
                    EnsembleError::TrainingError {
                        classifier: name.clone(),
                        source: Box::new(e),
                    }
                })?;
                Ok(clf)
            })
            .collect();
        let classifiers = outcomes.into_iter().collect::<Result<Vec<_>>>()?;

        info!(
            n_classifiers = classifiers.len(),
            n_classes = encoder.n_classes(),
            "Voting ensemble fitted"
        );

        self.fitted = Some(FittedState {
            encoder,
            classifiers,
            vote: self.config.vote,
            weights: self.effective_weights(),
        });
        Ok(self)
    }

    /// Predict labels, one per row of `x`, using the vote mode of the last fit
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<L>> {
        let state = self.fitted_state()?;

        let codes: Array1<usize> = match state.vote {
            VoteMode::Probability => {
                let proba = self.predict_proba(x)?;
                proba.rows().into_iter().map(|row| argmax(row.iter().copied())).collect()
            }
            VoteMode::ClassLabel => self.hard_vote(state, x)?,
        };

        state.encoder.inverse_transform(&codes)
    }

    /// Weighted average of member class probabilities, shape `(rows, n_classes)`
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let state = self.fitted_state()?;
        let n_classes = state.encoder.n_classes();
        let weights = &state.weights;

        let mut total = Array2::<f64>::zeros((x.nrows(), n_classes));
        for ((clf, name), &weight) in state.classifiers.iter().zip(&self.names).zip(weights) {
            let proba = clf.predict_proba(x)?;
            if proba.dim() != (x.nrows(), n_classes) {
                return Err(EnsembleError::ShapeError {
                    expected: format!("({}, {}) probabilities from '{}'", x.nrows(), n_classes, name),
                    actual: format!("{:?}", proba.dim()),
                });
            }
            total.scaled_add(weight, &proba);
        }

        let weight_sum: f64 = weights.iter().sum();
        Ok(total / weight_sum)
    }

    /// Mean accuracy of `predict(x)` against `y`
    pub fn score(&self, x: &Array2<f64>, y: &Array1<L>) -> Result<f64> {
        if y.is_empty() {
            return Err(EnsembleError::InvalidInput("cannot score on empty target".to_string()));
        }
        if x.nrows() != y.len() {
            return Err(EnsembleError::ShapeError {
                expected: format!("{} target values (one per row)", x.nrows()),
                actual: y.len().to_string(),
            });
        }

        let predictions = self.predict(x)?;
        let correct = predictions.iter().zip(y.iter()).filter(|(p, t)| p == t).count();
        Ok(correct as f64 / y.len() as f64)
    }

    /// Parameter introspection over the unfitted specifications.
    ///
    /// Shallow: `classifiers`, `vote` and `weights`. Deep: one entry per
    /// named classifier plus each of its deep parameters as `name__param`.
    pub fn get_params(&self, deep: bool) -> Params {
        let mut out = Params::new();

        if !deep {
            out.insert(
                "classifiers".to_string(),
                Value::Array(self.classifiers.iter().map(|clf| describe(clf.as_ref())).collect()),
            );
            out.insert("vote".to_string(), Value::String(self.config.vote.to_string()));
            out.insert(
                "weights".to_string(),
                match &self.config.weights {
                    Some(weights) => Value::Array(weights.iter().map(|&w| Value::from(w)).collect()),
                    None => Value::Null,
                },
            );
            return out;
        }

        for (name, clf) in self.named_classifiers() {
            out.insert(name.to_string(), describe(clf));
            for (key, value) in clf.get_params(true) {
                out.insert(format!("{}__{}", name, key), value);
            }
        }
        out
    }

    /// Update parameters; takes effect at the next fit.
    ///
    /// Accepts `vote`, `weights` and `{name}__{param}` for named members.
    /// Keys are applied to copies of the configuration and member
    /// specifications, so a rejected key leaves every parameter unchanged.
    pub fn set_params(&mut self, params: Params) -> Result<&mut Self> {
        let mut config = self.config.clone();
        let mut classifiers: Vec<Box<dyn Classifier>> =
            self.classifiers.iter().map(|clf| clf.clone_unfitted()).collect();

        for (key, value) in params {
            apply_param(&mut config, &self.names, &mut classifiers, &key, value)?;
        }

        self.config = config;
        self.classifiers = classifiers;
        Ok(self)
    }

    fn fitted_state(&self) -> Result<&FittedState<L>> {
        self.fitted.as_ref().ok_or(EnsembleError::ModelNotFitted)
    }

    fn validate(&self) -> Result<()> {
        if self.classifiers.is_empty() {
            return Err(EnsembleError::InvalidParameter {
                name: "classifiers".to_string(),
                value: "[]".to_string(),
                reason: "at least one classifier is required".to_string(),
            });
        }

        if let Some(weights) = &self.config.weights {
            if weights.len() != self.classifiers.len() {
                return Err(EnsembleError::WeightCountMismatch {
                    expected: self.classifiers.len(),
                    actual: weights.len(),
                });
            }
            if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
                return Err(EnsembleError::InvalidParameter {
                    name: "weights".to_string(),
                    value: bad.to_string(),
                    reason: "weights must be finite and non-negative".to_string(),
                });
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(EnsembleError::InvalidParameter {
                    name: "weights".to_string(),
                    value: format!("{:?}", weights),
                    reason: "weights must not sum to zero".to_string(),
                });
            }
        }

        if self.config.vote == VoteMode::Probability {
            if let Some((name, _)) = self.named_classifiers().find(|(_, clf)| !clf.supports_proba()) {
                return Err(EnsembleError::CapabilityError {
                    classifier: name.to_string(),
                });
            }
        }

        Ok(())
    }

    fn effective_weights(&self) -> Vec<f64> {
        self.config
            .weights
            .clone()
            .unwrap_or_else(|| vec![1.0; self.classifiers.len()])
    }

    fn hard_vote(&self, state: &FittedState<L>, x: &Array2<f64>) -> Result<Array1<usize>> {
        let n_samples = x.nrows();
        let n_classes = state.encoder.n_classes();

        let votes = state
            .classifiers
            .iter()
            .zip(&self.names)
            .map(|(clf, name)| {
                let pred = clf.predict(x)?;
                if pred.len() != n_samples {
                    return Err(EnsembleError::ShapeError {
                        expected: format!("{} predictions from '{}'", n_samples, name),
                        actual: pred.len().to_string(),
                    });
                }
                Ok(pred)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = Array1::zeros(n_samples);
        let mut counts = vec![0.0; n_classes];

        for i in 0..n_samples {
            counts.iter_mut().for_each(|c| *c = 0.0);

            for (pred, &weight) in votes.iter().zip(&state.weights) {
                let class = pred[i];
                if class >= n_classes {
                    return Err(EnsembleError::UnknownClass { code: class, n_classes });
                }
                counts[class] += weight;
            }

            result[i] = argmax(counts.iter().copied());
        }

        Ok(result)
    }
}

impl Classifier for VotingClassifier<usize> {
    fn name(&self) -> &str {
        "VotingClassifier"
    }

    fn clone_unfitted(&self) -> Box<dyn Classifier> {
        let classifiers = self.classifiers.iter().map(|clf| clf.clone_unfitted()).collect();
        Box::new(VotingClassifier::<usize>::with_config(classifiers, self.config.clone()))
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        VotingClassifier::fit(self, x, y).map(|_| ())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        VotingClassifier::predict(self, x)
    }

    fn supports_proba(&self) -> bool {
        self.classifiers.iter().all(|clf| clf.supports_proba())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        VotingClassifier::predict_proba(self, x)
    }

    fn get_params(&self, deep: bool) -> Params {
        VotingClassifier::get_params(self, deep)
    }

    fn set_param(&mut self, key: &str, value: Value) -> Result<()> {
        self.set_params(Params::from([(key.to_string(), value)]))
            .map(|_| ())
    }
}

fn apply_param(
    config: &mut VotingConfig,
    names: &[String],
    classifiers: &mut [Box<dyn Classifier>],
    key: &str,
    value: Value,
) -> Result<()> {
    match key {
        "vote" => {
            config.vote = value
                .as_str()
                .ok_or_else(|| invalid_param("vote", &value, "expected a string"))?
                .parse()?;
        }
        "weights" => {
            config.weights = match value {
                Value::Null => None,
                Value::Array(items) => Some(
                    items
                        .iter()
                        .map(|item| {
                            item.as_f64()
                                .ok_or_else(|| invalid_param("weights", item, "expected a number"))
                        })
                        .collect::<Result<Vec<_>>>()?,
                ),
                other => return Err(invalid_param("weights", &other, "expected null or an array")),
            };
        }
        _ => {
            let (name, nested) = key
                .split_once("__")
                .ok_or_else(|| invalid_param(key, &value, "unknown parameter"))?;
            let idx = names
                .iter()
                .position(|n| n == name)
                .ok_or_else(|| invalid_param(key, &value, "no classifier with that name"))?;
            classifiers[idx].set_param(nested, value)?;
        }
    }
    Ok(())
}

/// Index of the first maximum
fn argmax(values: impl IntoIterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, v) in values.into_iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

fn invalid_param(name: &str, value: &Value, reason: &str) -> EnsembleError {
    EnsembleError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
