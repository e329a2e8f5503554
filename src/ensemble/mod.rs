//! Ensemble methods module
//!
//! Provides the majority-vote ensemble classifier:
//! - Hard voting over predicted class labels
//! - Soft voting over averaged class probabilities
//! - Optional per-classifier weights

mod naming;
mod voting;

pub use naming::name_classifiers;
pub use voting::{VoteMode, VotingClassifier, VotingConfig};
