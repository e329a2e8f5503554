//! Majority-vote ensemble classifier
//!
//! Combines a fixed set of trainable classifiers into one consensus
//! prediction, either by hard label voting or by averaging class
//! probabilities, with optional per-classifier weights.
//!
//! # Modules
//!
//! - [`ensemble`] - The voting classifier and member naming
//! - [`training`] - The [`Classifier`](training::Classifier) capability trait
//! - [`preprocessing`] - Label encoding
//! - [`error`] - Error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use majority_vote::prelude::*;
//!
//! let mut ensemble = VotingClassifier::new(vec![Box::new(a), Box::new(b), Box::new(c)])
//!     .with_vote(VoteMode::Probability)
//!     .with_weights(vec![2.0, 1.0, 1.0]);
//! let labels = ensemble.fit(&x, &y)?.predict(&x)?;
//! ```

pub mod ensemble;
pub mod error;
pub mod preprocessing;
pub mod training;

pub use error::{EnsembleError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::ensemble::{VoteMode, VotingClassifier, VotingConfig};
    pub use crate::error::{EnsembleError, Result};
    pub use crate::preprocessing::LabelEncoder;
    pub use crate::training::{Classifier, Params};
}
