//! Base classifier contract
//!
//! The ensemble does not implement any learning algorithm itself; it drives
//! any type implementing [`Classifier`].

mod models;

pub use models::{describe, Classifier, Params};
