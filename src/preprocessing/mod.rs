//! Target preprocessing

mod encoder;

pub use encoder::LabelEncoder;
