//! Label encoding between arbitrary ordered labels and dense class indices

use crate::error::{EnsembleError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Maps labels to `0..n_classes` in ascending label order and back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder<L> {
    classes: Vec<L>,
}

impl<L> LabelEncoder<L>
where
    L: Ord + Clone + Debug,
{
    /// Build an encoder from the distinct values in `y`
    pub fn fit<'a, I>(y: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a L>,
        L: 'a,
    {
        let mut classes: Vec<L> = y.into_iter().cloned().collect();
        classes.sort();
        classes.dedup();

        if classes.is_empty() {
            return Err(EnsembleError::InvalidInput(
                "cannot fit label encoder on empty target".to_string(),
            ));
        }

        Ok(Self { classes })
    }

    /// Distinct labels, index = encoded value
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Number of distinct labels
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Class index of a single label
    pub fn encode(&self, label: &L) -> Result<usize> {
        self.classes
            .binary_search(label)
            .map_err(|_| EnsembleError::UnknownLabel(format!("{:?}", label)))
    }

    /// Label for a single class index
    pub fn decode(&self, code: usize) -> Result<L> {
        self.classes
            .get(code)
            .cloned()
            .ok_or(EnsembleError::UnknownClass {
                code,
                n_classes: self.classes.len(),
            })
    }

    /// Encode a sequence of labels
    pub fn transform<'a, I>(&self, y: I) -> Result<Array1<usize>>
    where
        I: IntoIterator<Item = &'a L>,
        L: 'a,
    {
        y.into_iter()
            .map(|label| self.encode(label))
            .collect::<Result<Vec<_>>>()
            .map(Array1::from_vec)
    }

    /// Decode a sequence of class indices back to labels
    pub fn inverse_transform(&self, codes: &Array1<usize>) -> Result<Array1<L>> {
        codes
            .iter()
            .map(|&code| self.decode(code))
            .collect::<Result<Vec<_>>>()
            .map(Array1::from_vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_classes_sorted_and_distinct() {
        let y = array!["spam", "ham", "spam", "eggs"];
        let encoder = LabelEncoder::fit(y.iter()).unwrap();

        assert_eq!(encoder.classes(), &["eggs", "ham", "spam"]);
        assert_eq!(encoder.n_classes(), 3);
    }

    #[test]
    fn test_transform_and_inverse() {
        let y = array![30, 10, 20, 10];
        let encoder = LabelEncoder::fit(y.iter()).unwrap();

        let codes = encoder.transform(y.iter()).unwrap();
        assert_eq!(codes, array![2, 0, 1, 0]);

        let labels = encoder.inverse_transform(&codes).unwrap();
        assert_eq!(labels, y);

        for class in encoder.classes() {
            let code = encoder.encode(class).unwrap();
            assert_eq!(&encoder.decode(code).unwrap(), class);
        }
    }

    #[test]
    fn test_unknown_values() {
        let y = array![1, 2];
        let encoder = LabelEncoder::fit(y.iter()).unwrap();

        assert!(matches!(
            encoder.encode(&7),
            Err(EnsembleError::UnknownLabel(_))
        ));
        assert!(matches!(
            encoder.decode(2),
            Err(EnsembleError::UnknownClass { code: 2, n_classes: 2 })
        ));
    }

    #[test]
    fn test_empty_target() {
        let y: Vec<i32> = Vec::new();
        assert!(LabelEncoder::fit(y.iter()).is_err());
    }
}
