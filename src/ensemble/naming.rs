//! Unique names for ensemble members

use crate::training::Classifier;
use std::collections::{HashMap, HashSet};

/// Name each classifier after its lower-cased kind. Kinds that occur more
/// than once get `-1`, `-2`, ... suffixes in order of appearance. A name
/// that still clashes with an earlier one (a kind literally called `a-1`
/// next to two `A`s) gets a further `-N` suffix, so names are always unique.
pub fn name_classifiers(classifiers: &[Box<dyn Classifier>]) -> Vec<String> {
    let kinds: Vec<String> = classifiers
        .iter()
        .map(|clf| clf.name().to_lowercase())
        .collect();

    let mut totals: HashMap<&str, usize> = HashMap::new();
    for kind in &kinds {
        *totals.entry(kind.as_str()).or_insert(0) += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut used: HashSet<String> = HashSet::new();
    kinds
        .iter()
        .map(|kind| {
            let mut name = if totals[kind.as_str()] == 1 {
                kind.clone()
            } else {
                let ordinal = seen.entry(kind.as_str()).or_insert(0);
                *ordinal += 1;
                format!("{}-{}", kind, ordinal)
            };

            if used.contains(&name) {
                let base = name.clone();
                let mut k = 2;
                while used.contains(&name) {
                    name = format!("{}-{}", base, k);
                    k += 1;
                }
            }
            used.insert(name.clone());
            name
        })
        .collect()
}
