//! Shared test doubles for integration tests

#![allow(dead_code)]

use majority_vote::prelude::*;
use ndarray::{array, Array1, Array2};
use serde_json::{json, Value};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "majority_vote=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// Nine rows on one feature: 0-2 "low", 3-5 "mid", 6-8 "high"
pub fn banded_data() -> (Array2<f64>, Array1<&'static str>) {
    let x = Array2::from_shape_fn((9, 1), |(i, _)| i as f64);
    let y = array!["low", "low", "low", "mid", "mid", "mid", "high", "high", "high"];
    (x, y)
}

/// Splits feature 0 into three regions and predicts each region's
/// majority class; probabilities are the region's class frequencies.
#[derive(Debug, Clone)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
    regions: Option<[Vec<f64>; 3]>,
}

impl Band {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            regions: None,
        }
    }

    fn region(&self, value: f64) -> usize {
        if value <= self.lower {
            0
        } else if value <= self.upper {
            1
        } else {
            2
        }
    }

    fn distributions(&self) -> Result<&[Vec<f64>; 3]> {
        self.regions.as_ref().ok_or(EnsembleError::ModelNotFitted)
    }
}

impl Classifier for Band {
    fn name(&self) -> &str {
        "Band"
    }

    fn clone_unfitted(&self) -> Box<dyn Classifier> {
        Box::new(Band::new(self.lower, self.upper))
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        let n_classes = y.iter().max().map(|m| m + 1).unwrap_or(0);
        let mut counts = [vec![0.0; n_classes], vec![0.0; n_classes], vec![0.0; n_classes]];
        for (row, &class) in x.rows().into_iter().zip(y.iter()) {
            counts[self.region(row[0])][class] += 1.0;
        }
        for dist in counts.iter_mut() {
            let total: f64 = dist.iter().sum();
            if total > 0.0 {
                dist.iter_mut().for_each(|c| *c /= total);
            } else {
                dist.iter_mut().for_each(|c| *c = 1.0 / n_classes as f64);
            }
        }
        self.regions = Some(counts);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (i, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = i;
                    }
                }
                best
            })
            .collect())
    }

    fn supports_proba(&self) -> bool {
        true
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let regions = self.distributions()?;
        let n_classes = regions[0].len();
        Ok(Array2::from_shape_fn((x.nrows(), n_classes), |(i, c)| {
            regions[self.region(x[[i, 0]])][c]
        }))
    }

    fn get_params(&self, _deep: bool) -> Params {
        Params::from([
            ("lower".to_string(), json!(self.lower)),
            ("upper".to_string(), json!(self.upper)),
        ])
    }

    fn set_param(&mut self, key: &str, value: Value) -> Result<()> {
        let number = value.as_f64().ok_or_else(|| EnsembleError::InvalidParameter {
            name: key.to_string(),
            value: value.to_string(),
            reason: "expected a number".to_string(),
        })?;
        match key {
            "lower" => self.lower = number,
            "upper" => self.upper = number,
            _ => {
                return Err(EnsembleError::InvalidParameter {
                    name: key.to_string(),
                    value: value.to_string(),
                    reason: "not a parameter of Band".to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Always predicts the most frequent training class; no probabilities
#[derive(Debug, Clone, Default)]
pub struct Majority {
    class: Option<usize>,
}

impl Classifier for Majority {
    fn name(&self) -> &str {
        "Majority"
    }

    fn clone_unfitted(&self) -> Box<dyn Classifier> {
        Box::new(Majority::default())
    }

    fn fit(&mut self, _x: &Array2<f64>, y: &Array1<usize>) -> Result<()> {
        let n_classes = y.iter().max().map(|m| m + 1).unwrap_or(0);
        let mut counts = vec![0usize; n_classes];
        y.iter().for_each(|&c| counts[c] += 1);
        let mut best = 0;
        for (class, &count) in counts.iter().enumerate() {
            if count > counts[best] {
                best = class;
            }
        }
        self.class = Some(best);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let class = self.class.ok_or(EnsembleError::ModelNotFitted)?;
        Ok(Array1::from_elem(x.nrows(), class))
    }
}

/// Fails every fit
#[derive(Debug, Clone, Default)]
pub struct Broken;

impl Classifier for Broken {
    fn name(&self) -> &str {
        "Broken"
    }

    fn clone_unfitted(&self) -> Box<dyn Classifier> {
        Box::new(Broken)
    }

    fn fit(&mut self, _x: &Array2<f64>, _y: &Array1<usize>) -> Result<()> {
        Err(EnsembleError::InvalidInput("solver diverged".to_string()))
    }

    fn predict(&self, _x: &Array2<f64>) -> Result<Array1<usize>> {
        Err(EnsembleError::ModelNotFitted)
    }
}
