//! Random forest up-move model over `smartcore`.
//!
//! Rows are feature vectors and labels are `true` for an up move. The
//! forest is seeded, so the same rows and parameters always grow the same
//! trees. A training set with a single class needs no trees and predicts
//! that class.

use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fmt;

type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

const UP: i32 = 1;
const DOWN: i32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForestParams {
    pub n_trees: u16,
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 6,
            min_samples_leaf: 5,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn to_smartcore(self) -> RandomForestClassifierParameters {
        RandomForestClassifierParameters::default()
            .with_n_trees(self.n_trees)
            .with_max_depth(self.max_depth)
            .with_min_samples_leaf(self.min_samples_leaf)
            .with_min_samples_split(2)
            .with_seed(self.seed)
    }
}

enum Fitted {
    Forest(Box<Forest>),
    Constant(bool),
}

pub struct ForestModel {
    fitted: Fitted,
    n_features: usize,
    n_samples: usize,
    up_share: f64,
}

impl fmt::Debug for ForestModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForestModel")
            .field("constant", &matches!(self.fitted, Fitted::Constant(_)))
            .field("n_features", &self.n_features)
            .field("n_samples", &self.n_samples)
            .field("up_share", &self.up_share)
            .finish_non_exhaustive()
    }
}

impl ForestModel {
    pub fn fit(
        rows: Vec<Vec<f64>>,
        labels: &[bool],
        params: &ForestParams,
    ) -> Result<Self, String> {
        if rows.is_empty() {
            return Err("no training rows".to_string());
        }
        if rows.len() != labels.len() {
            return Err(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            ));
        }
        let n_features = rows[0].len();
        let ups = labels.iter().filter(|&&up| up).count();
        let fitted = if ups == 0 || ups == labels.len() {
            Fitted::Constant(ups > 0)
        } else {
            let x = DenseMatrix::from_2d_vec(&rows).map_err(|e| e.to_string())?;
            let y: Vec<i32> = labels.iter().map(|&up| if up { UP } else { DOWN }).collect();
            let forest =
                Forest::fit(&x, &y, params.to_smartcore()).map_err(|e| e.to_string())?;
            Fitted::Forest(Box::new(forest))
        };

        Ok(Self {
            fitted,
            n_features,
            n_samples: rows.len(),
            up_share: ups as f64 / rows.len() as f64,
        })
    }

    /// Predict an up move for each row.
    pub fn predict(&self, rows: Vec<Vec<f64>>) -> Result<Vec<bool>, String> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(row) = rows.iter().find(|r| r.len() != self.n_features) {
            return Err(format!(
                "expected {} features, got {}",
                self.n_features,
                row.len()
            ));
        }
        match &self.fitted {
            Fitted::Constant(up) => Ok(vec![*up; rows.len()]),
            Fitted::Forest(forest) => {
                let x = DenseMatrix::from_2d_vec(&rows).map_err(|e| e.to_string())?;
                let predicted = forest.predict(&x).map_err(|e| e.to_string())?;
                Ok(predicted.into_iter().map(|label| label == UP).collect())
            }
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Fraction of training rows labelled as up moves.
    pub fn up_share(&self) -> f64 {
        self.up_share
    }
}
