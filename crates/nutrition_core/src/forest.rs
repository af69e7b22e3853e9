//! Random-forest regressor: the mean of independently evaluated trees

use crate::errors::{NutritionError, Result};
use crate::tree::RegressionTree;
use serde::Deserialize;
use tracing::warn;

/// Trees plus the metadata exported alongside them
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RandomForest {
    #[serde(default)]
    n_estimators: usize,
    trees: Vec<RegressionTree>,
    #[serde(default)]
    n_features: usize,
    #[serde(default = "default_outputs")]
    n_outputs: usize,
}

fn default_outputs() -> usize {
    1
}

impl RandomForest {
    pub fn new(trees: Vec<RegressionTree>, n_features: usize) -> Self {
        Self {
            n_estimators: trees.len(),
            trees,
            n_features,
            n_outputs: 1,
        }
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    /// Check the forest can be evaluated on `feature_count` features
    pub fn validate(&self, name: &str, feature_count: usize) -> Result<()> {
        if self.trees.is_empty() {
            return Err(NutritionError::MalformedModel(format!(
                "forest '{name}' has no trees"
            )));
        }

        if self.n_estimators != self.trees.len() {
            warn!(
                "Forest '{}' declares {} estimators but contains {} trees; using the trees",
                name,
                self.n_estimators,
                self.trees.len()
            );
        }

        if self.n_outputs != 1 {
            return Err(NutritionError::MalformedModel(format!(
                "forest '{name}' has {} outputs, expected a single-output regressor",
                self.n_outputs
            )));
        }

        if self.n_features != 0 && self.n_features != feature_count {
            return Err(NutritionError::DimensionMismatch {
                context: format!("forest '{name}' n_features"),
                expected: feature_count,
                actual: self.n_features,
            });
        }

        for (t_idx, tree) in self.trees.iter().enumerate() {
            if let Some(max_idx) = tree.max_feature_index() {
                if max_idx >= feature_count {
                    return Err(NutritionError::MalformedModel(format!(
                        "forest '{name}' tree {t_idx} splits on feature {max_idx}, \
                         but only {feature_count} features exist"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Average of every tree's leaf value for `features`
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(NutritionError::MalformedModel("forest has no trees".into()));
        }

        // Running mean: agreeing trees reproduce their shared value exactly.
        let mut mean = 0.0;
        for (k, tree) in self.trees.iter().enumerate() {
            let value = tree.predict(features)?;
            mean += (value - mean) / (k + 1) as f64;
        }
        Ok(mean)
    }
}
