//! Standard-score scaling of feature and target vectors
//!
//! Parameters come straight from the exported model file. A scaler whose
//! `mean` or `scale` is null behaves as the identity transform.

use crate::errors::{NutritionError, Result};
use serde::{Deserialize, Serialize};

/// Stored standardization parameters for one vector space
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    #[serde(default)]
    mean: Option<Vec<f64>>,
    #[serde(default)]
    scale: Option<Vec<f64>>,
    /// Variance, kept for diagnostics only
    #[serde(default)]
    var: Option<Vec<f64>>,
    #[serde(default)]
    n_features_in: Option<usize>,
}

impl StandardScaler {
    /// Create a scaler from explicit parameters
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        let n = mean.len();
        Self {
            mean: Some(mean),
            scale: Some(scale),
            var: None,
            n_features_in: Some(n),
        }
    }

    /// Scaler that passes values through unchanged
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn mean(&self) -> Option<&[f64]> {
        self.mean.as_deref()
    }

    pub fn scale(&self) -> Option<&[f64]> {
        self.scale.as_deref()
    }

    /// Whether both parameter vectors are present
    pub fn is_active(&self) -> bool {
        self.mean.is_some() && self.scale.is_some()
    }

    /// Check the parameters against the dimensionality they scale
    pub fn validate(&self, context: &str, expected_len: usize) -> Result<()> {
        let check = |name: &str, values: &Option<Vec<f64>>| -> Result<()> {
            match values {
                Some(v) if v.len() != expected_len => Err(NutritionError::DimensionMismatch {
                    context: format!("{context} {name}"),
                    expected: expected_len,
                    actual: v.len(),
                }),
                _ => Ok(()),
            }
        };
        check("mean", &self.mean)?;
        check("scale", &self.scale)?;
        check("var", &self.var)?;

        if let Some(n) = self.n_features_in {
            if n != expected_len {
                return Err(NutritionError::DimensionMismatch {
                    context: format!("{context} n_features_in"),
                    expected: expected_len,
                    actual: n,
                });
            }
        }

        if let Some(mean) = &self.mean {
            if let Some(i) = mean.iter().position(|m| !m.is_finite()) {
                return Err(NutritionError::MalformedModel(format!(
                    "{context} mean[{i}] is not finite"
                )));
            }
        }
        if let Some(scale) = &self.scale {
            if let Some(i) = scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
                return Err(NutritionError::MalformedModel(format!(
                    "{context} scale[{i}] must be finite and non-zero, found {}",
                    scale[i]
                )));
            }
        }
        Ok(())
    }

    /// Standardize `x` elementwise: `(x - mean) / scale`
    ///
    /// # Panics
    /// Panics if `x` does not have the scaler's dimensionality. Bundles are
    /// validated at load time, so this only fires on caller error.
    pub fn transform(&self, x: &[f64]) -> Vec<f64> {
        match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) => {
                assert_dimension(x, mean, scale);
                x.iter()
                    .zip(mean.iter().zip(scale))
                    .map(|(v, (m, s))| (v - m) / s)
                    .collect()
            }
            _ => x.to_vec(),
        }
    }

    /// Undo [`transform`](Self::transform): `x * scale + mean`
    ///
    /// # Panics
    /// Same contract as [`transform`](Self::transform).
    pub fn inverse_transform(&self, x: &[f64]) -> Vec<f64> {
        match (&self.mean, &self.scale) {
            (Some(mean), Some(scale)) => {
                assert_dimension(x, mean, scale);
                x.iter()
                    .zip(mean.iter().zip(scale))
                    .map(|(v, (m, s))| v * s + m)
                    .collect()
            }
            _ => x.to_vec(),
        }
    }

    /// Inverse transform of a single-output target value
    pub fn inverse_transform_scalar(&self, value: f64) -> f64 {
        self.inverse_transform(&[value])[0]
    }
}

fn assert_dimension(x: &[f64], mean: &[f64], scale: &[f64]) {
    assert!(
        x.len() == mean.len() && x.len() == scale.len(),
        "scaler dimension mismatch: input has {} values, scaler has mean {} / scale {}",
        x.len(),
        mean.len(),
        scale.len()
    );
}
