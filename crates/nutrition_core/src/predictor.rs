//! Nutrient requirement prediction
//!
//! Scales the four raw inputs with the bundle's feature scaler, runs one
//! forest per target and maps each output back through that target's scaler.

use crate::bundle::ModelBundle;
use crate::cattle::{CattleCategory, CattleInfo};
use crate::errors::{NutritionError, Result};
use crate::prediction::{NutrientTarget, NutritionPrediction};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};

/// Number of model inputs: type, target weight, body weight, ADG
pub const FEATURE_COUNT: usize = 4;

/// Read-only predictor over a shared model bundle
#[derive(Debug, Clone)]
pub struct NutritionPredictor {
    bundle: Arc<ModelBundle>,
}

impl NutritionPredictor {
    /// Wrap a bundle, checking it takes the four expected inputs
    pub fn new(bundle: Arc<ModelBundle>) -> Result<Self> {
        let n = bundle.feature_columns().len();
        if n != FEATURE_COUNT {
            return Err(NutritionError::DimensionMismatch {
                context: "bundle feature_columns".into(),
                expected: FEATURE_COUNT,
                actual: n,
            });
        }
        Ok(Self { bundle })
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    /// Predict from a category name; unknown names are treated as
    /// Growing Yearlings.
    pub fn predict_named(
        &self,
        category: &str,
        target_weight: f64,
        body_weight: f64,
        average_daily_gain: f64,
    ) -> NutritionPrediction {
        self.predict(&CattleInfo {
            category: CattleCategory::from_name_or_default(category),
            target_weight,
            body_weight,
            average_daily_gain,
        })
    }

    /// Predict all thirteen requirements for one animal
    ///
    /// A target that cannot be evaluated reports `0.0` and is logged; the
    /// remaining targets are still returned.
    pub fn predict(&self, info: &CattleInfo) -> NutritionPrediction {
        let raw = info.feature_vector();
        let scaled = self.bundle.feature_scaler().transform(&raw);
        debug!(?raw, ?scaled, "Predicting nutrient requirements");

        NutritionPrediction::from_fn(|target| match self.predict_target(target, &scaled) {
            Ok(value) => value,
            Err(err) => {
                warn!("Falling back to 0.0 for '{}': {}", target, err);
                0.0
            }
        })
    }

    /// Predict many animals in parallel; output order matches input order
    pub fn predict_batch(&self, infos: &[CattleInfo]) -> Vec<NutritionPrediction> {
        infos.par_iter().map(|info| self.predict(info)).collect()
    }

    fn predict_target(&self, target: NutrientTarget, scaled: &[f64]) -> Result<f64> {
        let name = target.column_name();
        let model = self
            .bundle
            .target(name)
            .ok_or_else(|| NutritionError::MissingTargetData {
                target: name.to_string(),
                section: "models",
            })?;
        model.predict(scaled)
    }
}
