//! Model bundle loading and validation
//!
//! A bundle is the exported artifact of the training pipeline: feature and
//! target column names, one standard scaler for the features, one scaler and
//! one random forest per target. Loading is parse-and-validate only; callers
//! hand in the bytes (or a local path) and get back an immutable bundle, or a
//! descriptive error if any part is inconsistent.
//!
//! # Format
//!
//! ```json
//! {
//!   "feature_columns": ["type", "target_weight", "Body weight (lbs)", "ADG (lbs)"],
//!   "target_columns": ["DM Intake (lbs/day)", "..."],
//!   "scalers": {
//!     "features": {"mean": [..], "scale": [..], "var": [..], "n_features_in": 4},
//!     "targets": {"DM Intake (lbs/day)": {"mean": [..], "scale": [..]}}
//!   },
//!   "models": {
//!     "DM Intake (lbs/day)": {"n_estimators": 100, "n_features": 4, "n_outputs": 1, "trees": [..]}
//!   }
//! }
//! ```

use crate::errors::{NutritionError, Result};
use crate::forest::RandomForest;
use crate::prediction::NutrientTarget;
use crate::scaler::StandardScaler;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct RawScalers {
    #[serde(default)]
    features: Option<StandardScaler>,
    #[serde(default)]
    targets: BTreeMap<String, StandardScaler>,
}

#[derive(Debug, Deserialize)]
struct RawBundle {
    feature_columns: Vec<String>,
    target_columns: Vec<String>,
    scalers: RawScalers,
    #[serde(default)]
    models: BTreeMap<String, RandomForest>,
}

/// Forest and output scaler for one predicted column
#[derive(Debug, Clone, PartialEq)]
pub struct TargetModel {
    forest: RandomForest,
    scaler: StandardScaler,
}

impl TargetModel {
    pub fn new(forest: RandomForest, scaler: StandardScaler) -> Self {
        Self { forest, scaler }
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Forest output mapped back to the target's original units
    pub fn predict(&self, scaled_features: &[f64]) -> Result<f64> {
        let scaled = self.forest.predict(scaled_features)?;
        Ok(self.scaler.inverse_transform_scalar(scaled))
    }
}

/// Fully validated, read-only model artifact
#[derive(Debug, Clone)]
pub struct ModelBundle {
    feature_columns: Vec<String>,
    target_columns: Vec<String>,
    feature_scaler: StandardScaler,
    targets: BTreeMap<String, TargetModel>,
    fingerprint: Option<String>,
}

/// Human-oriented overview of a loaded bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleSummary {
    /// Version of the library that loaded the bundle
    pub version: String,
    pub fingerprint: Option<String>,
    pub feature_columns: Vec<String>,
    pub targets: Vec<TargetSummary>,
    pub total_trees: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetSummary {
    pub name: String,
    pub trees: usize,
    pub max_depth: usize,
    pub scaled_output: bool,
    /// False for columns that are not one of the reported nutrients
    pub reported: bool,
    /// Largest root sample count across the trees, when exported
    pub training_samples: Option<i64>,
}

impl ModelBundle {
    /// Parse a bundle from any byte stream
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_slice(&bytes)
    }

    /// Parse a bundle from an in-memory JSON document
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let fingerprint = hex::encode(blake3::hash(bytes).as_bytes());
        debug!("Parsing model bundle ({} bytes, blake3 {})", bytes.len(), fingerprint);

        let raw: RawBundle = serde_json::from_slice(bytes)?;
        let mut bundle = Self::assemble(raw)?;
        bundle.fingerprint = Some(fingerprint);

        info!(
            "Loaded model bundle: {} features, {} targets, {} trees (blake3 {})",
            bundle.feature_columns.len(),
            bundle.target_columns.len(),
            bundle.total_trees(),
            bundle.fingerprint.as_deref().unwrap_or("-")
        );
        Ok(bundle)
    }

    /// Read and parse a bundle from a local JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading model bundle from: {}", path.display());
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// Assemble a bundle from in-memory parts, applying the same checks as
    /// the JSON loader. Targets are given in column order.
    pub fn from_parts(
        feature_columns: Vec<String>,
        feature_scaler: StandardScaler,
        targets: Vec<(String, TargetModel)>,
    ) -> Result<Self> {
        let target_columns = targets.iter().map(|(name, _)| name.clone()).collect();
        let mut scalers = BTreeMap::new();
        let mut models = BTreeMap::new();
        for (name, model) in targets {
            scalers.insert(name.clone(), model.scaler);
            models.insert(name, model.forest);
        }

        Self::assemble(RawBundle {
            feature_columns,
            target_columns,
            scalers: RawScalers {
                features: Some(feature_scaler),
                targets: scalers,
            },
            models,
        })
    }

    fn assemble(raw: RawBundle) -> Result<Self> {
        let RawBundle {
            feature_columns,
            target_columns,
            scalers,
            mut models,
        } = raw;

        check_columns("feature_columns", &feature_columns)?;
        check_columns("target_columns", &target_columns)?;

        let feature_scaler = scalers.features.unwrap_or_default();
        feature_scaler.validate("feature scaler", feature_columns.len())?;

        let mut target_scalers = scalers.targets;
        let mut targets = BTreeMap::new();
        for name in &target_columns {
            let scaler = target_scalers
                .remove(name)
                .ok_or_else(|| NutritionError::MissingTargetData {
                    target: name.clone(),
                    section: "scalers.targets",
                })?;
            let forest = models
                .remove(name)
                .ok_or_else(|| NutritionError::MissingTargetData {
                    target: name.clone(),
                    section: "models",
                })?;

            scaler.validate(&format!("target scaler '{name}'"), 1)?;
            forest.validate(name, feature_columns.len())?;
            targets.insert(name.clone(), TargetModel { forest, scaler });
        }

        for extra in models.keys().chain(target_scalers.keys()) {
            warn!("Ignoring model data for undeclared target '{}'", extra);
        }

        let mut recognized = HashSet::new();
        for name in &target_columns {
            match NutrientTarget::from_column_name(name) {
                Some(target) => {
                    recognized.insert(target);
                }
                None => warn!("Target '{}' is not a reported nutrient; its model is never used", name),
            }
        }
        for target in NutrientTarget::ALL {
            if !recognized.contains(&target) {
                warn!(
                    "Bundle does not declare target '{}'; predictions will report 0.0 for it",
                    target
                );
            }
        }

        Ok(Self {
            feature_columns,
            target_columns,
            feature_scaler,
            targets,
            fingerprint: None,
        })
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn target_columns(&self) -> &[String] {
        &self.target_columns
    }

    pub fn feature_scaler(&self) -> &StandardScaler {
        &self.feature_scaler
    }

    pub fn target(&self, name: &str) -> Option<&TargetModel> {
        self.targets.get(name)
    }

    /// BLAKE3 hex digest of the bytes the bundle was parsed from
    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    pub fn total_trees(&self) -> usize {
        self.targets.values().map(|t| t.forest.trees().len()).sum()
    }

    pub fn summary(&self) -> BundleSummary {
        let targets = self
            .target_columns
            .iter()
            .filter_map(|name| self.targets.get(name).map(|t| (name, t)))
            .map(|(name, t)| TargetSummary {
                name: name.clone(),
                trees: t.forest.trees().len(),
                max_depth: t.forest.trees().iter().map(|tree| tree.depth()).max().unwrap_or(0),
                scaled_output: t.scaler.is_active(),
                reported: NutrientTarget::from_column_name(name).is_some(),
                training_samples: t
                    .forest
                    .trees()
                    .iter()
                    .filter_map(|tree| tree.node_samples(0))
                    .max(),
            })
            .collect();

        BundleSummary {
            version: crate::VERSION.to_string(),
            fingerprint: self.fingerprint.clone(),
            feature_columns: self.feature_columns.clone(),
            targets,
            total_trees: self.total_trees(),
        }
    }
}

fn check_columns(section: &str, columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        return Err(NutritionError::MalformedModel(format!("{section} is empty")));
    }
    let mut seen = HashSet::new();
    for name in columns {
        if !seen.insert(name.as_str()) {
            return Err(NutritionError::MalformedModel(format!(
                "{section} lists '{name}' more than once"
            )));
        }
    }
    Ok(())
}
