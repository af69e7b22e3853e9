//! Binary regression trees stored as parallel node arrays
//!
//! Layout follows the exported scikit-learn tree structure:
//! - node 0 is the root
//! - `children_left[i] == children_right[i] == -1` marks a leaf
//! - `feature[i]` / `threshold[i]` are meaningful only on split nodes
//! - `value[i]` is meaningful only on leaves
//!
//! Structure is validated when a tree is built or deserialized, so a loaded
//! tree is always a strict tree with in-range child references.

use crate::errors::{NutritionError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Child index marking "no child"
pub const TREE_LEAF: i64 = -1;

fn deserialize_leaf_values<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let raw = Vec::<Value>::deserialize(deserializer)?;
    raw.iter()
        .enumerate()
        .map(|(i, v)| {
            first_scalar(v)
                .ok_or_else(|| D::Error::custom(format!("value[{i}] is not numeric: {v}")))
        })
        .collect()
}

// sklearn exports `value` as [n_nodes][n_outputs][1]; single-output forests
// only need the first scalar of each entry.
fn first_scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Number(num) => num.as_f64(),
        Value::Array(items) => items.first().and_then(first_scalar),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct RawTree {
    n_nodes: usize,
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    #[serde(deserialize_with = "deserialize_leaf_values")]
    value: Vec<f64>,
    #[serde(default)]
    n_node_samples: Vec<i64>,
}

/// One immutable regression tree
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTree")]
pub struct RegressionTree {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<f64>,
    n_node_samples: Vec<i64>,
}

impl TryFrom<RawTree> for RegressionTree {
    type Error = NutritionError;

    fn try_from(raw: RawTree) -> Result<Self> {
        let n = raw.n_nodes;
        if n == 0 {
            return Err(NutritionError::MalformedModel("tree has no nodes".into()));
        }

        let lengths = [
            ("children_left", raw.children_left.len()),
            ("children_right", raw.children_right.len()),
            ("feature", raw.feature.len()),
            ("threshold", raw.threshold.len()),
            ("value", raw.value.len()),
        ];
        for (name, len) in lengths {
            if len != n {
                return Err(NutritionError::DimensionMismatch {
                    context: format!("tree {name}"),
                    expected: n,
                    actual: len,
                });
            }
        }
        if !raw.n_node_samples.is_empty() && raw.n_node_samples.len() != n {
            return Err(NutritionError::DimensionMismatch {
                context: "tree n_node_samples".into(),
                expected: n,
                actual: raw.n_node_samples.len(),
            });
        }

        let tree = Self {
            children_left: raw.children_left,
            children_right: raw.children_right,
            feature: raw.feature,
            threshold: raw.threshold,
            value: raw.value,
            n_node_samples: raw.n_node_samples,
        };
        tree.check_nodes()?;
        tree.check_strict_tree()?;
        Ok(tree)
    }
}

impl RegressionTree {
    /// Build a tree from parallel arrays, validating its structure
    pub fn new(
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        value: Vec<f64>,
    ) -> Result<Self> {
        Self::try_from(RawTree {
            n_nodes: children_left.len(),
            children_left,
            children_right,
            feature,
            threshold,
            value,
            n_node_samples: Vec::new(),
        })
    }

    /// A root-only tree that always predicts `value`
    pub fn leaf(value: f64) -> Self {
        Self {
            children_left: vec![TREE_LEAF],
            children_right: vec![TREE_LEAF],
            feature: vec![TREE_LEAF],
            threshold: vec![0.0],
            value: vec![value],
            n_node_samples: Vec::new(),
        }
    }

    /// A single split: `features[feature] <= threshold` → `left`, else `right`
    pub fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Self {
        Self {
            children_left: vec![1, TREE_LEAF, TREE_LEAF],
            children_right: vec![2, TREE_LEAF, TREE_LEAF],
            feature: vec![feature as i64, TREE_LEAF, TREE_LEAF],
            threshold: vec![threshold, 0.0, 0.0],
            value: vec![0.0, left, right],
            n_node_samples: Vec::new(),
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.children_left.len()
    }

    pub fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == TREE_LEAF && self.children_right[node] == TREE_LEAF
    }

    /// Number of training samples that reached `node`, if exported
    pub fn node_samples(&self, node: usize) -> Option<i64> {
        self.n_node_samples.get(node).copied()
    }

    /// Largest feature index referenced by any split node
    pub fn max_feature_index(&self) -> Option<usize> {
        (0..self.n_nodes())
            .filter(|&i| !self.is_leaf(i))
            .map(|i| self.feature[i] as usize)
            .max()
    }

    /// Length of the longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if !self.is_leaf(node) {
                stack.push((self.children_left[node] as usize, depth + 1));
                stack.push((self.children_right[node] as usize, depth + 1));
            }
        }
        max_depth
    }

    /// Walk from the root to a leaf and return its value
    ///
    /// Splits send a sample left when `features[feature] <= threshold`. The
    /// feature is rounded to single precision first, as the trees were fit on
    /// `f32` inputs and their thresholds sit between `f32` values.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let mut node = 0usize;

        // A path can never be longer than the node count in a strict tree.
        for _ in 0..self.n_nodes() {
            if self.is_leaf(node) {
                return Ok(self.value[node]);
            }

            let feature_idx = self.feature[node] as usize;
            let feature_value =
                features
                    .get(feature_idx)
                    .ok_or_else(|| NutritionError::DimensionMismatch {
                        context: format!("feature vector at tree node {node}"),
                        expected: feature_idx + 1,
                        actual: features.len(),
                    })?;

            node = if f64::from(*feature_value as f32) <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        Err(NutritionError::MalformedModel(format!(
            "traversal did not reach a leaf within {} steps",
            self.n_nodes()
        )))
    }

    fn check_nodes(&self) -> Result<()> {
        let n = self.n_nodes() as i64;
        for i in 0..self.n_nodes() {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            match (left == TREE_LEAF, right == TREE_LEAF) {
                (true, true) => {
                    if !self.value[i].is_finite() {
                        return Err(NutritionError::MalformedModel(format!(
                            "leaf {i} has non-finite value {}",
                            self.value[i]
                        )));
                    }
                }
                (false, false) => {
                    if !(0..n).contains(&left) || !(0..n).contains(&right) {
                        return Err(NutritionError::MalformedModel(format!(
                            "node {i} has dangling child reference (left={left}, right={right}, n_nodes={n})"
                        )));
                    }
                    if self.feature[i] < 0 {
                        return Err(NutritionError::MalformedModel(format!(
                            "split node {i} has negative feature index {}",
                            self.feature[i]
                        )));
                    }
                    if self.threshold[i].is_nan() {
                        return Err(NutritionError::MalformedModel(format!(
                            "split node {i} has NaN threshold"
                        )));
                    }
                }
                _ => {
                    return Err(NutritionError::MalformedModel(format!(
                        "node {i} has exactly one child (left={left}, right={right})"
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_strict_tree(&self) -> Result<()> {
        let mut visited = vec![false; self.n_nodes()];
        let mut stack = vec![0usize];
        while let Some(node) = stack.pop() {
            if visited[node] {
                return Err(NutritionError::MalformedModel(format!(
                    "node {node} is reachable twice (cycle or shared subtree)"
                )));
            }
            visited[node] = true;
            if !self.is_leaf(node) {
                stack.push(self.children_left[node] as usize);
                stack.push(self.children_right[node] as usize);
            }
        }
        Ok(())
    }
}
