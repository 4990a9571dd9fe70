//! Tree Ensemble Backend
//!
//! Evaluates a fitted random forest exported to JSON with the usual
//! parallel node arrays (`children_left`, `children_right`, `feature`,
//! `threshold`, `value`). A sample goes left when
//! `x[feature] <= threshold`. Each tree votes with its normalized leaf
//! distribution; the forest averages them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::classifier::{check_width, HazardClassifier, HazardLabel};
use crate::error::{HazardError, Result};
use crate::logic::features::FeatureVector;

/// Marker for "no child" in the node arrays
pub const LEAF: i64 = -1;

/// One decision tree in array form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArrays {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights, `[safe, hazardous]`
    pub value: Vec<Vec<f64>>,
}

/// On-disk forest artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub n_features: usize,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    pub trees: Vec<TreeArrays>,
}

fn default_model_type() -> String {
    "random_forest".to_string()
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf([f64; 2]),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_arrays(index: usize, arrays: &TreeArrays, n_features: usize) -> Result<Self> {
        let n = arrays.children_left.len();
        let corrupt = |msg: String| HazardError::artifact(format!("tree {}: {}", index, msg));

        if n == 0 {
            return Err(corrupt("no nodes".to_string()));
        }
        if arrays.children_right.len() != n
            || arrays.feature.len() != n
            || arrays.threshold.len() != n
            || arrays.value.len() != n
        {
            return Err(corrupt("node arrays differ in length".to_string()));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (arrays.children_left[i], arrays.children_right[i]);

            if left == LEAF && right == LEAF {
                let dist = normalize_leaf(&arrays.value[i])
                    .map_err(|e| corrupt(format!("node {}: {}", i, e)))?;
                nodes.push(Node::Leaf(dist));
                continue;
            }

            // Children always come after their parent; guarantees traversal ends
            let child = |c: i64| -> Result<usize> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| corrupt(format!("node {} has invalid child {}", i, c)))
            };
            let feature = usize::try_from(arrays.feature[i])
                .ok()
                .filter(|&f| f < n_features)
                .ok_or_else(|| corrupt(format!("node {} splits on feature {}", i, arrays.feature[i])))?;
            let threshold = arrays.threshold[i];
            if !threshold.is_finite() {
                return Err(corrupt(format!("node {} has non-finite threshold", i)));
            }

            nodes.push(Node::Split {
                feature,
                threshold,
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_distribution(&self, x: &[f32]) -> [f64; 2] {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(dist) => return dist,
                Node::Split { feature, threshold, left, right } => {
                    idx = if f64::from(x[feature]) <= threshold { left } else { right };
                }
            }
        }
    }
}

fn normalize_leaf(value: &[f64]) -> std::result::Result<[f64; 2], String> {
    if value.len() != 2 {
        return Err(format!("leaf has {} class weights, expected 2", value.len()));
    }
    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err("leaf has negative or non-finite weights".to_string());
    }
    let total = value[0] + value[1];
    if total <= 0.0 {
        return Err("leaf weights sum to zero".to_string());
    }
    Ok([value[0] / total, value[1] / total])
}

/// Random forest classifier evaluated natively
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    n_features: usize,
    trees: Vec<Tree>,
}

impl ForestClassifier {
    pub fn from_artifact(artifact: &ForestArtifact) -> Result<Self> {
        if artifact.classes != [0, 1] {
            return Err(HazardError::artifact(format!(
                "expected binary classes [0, 1], found {:?}",
                artifact.classes
            )));
        }
        if artifact.trees.is_empty() {
            return Err(HazardError::artifact("forest has no trees"));
        }
        if artifact.n_features == 0 {
            return Err(HazardError::artifact("forest declares zero features"));
        }

        let trees = artifact
            .trees
            .iter()
            .enumerate()
            .map(|(i, t)| Tree::from_arrays(i, t, artifact.n_features))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            n_features: artifact.n_features,
            trees,
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ForestArtifact = serde_json::from_str(json)
            .map_err(|e| HazardError::artifact(format!("corrupt forest artifact: {}", e)))?;
        Self::from_artifact(&artifact)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HazardError::artifact(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl HazardClassifier for ForestClassifier {
    fn predict(&self, vector: &FeatureVector) -> Result<HazardLabel> {
        let [safe, hazardous] = self.predict_proba(vector)?;
        // argmax, ties go to the first class
        Ok(if hazardous > safe { HazardLabel::Hazardous } else { HazardLabel::Safe })
    }

    fn predict_proba(&self, vector: &FeatureVector) -> Result<[f64; 2]> {
        check_width(self, vector)?;
        let x = vector.as_slice();

        let mut sum = [0.0f64; 2];
        for tree in &self.trees {
            let dist = tree.leaf_distribution(x);
            sum[0] += dist[0];
            sum[1] += dist[1];
        }

        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn backend(&self) -> &'static str {
        "forest"
    }

    fn infer(&self, vector: &FeatureVector) -> Result<(HazardLabel, [f64; 2])> {
        let proba = self.predict_proba(vector)?;
        let label = if proba[1] > proba[0] { HazardLabel::Hazardous } else { HazardLabel::Safe };
        Ok((label, proba))
    }
}
