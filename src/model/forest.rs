use serde::Deserialize;

use crate::error::ModelError;
use crate::features::{FeatureInput, FeatureValue};
use crate::model::types::Predictor;

/// A node in a flattened regression tree.
///
/// Children are referenced by index into the owning tree's node array and
/// must come after their parent, so every walk terminates.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Numeric split: go left when `x[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Categorical split: go left when `x[feature] == equals`.
    Category {
        feature: usize,
        equals: String,
        left: usize,
        right: usize,
    },
    Leaf { value: f64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// How per-tree outputs are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    /// Bagged ensemble (random forest): average of tree outputs.
    #[default]
    Mean,
    /// Boosted ensemble: `base_score + Σ tree outputs`.
    Sum,
}

/// Ensemble of regression trees over named, ordered columns.
#[derive(Debug, Clone, Deserialize)]
pub struct ForestModel {
    pub columns: Vec<String>,
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub aggregate: Aggregate,
    #[serde(default)]
    pub base_score: f64,
}

impl ForestModel {
    /// Checks structural soundness after deserialization.
    ///
    /// # Errors
    ///
    /// `Malformed` on an empty ensemble, out-of-range feature or child
    /// index, or a child that does not follow its parent.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Malformed("forest has no trees".into()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Malformed(format!("tree {t} has no nodes")));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                let (feature, left, right) = match node {
                    TreeNode::Leaf { .. } => continue,
                    TreeNode::Split {
                        feature,
                        left,
                        right,
                        ..
                    }
                    | TreeNode::Category {
                        feature,
                        left,
                        right,
                        ..
                    } => (*feature, *left, *right),
                };
                if feature >= self.columns.len() {
                    return Err(ModelError::Malformed(format!(
                        "tree {t} node {i}: feature index {feature} out of range"
                    )));
                }
                for child in [left, right] {
                    if child <= i || child >= tree.nodes.len() {
                        return Err(ModelError::Malformed(format!(
                            "tree {t} node {i}: invalid child index {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Lines the input up with the trained columns.
    fn row<'a>(&self, input: &'a FeatureInput) -> Result<Vec<RowValue<'a>>, ModelError> {
        if input.len() != self.columns.len() {
            return Err(ModelError::FeatureMismatch(format!(
                "model expects {} features, got {}",
                self.columns.len(),
                input.len()
            )));
        }
        match input {
            FeatureInput::Positional(values) => {
                Ok(values.iter().map(|x| RowValue::Number(*x)).collect())
            }
            FeatureInput::Labeled(record) => self
                .columns
                .iter()
                .zip(record)
                .map(|(expected, (name, value))| {
                    if expected != name {
                        return Err(ModelError::FeatureMismatch(format!(
                            "expected column \"{expected}\", got \"{name}\""
                        )));
                    }
                    Ok(match value {
                        FeatureValue::Number(x) => RowValue::Number(*x),
                        FeatureValue::Category(s) => RowValue::Category(s),
                    })
                })
                .collect(),
        }
    }

    fn walk(&self, tree: &Tree, row: &[RowValue<'_>]) -> Result<f64, ModelError> {
        let mut idx = 0;
        loop {
            let node = tree
                .nodes
                .get(idx)
                .ok_or_else(|| ModelError::Malformed(format!("dangling node index {idx}")))?;
            idx = match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => match row.get(*feature) {
                    Some(RowValue::Number(x)) => {
                        if x <= threshold {
                            *left
                        } else {
                            *right
                        }
                    }
                    _ => return Err(self.type_mismatch(*feature, "numeric")),
                },
                TreeNode::Category {
                    feature,
                    equals,
                    left,
                    right,
                } => match row.get(*feature) {
                    Some(RowValue::Category(s)) => {
                        if *s == equals.as_str() {
                            *left
                        } else {
                            *right
                        }
                    }
                    _ => return Err(self.type_mismatch(*feature, "categorical")),
                },
            };
        }
    }

    fn type_mismatch(&self, feature: usize, expected: &str) -> ModelError {
        let name = self.columns.get(feature).map_or("?", String::as_str);
        ModelError::FeatureMismatch(format!("column \"{name}\" must be {expected}"))
    }
}

enum RowValue<'a> {
    Number(f64),
    Category(&'a str),
}

impl Predictor for ForestModel {
    fn predict(&self, input: &FeatureInput) -> Result<f64, ModelError> {
        let row = self.row(input)?;
        let mut total = 0.0;
        for tree in &self.trees {
            total += self.walk(tree, &row)?;
        }
        Ok(match self.aggregate {
            Aggregate::Mean => total / self.trees.len() as f64,
            Aggregate::Sum => self.base_score + total,
        })
    }

    fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }
}
