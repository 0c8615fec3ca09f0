use std::collections::HashMap;

use serde::Deserialize;

use crate::error::ModelError;
use crate::features::{FeatureInput, FeatureValue};
use crate::model::types::Predictor;

/// One trained column of a linear model.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LinearColumn {
    /// Numeric column with a single coefficient.
    Numeric { name: String, weight: f64 },
    /// Categorical column with one coefficient per known level.
    ///
    /// Unknown levels contribute nothing, the same as an all-zero one-hot block.
    Categorical {
        name: String,
        levels: HashMap<String, f64>,
    },
}

impl LinearColumn {
    pub fn name(&self) -> &str {
        match self {
            LinearColumn::Numeric { name, .. } | LinearColumn::Categorical { name, .. } => name,
        }
    }
}

/// Linear regression: `intercept + Σ weight_i * x_i` over ordered columns.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub columns: Vec<LinearColumn>,
}

impl LinearModel {
    fn contribution(column: &LinearColumn, value: &FeatureValue) -> Result<f64, ModelError> {
        match (column, value) {
            (LinearColumn::Numeric { weight, .. }, FeatureValue::Number(x)) => Ok(weight * x),
            (LinearColumn::Categorical { levels, .. }, FeatureValue::Category(level)) => {
                Ok(levels.get(level).copied().unwrap_or(0.0))
            }
            (column, value) => Err(ModelError::FeatureMismatch(format!(
                "column \"{}\" cannot take value {value:?}",
                column.name()
            ))),
        }
    }
}

impl Predictor for LinearModel {
    fn predict(&self, input: &FeatureInput) -> Result<f64, ModelError> {
        if input.len() != self.columns.len() {
            return Err(ModelError::FeatureMismatch(format!(
                "model expects {} features, got {}",
                self.columns.len(),
                input.len()
            )));
        }

        let mut sum = self.intercept;
        match input {
            FeatureInput::Positional(values) => {
                for (column, x) in self.columns.iter().zip(values) {
                    sum += Self::contribution(column, &FeatureValue::Number(*x))?;
                }
            }
            FeatureInput::Labeled(record) => {
                for (column, (name, value)) in self.columns.iter().zip(record) {
                    if column.name() != *name {
                        return Err(ModelError::FeatureMismatch(format!(
                            "expected column \"{}\", got \"{name}\"",
                            column.name()
                        )));
                    }
                    sum += Self::contribution(column, value)?;
                }
            }
        }
        Ok(sum)
    }

    fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(LinearColumn::name).collect()
    }
}
