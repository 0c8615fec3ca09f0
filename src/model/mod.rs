//! Trained model artifacts and the energy-type binding table.

/// Energy type to artifact path and CO2 factor.
pub mod bindings;
/// Regression-tree ensembles.
pub mod forest;
/// Linear regression with categorical level tables.
pub mod linear;
pub mod types;

pub use bindings::{FileModelLoader, ModelBinding, ModelBindings, ModelLoader};
pub use forest::ForestModel;
pub use linear::LinearModel;
pub use types::Predictor;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::ModelError;

/// On-disk model artifact, a JSON document tagged by `"kind"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Forest(ForestModel),
}

impl ModelArtifact {
    /// Converts into a ready-to-score predictor, validating structure.
    ///
    /// # Errors
    ///
    /// `Malformed` if the artifact is structurally unusable.
    pub fn into_predictor(self) -> Result<Box<dyn Predictor>, ModelError> {
        match self {
            ModelArtifact::Linear(model) => {
                if model.columns.is_empty() {
                    return Err(ModelError::Malformed("linear model has no columns".into()));
                }
                Ok(Box::new(model))
            }
            ModelArtifact::Forest(model) => {
                model.validate()?;
                Ok(Box::new(model))
            }
        }
    }
}

/// Reads and decodes a model artifact from `path`.
///
/// # Errors
///
/// `Io` if the file cannot be opened, `Decode` if it is not a valid
/// artifact, `Malformed` if it decodes but is structurally unusable.
pub fn load_artifact(path: &Path) -> Result<Box<dyn Predictor>, ModelError> {
    let file = File::open(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact: ModelArtifact =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    artifact.into_predictor()
}
