use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::energy::EnergyType;
use crate::error::ModelError;
use crate::model::types::Predictor;

/// Tonnes of CO2 avoided per unit of predicted generation, per energy type.
pub fn default_co2_factor(energy_type: EnergyType) -> f64 {
    match energy_type {
        EnergyType::Solar => 1.527,
        EnergyType::Wind => 1.569,
        EnergyType::Biomass => 1.555,
        EnergyType::Hydro => 1.556,
    }
}

/// Default artifact file name for an energy type (`solar.json`).
pub fn default_artifact_name(energy_type: EnergyType) -> String {
    format!("{}.json", energy_type.as_str())
}

/// Where an energy type's model lives and how its output scales to CO2.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBinding {
    pub path: PathBuf,
    pub co2_factor: f64,
}

/// Immutable energy type to model binding table, built once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelBindings {
    entries: BTreeMap<EnergyType, ModelBinding>,
}

impl ModelBindings {
    pub fn new(entries: impl IntoIterator<Item = (EnergyType, ModelBinding)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Default table: `<dir>/<type>.json` with the standard CO2 factors.
    pub fn with_defaults(dir: &Path) -> Self {
        Self::new(EnergyType::ALL.into_iter().map(|ty| {
            (
                ty,
                ModelBinding {
                    path: dir.join(default_artifact_name(ty)),
                    co2_factor: default_co2_factor(ty),
                },
            )
        }))
    }

    pub fn get(&self, energy_type: EnergyType) -> Option<&ModelBinding> {
        self.entries.get(&energy_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnergyType, &ModelBinding)> {
        self.entries.iter().map(|(ty, binding)| (*ty, binding))
    }
}

/// Source of model artifacts.
///
/// Lets the dispatcher stay independent of the storage and serialization
/// behind a model.
pub trait ModelLoader: Send + Sync {
    /// Whether an artifact is present at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Loads the artifact at `path`.
    ///
    /// # Errors
    ///
    /// Any [`ModelError`] raised while reading or decoding.
    fn load(&self, path: &Path) -> Result<Arc<dyn Predictor>, ModelError>;
}

/// Loads JSON artifacts from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileModelLoader;

impl ModelLoader for FileModelLoader {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load(&self, path: &Path) -> Result<Arc<dyn Predictor>, ModelError> {
        super::load_artifact(path).map(Arc::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_type() {
        let bindings = ModelBindings::with_defaults(Path::new("models"));
        for ty in EnergyType::ALL {
            let b = bindings.get(ty).unwrap();
            assert_eq!(b.path, Path::new("models").join(format!("{ty}.json")));
            assert_eq!(b.co2_factor, default_co2_factor(ty));
        }
        assert_eq!(bindings.iter().count(), 4);
    }

    #[test]
    fn documented_factors() {
        assert_eq!(default_co2_factor(EnergyType::Solar), 1.527);
        assert_eq!(default_co2_factor(EnergyType::Wind), 1.569);
        assert_eq!(default_co2_factor(EnergyType::Biomass), 1.555);
        assert_eq!(default_co2_factor(EnergyType::Hydro), 1.556);
    }

    #[test]
    fn file_loader_reports_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solar.json");
        assert!(!FileModelLoader.exists(&path));
        assert!(FileModelLoader.load(&path).is_err());
    }
}
