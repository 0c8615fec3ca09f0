//! Prediction dispatcher: energy type + raw fields -> carbon estimate.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::config::ModelsConfig;
use crate::energy::EnergyType;
use crate::error::{ModelError, PredictError};
use crate::features::{self, EncodeOptions, RawFields, build_features};
use crate::model::{FileModelLoader, ModelBindings, ModelLoader, Predictor};

/// Rounds to two decimal places. Exact halves of the scaled value go to
/// the even neighbour, so `0.125` becomes `0.12`.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

/// Outcome of a single prediction, rounded for presentation.
///
/// `co2_mitigated` is computed from the unrounded prediction;
/// `carbon_credits` always equals `co2_mitigated`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub energy_type: EnergyType,
    pub prediction: f64,
    pub co2_mitigated: f64,
    pub carbon_credits: f64,
}

impl PredictionResult {
    /// Scales a raw model output by the energy type's CO2 factor.
    pub fn from_raw(energy_type: EnergyType, raw_prediction: f64, co2_factor: f64) -> Self {
        let co2_mitigated = raw_prediction * co2_factor;
        let carbon_credits = co2_mitigated;
        Self {
            energy_type,
            prediction: round2(raw_prediction),
            co2_mitigated: round2(co2_mitigated),
            carbon_credits: round2(carbon_credits),
        }
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} Prediction ---", self.energy_type.label())?;
        writeln!(f, "Predicted output:   {:.2}", self.prediction)?;
        writeln!(f, "CO2 mitigated:      {:.2}", self.co2_mitigated)?;
        write!(f, "Carbon credits:     {:.2}", self.carbon_credits)
    }
}

/// Stateless prediction service over an immutable binding table.
///
/// Artifacts are loaded per call unless they were preloaded at
/// construction; preloaded models are shared read-only.
pub struct Dispatcher {
    bindings: ModelBindings,
    loader: Arc<dyn ModelLoader>,
    preloaded: BTreeMap<EnergyType, Arc<dyn Predictor>>,
    options: EncodeOptions,
}

impl Dispatcher {
    pub fn new(
        bindings: ModelBindings,
        loader: Arc<dyn ModelLoader>,
        options: EncodeOptions,
    ) -> Self {
        Self {
            bindings,
            loader,
            preloaded: BTreeMap::new(),
            options,
        }
    }

    /// Builds a filesystem-backed dispatcher from the `[models]` section.
    pub fn from_config(cfg: &ModelsConfig) -> Self {
        let dispatcher = Self::new(
            cfg.bindings(),
            Arc::new(FileModelLoader),
            EncodeOptions {
                strict_categories: cfg.strict_categories,
            },
        );
        if cfg.preload {
            dispatcher.preload()
        } else {
            dispatcher
        }
    }

    /// Loads every artifact present now and keeps it for the dispatcher's
    /// lifetime.
    ///
    /// Types whose artifact is missing or fails to load keep per-call
    /// loading, so their requests report the usual errors.
    pub fn preload(mut self) -> Self {
        for (ty, binding) in self.bindings.iter() {
            if !self.loader.exists(&binding.path) {
                tracing::warn!(
                    energy_type = %ty,
                    path = %binding.path.display(),
                    "model artifact missing, skipping preload"
                );
                continue;
            }
            match self.loader.load(&binding.path) {
                Ok(model) => {
                    let trained = model.columns();
                    if trained.as_slice() != features::columns(ty) {
                        tracing::warn!(
                            energy_type = %ty,
                            ?trained,
                            "model columns differ from the feature schema"
                        );
                    }
                    tracing::info!(
                        energy_type = %ty,
                        path = %binding.path.display(),
                        "model preloaded"
                    );
                    self.preloaded.insert(ty, model);
                }
                Err(e) => {
                    tracing::warn!(energy_type = %ty, error = %e, "model preload failed");
                }
            }
        }
        self
    }

    pub fn bindings(&self) -> &ModelBindings {
        &self.bindings
    }

    /// Whether a request for `energy_type` can currently reach a model.
    pub fn is_available(&self, energy_type: EnergyType) -> bool {
        self.preloaded.contains_key(&energy_type)
            || self
                .bindings
                .get(energy_type)
                .is_some_and(|b| self.loader.exists(&b.path))
    }

    /// Runs one prediction.
    ///
    /// Checks run in order: energy type, field parsing, artifact presence,
    /// artifact load, model call.
    ///
    /// # Errors
    ///
    /// - `UnknownEnergyType` if `energy_type` is not a known wire name
    /// - `FieldParse` if a required field is missing or malformed
    /// - `Configuration` if the bound artifact does not exist
    /// - `ModelInvocation` if loading or scoring fails
    pub fn predict(
        &self,
        energy_type: &str,
        fields: &RawFields,
    ) -> Result<PredictionResult, PredictError> {
        let ty: EnergyType = energy_type.parse()?;
        let features = build_features(ty, fields, self.options)?;
        tracing::debug!(energy_type = %ty, ?features, "features built");

        let binding = self
            .bindings
            .get(ty)
            .ok_or_else(|| PredictError::Configuration {
                energy_type: ty,
                path: Default::default(),
            })?;

        let model = match self.preloaded.get(&ty) {
            Some(model) => Arc::clone(model),
            None => {
                if !self.loader.exists(&binding.path) {
                    return Err(PredictError::Configuration {
                        energy_type: ty,
                        path: binding.path.clone(),
                    });
                }
                self.loader.load(&binding.path)?
            }
        };

        let raw = model.predict(&features)?;
        if !raw.is_finite() {
            return Err(ModelError::NonFinite(raw).into());
        }

        let result = PredictionResult::from_raw(ty, raw, binding.co2_factor);
        tracing::info!(
            energy_type = %ty,
            prediction = result.prediction,
            co2_mitigated = result.co2_mitigated,
            "prediction complete"
        );
        Ok(result)
    }
}
