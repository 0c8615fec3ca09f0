//! API request and response types.

use std::path::PathBuf;

use serde::Serialize;

use crate::dispatch::PredictionResult;
use crate::energy::EnergyType;
use crate::error::PredictError;

/// Successful prediction, numbers rounded to two decimals.
///
/// `energy_type` is the capitalized display name (`"Solar"`).
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub energy_type: &'static str,
    pub prediction: f64,
    pub co2_mitigated: f64,
    pub carbon_credits: f64,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(r: PredictionResult) -> Self {
        Self {
            energy_type: r.energy_type.label(),
            prediction: r.prediction,
            co2_mitigated: r.co2_mitigated,
            carbon_credits: r.carbon_credits,
        }
    }
}

/// Error body shared by all failure responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error kind (`"field_parse"`, `"configuration"`, ...).
    pub kind: &'static str,
}

impl From<&PredictError> for ErrorResponse {
    fn from(e: &PredictError) -> Self {
        Self {
            message: e.user_message(),
            kind: e.kind(),
        }
    }
}

/// One row of the model binding table.
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub energy_type: EnergyType,
    pub path: PathBuf,
    pub co2_factor: f64,
    /// Whether a request for this type can currently reach a model.
    pub available: bool,
    /// Feature columns in training order.
    pub columns: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
