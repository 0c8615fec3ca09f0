//! Per-energy-type feature construction.

/// Biomass plant record.
pub mod biomass;
/// Hydro plant record with derived interaction columns.
pub mod hydro;
/// Solar plant row with state one-hot columns.
pub mod solar;
pub mod types;
/// Wind farm row with state one-hot columns.
pub mod wind;

pub use biomass::BiomassFeatures;
pub use hydro::HydroFeatures;
pub use solar::SolarFeatures;
pub use types::{EncodeOptions, FeatureInput, FeatureSchema, FeatureValue, RawFields};
pub use wind::WindFeatures;

use crate::energy::EnergyType;
use crate::error::PredictError;

/// Builds the model input for `energy_type` from raw form fields.
///
/// # Errors
///
/// `FieldParse` if a required field is missing or malformed.
pub fn build_features(
    energy_type: EnergyType,
    fields: &RawFields,
    opts: EncodeOptions,
) -> Result<FeatureInput, PredictError> {
    match energy_type {
        EnergyType::Solar => SolarFeatures::build(fields, opts),
        EnergyType::Wind => WindFeatures::build(fields, opts),
        EnergyType::Biomass => BiomassFeatures::build(fields, opts),
        EnergyType::Hydro => HydroFeatures::build(fields, opts),
    }
}

/// Model column names for `energy_type`, in training order.
pub fn columns(energy_type: EnergyType) -> &'static [&'static str] {
    match energy_type {
        EnergyType::Solar => SolarFeatures::COLUMNS,
        EnergyType::Wind => WindFeatures::COLUMNS,
        EnergyType::Biomass => BiomassFeatures::COLUMNS,
        EnergyType::Hydro => HydroFeatures::COLUMNS,
    }
}
