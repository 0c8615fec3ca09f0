use crate::error::PredictError;
use crate::features::types::{EncodeOptions, FeatureInput, FeatureSchema, RawFields, one_hot};

/// States the solar model was trained on, in one-hot column order.
pub const SOLAR_STATES: [&str; 4] = ["Madhya Pradesh", "Maharashtra", "Rajasthan", "Uttarakhand"];

/// Solar plant feature schema.
///
/// Positional row: `[avg_temp, avg_irradiance, peak_capacity, State_*...]`.
#[derive(Debug, Clone, Copy)]
pub struct SolarFeatures;

impl FeatureSchema for SolarFeatures {
    const COLUMNS: &'static [&'static str] = &[
        "avg_temp",
        "avg_irradiance",
        "peak_capacity",
        "State_Madhya Pradesh",
        "State_Maharashtra",
        "State_Rajasthan",
        "State_Uttarakhand",
    ];

    fn build(fields: &RawFields, opts: EncodeOptions) -> Result<FeatureInput, PredictError> {
        let avg_temp = fields.require_f64("avg_temp_solar")?;
        let avg_irradiance = fields.require_f64("avg_irradiance")?;
        let peak_capacity = fields.require_f64("peak_capacity_solar")?;
        let state = fields.require_str("state_solar")?;

        let mut row = vec![avg_temp, avg_irradiance, peak_capacity];
        row.extend(one_hot("state_solar", state, &SOLAR_STATES, opts)?);
        Ok(FeatureInput::Positional(row))
    }
}
