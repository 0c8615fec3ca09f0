use crate::error::PredictError;
use crate::features::types::{EncodeOptions, FeatureInput, FeatureSchema, RawFields, one_hot};

/// States the wind model was trained on, in one-hot column order.
pub const WIND_STATES: [&str; 4] = ["Karnataka", "Maharashtra", "Rajasthan", "Tamil Nadu"];

/// Numeric wind form fields, in model column order.
const NUMERIC_FIELDS: [&str; 6] = [
    "wind_speed",
    "air_density",
    "temperature_wind",
    "pressure",
    "humidity",
    "installed_capacity",
];

/// Wind farm feature schema.
///
/// Positional row: six site measurements followed by `State_*` one-hot columns.
#[derive(Debug, Clone, Copy)]
pub struct WindFeatures;

impl FeatureSchema for WindFeatures {
    const COLUMNS: &'static [&'static str] = &[
        "wind_speed",
        "air_density",
        "temperature",
        "pressure",
        "humidity",
        "installed_capacity",
        "State_Karnataka",
        "State_Maharashtra",
        "State_Rajasthan",
        "State_Tamil Nadu",
    ];

    fn build(fields: &RawFields, opts: EncodeOptions) -> Result<FeatureInput, PredictError> {
        let mut row = NUMERIC_FIELDS
            .iter()
            .map(|field| fields.require_f64(field))
            .collect::<Result<Vec<f64>, _>>()?;
        let state = fields.require_str("state_wind")?;
        row.extend(one_hot("state_wind", state, &WIND_STATES, opts)?);
        Ok(FeatureInput::Positional(row))
    }
}
