use crate::error::PredictError;
use crate::features::types::{EncodeOptions, FeatureInput, FeatureSchema, FeatureValue, RawFields};

/// Hydro plant feature schema.
///
/// Labeled record with two interaction columns derived at dispatch time:
/// `Flow_Head = flow_rate * head_height` and
/// `Capacity_Eff = peak_capacity * turbine_efficiency`.
#[derive(Debug, Clone, Copy)]
pub struct HydroFeatures;

impl HydroFeatures {
    pub fn flow_head(flow_rate: f64, head_height: f64) -> f64 {
        flow_rate * head_height
    }

    pub fn capacity_eff(peak_capacity: f64, turbine_efficiency: f64) -> f64 {
        peak_capacity * turbine_efficiency
    }
}

impl FeatureSchema for HydroFeatures {
    const COLUMNS: &'static [&'static str] = &[
        "Peak Capacity (MW)",
        "Flow Rate (m³/s)",
        "Head Height (m)",
        "Turbine Efficiency (%)",
        "Flow_Head",
        "Capacity_Eff",
        "Scale",
    ];

    fn build(fields: &RawFields, _opts: EncodeOptions) -> Result<FeatureInput, PredictError> {
        let head_height = fields.require_f64("head_height")?;
        let flow_rate = fields.require_f64("flow_rate")?;
        let turbine_eff = fields.require_f64("turbine_efficiency")?;
        let peak_capacity = fields.require_f64("peak_capacity_hydro")?;
        let scale = fields.require_str("scale")?;

        Ok(FeatureInput::Labeled(vec![
            ("Peak Capacity (MW)", FeatureValue::Number(peak_capacity)),
            ("Flow Rate (m³/s)", FeatureValue::Number(flow_rate)),
            ("Head Height (m)", FeatureValue::Number(head_height)),
            ("Turbine Efficiency (%)", FeatureValue::Number(turbine_eff)),
            (
                "Flow_Head",
                FeatureValue::Number(Self::flow_head(flow_rate, head_height)),
            ),
            (
                "Capacity_Eff",
                FeatureValue::Number(Self::capacity_eff(peak_capacity, turbine_eff)),
            ),
            ("Scale", FeatureValue::Category(scale.to_string())),
        ]))
    }
}
