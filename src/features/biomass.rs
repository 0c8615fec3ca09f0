use crate::error::PredictError;
use crate::features::types::{EncodeOptions, FeatureInput, FeatureSchema, FeatureValue, RawFields};

/// Biomass plant feature schema.
///
/// Labeled record; the feedstock type is passed through untransformed and
/// encoded by the model itself.
#[derive(Debug, Clone, Copy)]
pub struct BiomassFeatures;

impl FeatureSchema for BiomassFeatures {
    const COLUMNS: &'static [&'static str] = &[
        "Peak Capacity (MW)",
        "Type of Feedstock",
        "Moisture Content (%)",
        "Calorific Value (kcal/kg)",
        "Feedstock Quantity Used (Tonnes/day)",
    ];

    fn build(fields: &RawFields, _opts: EncodeOptions) -> Result<FeatureInput, PredictError> {
        let peak_capacity = fields.require_f64("peak_capacity_biomass")?;
        let feedstock = fields.require_str("feedstock_type")?;
        let moisture = fields.require_f64("moisture_content")?;
        let calorific = fields.require_f64("calorific_value")?;
        let quantity = fields.require_f64("feedstock_quantity")?;

        Ok(FeatureInput::Labeled(vec![
            ("Peak Capacity (MW)", FeatureValue::Number(peak_capacity)),
            ("Type of Feedstock", FeatureValue::Category(feedstock.to_string())),
            ("Moisture Content (%)", FeatureValue::Number(moisture)),
            ("Calorific Value (kcal/kg)", FeatureValue::Number(calorific)),
            (
                "Feedstock Quantity Used (Tonnes/day)",
                FeatureValue::Number(quantity),
            ),
        ]))
    }
}
