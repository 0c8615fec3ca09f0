//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use serde_json::{Value, json};

use green_calc::dispatch::Dispatcher;
use green_calc::energy::EnergyType;
use green_calc::features::{self, EncodeOptions, RawFields};
use green_calc::model::{FileModelLoader, ModelBindings};

/// Columns that carry a category instead of a number.
fn categorical_levels(column: &str) -> Option<Value> {
    match column {
        "Type of Feedstock" => Some(json!({"Rice Husk": 10.0, "Bagasse": 20.0})),
        "Scale" => Some(json!({"Small": 1.0, "Large": 5.0})),
        _ => None,
    }
}

/// Linear artifact over `energy_type`'s columns, with `weight(column)` as
/// each numeric coefficient.
pub fn linear_artifact(energy_type: EnergyType, weight: impl Fn(&str) -> f64) -> Value {
    let columns: Vec<Value> = features::columns(energy_type)
        .iter()
        .map(|&name| match categorical_levels(name) {
            Some(levels) => json!({"type": "categorical", "name": name, "levels": levels}),
            None => json!({"type": "numeric", "name": name, "weight": weight(name)}),
        })
        .collect();
    json!({"kind": "linear", "intercept": 0.0, "columns": columns})
}

/// Writes `artifact` as `<dir>/<type>.json`.
pub fn write_artifact(dir: &Path, energy_type: EnergyType, artifact: &Value) {
    let path = dir.join(format!("{energy_type}.json"));
    std::fs::write(path, serde_json::to_string_pretty(artifact).unwrap()).unwrap();
}

/// Writes a unit-weight linear artifact for every energy type.
pub fn write_unit_models(dir: &Path) {
    for ty in EnergyType::ALL {
        write_artifact(dir, ty, &linear_artifact(ty, |_| 1.0));
    }
}

/// Filesystem dispatcher over `<dir>/<type>.json` with default factors.
pub fn file_dispatcher(dir: &Path) -> Dispatcher {
    Dispatcher::new(
        ModelBindings::with_defaults(dir),
        Arc::new(FileModelLoader),
        EncodeOptions::default(),
    )
}

pub fn fields(pairs: &[(&str, &str)]) -> RawFields {
    pairs.iter().copied().collect()
}

/// Solar plant: 25 °C, 5 kWh/m², 100 MW.
pub fn solar_form(state: &str) -> RawFields {
    fields(&[
        ("avg_temp_solar", "25"),
        ("avg_irradiance", "5"),
        ("peak_capacity_solar", "100"),
        ("state_solar", state),
    ])
}

pub fn wind_form(state: &str) -> RawFields {
    fields(&[
        ("wind_speed", "8"),
        ("air_density", "1.25"),
        ("temperature_wind", "20"),
        ("pressure", "1000"),
        ("humidity", "60"),
        ("installed_capacity", "50"),
        ("state_wind", state),
    ])
}

pub fn biomass_form(feedstock: &str) -> RawFields {
    fields(&[
        ("peak_capacity_biomass", "20"),
        ("feedstock_type", feedstock),
        ("moisture_content", "15"),
        ("calorific_value", "3401"),
        ("feedstock_quantity", "100"),
    ])
}

/// Hydro plant: head 10 m, flow 2 m³/s, 90 % efficiency, 4 MW.
pub fn hydro_form(scale: &str) -> RawFields {
    fields(&[
        ("head_height", "10"),
        ("flow_rate", "2"),
        ("turbine_efficiency", "90"),
        ("peak_capacity_hydro", "4"),
        ("scale", scale),
    ])
}

/// URL-encodes `energy_type` plus `form` as a request body.
pub fn form_body(energy_type: &str, form: &[(&str, &str)]) -> String {
    std::iter::once(("energy_type", energy_type))
        .chain(form.iter().copied())
        .map(|(k, v)| format!("{k}={}", v.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&")
}
