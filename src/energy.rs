//! Energy type discriminator shared by features, bindings, and the API.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PredictError;

/// Renewable plant category. Selects the feature schema, the bound model,
/// and the CO2 mitigation factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    Solar,
    Wind,
    Biomass,
    Hydro,
}

impl EnergyType {
    /// All energy types in form order.
    pub const ALL: [EnergyType; 4] = [
        EnergyType::Solar,
        EnergyType::Wind,
        EnergyType::Biomass,
        EnergyType::Hydro,
    ];

    /// Lowercase wire name as submitted by the form (`"solar"`).
    pub fn as_str(self) -> &'static str {
        match self {
            EnergyType::Solar => "solar",
            EnergyType::Wind => "wind",
            EnergyType::Biomass => "biomass",
            EnergyType::Hydro => "hydro",
        }
    }

    /// Capitalized display name used in results (`"Solar"`).
    pub fn label(self) -> &'static str {
        match self {
            EnergyType::Solar => "Solar",
            EnergyType::Wind => "Wind",
            EnergyType::Biomass => "Biomass",
            EnergyType::Hydro => "Hydro",
        }
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyType {
    type Err = PredictError;

    /// Exact, case-sensitive match on the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solar" => Ok(EnergyType::Solar),
            "wind" => Ok(EnergyType::Wind),
            "biomass" => Ok(EnergyType::Biomass),
            "hydro" => Ok(EnergyType::Hydro),
            other => Err(PredictError::UnknownEnergyType(other.to_string())),
        }
    }
}
