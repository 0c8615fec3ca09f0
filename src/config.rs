//! TOML-based service configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::energy::EnergyType;
use crate::model::bindings::{default_artifact_name, default_co2_factor};
use crate::model::{ModelBinding, ModelBindings};

/// Top-level configuration parsed from TOML.
///
/// All sections are optional and default to a local server reading
/// `models/<type>.json`. Load with [`AppConfig::from_toml_file`] or use
/// [`AppConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,
    /// Model artifacts and encoding behavior.
    #[serde(default)]
    pub models: ModelsConfig,
}

/// HTTP listener parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind host (IP address).
    pub host: String,
    /// Bind port (must be > 0).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Model artifact locations and dispatch options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsConfig {
    /// Base directory for relative artifact paths.
    pub dir: PathBuf,
    /// Load artifacts once at startup and share them across requests.
    pub preload: bool,
    /// Reject unknown `state` values instead of encoding them as zeros.
    pub strict_categories: bool,
    pub solar: ModelEntry,
    pub wind: ModelEntry,
    pub biomass: ModelEntry,
    pub hydro: ModelEntry,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            preload: false,
            strict_categories: false,
            solar: ModelEntry::default(),
            wind: ModelEntry::default(),
            biomass: ModelEntry::default(),
            hydro: ModelEntry::default(),
        }
    }
}

impl ModelsConfig {
    pub fn entry(&self, energy_type: EnergyType) -> &ModelEntry {
        match energy_type {
            EnergyType::Solar => &self.solar,
            EnergyType::Wind => &self.wind,
            EnergyType::Biomass => &self.biomass,
            EnergyType::Hydro => &self.hydro,
        }
    }

    /// Artifact file for `energy_type`, before resolving against `dir`.
    pub fn file(&self, energy_type: EnergyType) -> PathBuf {
        self.entry(energy_type)
            .file
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_artifact_name(energy_type)))
    }

    /// CO2 mitigation factor for `energy_type`.
    pub fn factor(&self, energy_type: EnergyType) -> f64 {
        self.entry(energy_type)
            .factor
            .unwrap_or_else(|| default_co2_factor(energy_type))
    }

    /// Resolves every entry against `dir` into the binding table.
    pub fn bindings(&self) -> ModelBindings {
        ModelBindings::new(EnergyType::ALL.into_iter().map(|ty| {
            (
                ty,
                ModelBinding {
                    path: self.dir.join(self.file(ty)),
                    co2_factor: self.factor(ty),
                },
            )
        }))
    }
}

/// One energy type's artifact file and CO2 factor overrides.
///
/// Keys left out fall back to that type's defaults, so `[models.wind]`
/// with only `file` keeps the wind factor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelEntry {
    /// Artifact path, relative to `models.dir` unless absolute.
    pub file: Option<PathBuf>,
    /// CO2 mitigation factor (must be finite and > 0).
    pub factor: Option<f64>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"models.solar.factor"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl AppConfig {
    /// Parses configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push(ConfigError {
                field: "server.port".into(),
                message: "must be > 0".into(),
            });
        }
        if self.server.host.parse::<std::net::IpAddr>().is_err() {
            errors.push(ConfigError {
                field: "server.host".into(),
                message: format!("must be an IP address, got \"{}\"", self.server.host),
            });
        }

        for ty in EnergyType::ALL {
            if self.models.file(ty).as_os_str().is_empty() {
                errors.push(ConfigError {
                    field: format!("models.{ty}.file"),
                    message: "must not be empty".into(),
                });
            }
            let factor = self.models.factor(ty);
            if !factor.is_finite() || factor <= 0.0 {
                errors.push(ConfigError {
                    field: format!("models.{ty}.factor"),
                    message: format!("must be finite and > 0, got {factor}"),
                });
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let cfg = AppConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.models.dir, PathBuf::from("models"));
        assert_eq!(cfg.models.factor(EnergyType::Hydro), 1.556);
        assert!(!cfg.models.preload);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[models]
dir = "/srv/green/models"
preload = true
strict_categories = true

[models.solar]
file = "solar_rf_v2.json"
factor = 1.6

[models.wind]
file = "/opt/wind.json"
"#;
        let cfg = AppConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.server.port), Some(8080));
        assert_eq!(cfg.as_ref().map(|c| c.models.preload), Some(true));
        assert_eq!(cfg.as_ref().map(|c| c.models.factor(EnergyType::Solar)), Some(1.6));
        // factor omitted: wind keeps its own default
        assert_eq!(cfg.as_ref().map(|c| c.models.factor(EnergyType::Wind)), Some(1.569));
    }

    #[test]
    fn bindings_resolve_against_dir() {
        let toml = r#"
[models]
dir = "/srv/models"

[models.wind]
file = "/opt/wind.json"
"#;
        let bindings = AppConfig::from_toml_str(toml).unwrap().models.bindings();
        let solar = bindings.get(EnergyType::Solar).unwrap();
        assert_eq!(solar.path, PathBuf::from("/srv/models/solar.json"));
        assert_eq!(solar.co2_factor, 1.527);
        // absolute paths are not rebased
        let wind = bindings.get(EnergyType::Wind).unwrap();
        assert_eq!(wind.path, PathBuf::from("/opt/wind.json"));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[models]
dir = "models"
bogus_field = true
"#;
        assert!(AppConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_catches_zero_port() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "server.port"));
    }

    #[test]
    fn validation_catches_bad_host() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "localhost:80".into();
        assert!(cfg.validate().iter().any(|e| e.field == "server.host"));
    }

    #[test]
    fn validation_catches_negative_factor() {
        let mut cfg = AppConfig::default();
        cfg.models.biomass.factor = Some(-1.0);
        cfg.models.hydro.factor = Some(f64::NAN);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "models.biomass.factor"));
        assert!(errors.iter().any(|e| e.field == "models.hydro.factor"));
    }

    #[test]
    fn error_display_has_field_path() {
        let e = ConfigError {
            field: "server.port".into(),
            message: "must be > 0".into(),
        };
        assert_eq!(e.to_string(), "config error: server.port: must be > 0");
    }
}
