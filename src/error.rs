//! Error types for the prediction path.

use std::path::PathBuf;

use crate::energy::EnergyType;

/// Failure raised while loading or evaluating a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("cannot read model artifact \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid model artifact \"{}\": {source}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("malformed model: {0}")]
    Malformed(String),

    #[error("feature mismatch: {0}")]
    FeatureMismatch(String),

    #[error("model produced a non-finite prediction ({0})")]
    NonFinite(f64),
}

/// Failure of a single prediction request.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Invalid energy type selected.")]
    UnknownEnergyType(String),

    #[error("field `{field}`: {reason}")]
    FieldParse { field: String, reason: String },

    #[error("Model file not found for {energy_type}")]
    Configuration {
        energy_type: EnergyType,
        path: PathBuf,
    },

    #[error("{0}")]
    ModelInvocation(#[from] ModelError),
}

impl PredictError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::UnknownEnergyType(_) => "unknown_energy_type",
            PredictError::FieldParse { .. } => "field_parse",
            PredictError::Configuration { .. } => "configuration",
            PredictError::ModelInvocation(_) => "model_invocation",
        }
    }

    /// User-facing message.
    ///
    /// Unknown types and missing artifacts have fixed messages; everything
    /// else is reported as `Error occurred: <detail>`.
    pub fn user_message(&self) -> String {
        match self {
            PredictError::UnknownEnergyType(_) | PredictError::Configuration { .. } => {
                self.to_string()
            }
            other => format!("Error occurred: {other}"),
        }
    }

    pub(crate) fn field(field: &str, reason: impl Into<String>) -> Self {
        PredictError::FieldParse {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_messages_are_not_prefixed() {
        let err = PredictError::UnknownEnergyType("tidal".into());
        assert_eq!(err.user_message(), "Invalid energy type selected.");

        let err = PredictError::Configuration {
            energy_type: EnergyType::Wind,
            path: PathBuf::from("models/wind.json"),
        };
        assert_eq!(err.user_message(), "Model file not found for wind");
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn other_errors_embed_detail() {
        let err = PredictError::field("avg_temp_solar", "could not convert \"abc\" to a number");
        assert_eq!(
            err.user_message(),
            "Error occurred: field `avg_temp_solar`: could not convert \"abc\" to a number"
        );

        let err = PredictError::from(ModelError::NonFinite(f64::NAN));
        assert_eq!(err.kind(), "model_invocation");
        assert!(err.user_message().starts_with("Error occurred: model produced"));
    }
}
