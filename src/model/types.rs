//! Common types and traits for trained model artifacts.

use crate::error::ModelError;
use crate::features::FeatureInput;

/// A trained regression model treated as an opaque scoring function.
///
/// Implementations are immutable after loading so one instance can be
/// shared across concurrent requests.
pub trait Predictor: Send + Sync {
    /// Scores a single feature row.
    ///
    /// # Errors
    ///
    /// `FeatureMismatch` if the input does not line up with the trained
    /// columns, `Malformed` if the model structure is unusable.
    fn predict(&self, input: &FeatureInput) -> Result<f64, ModelError>;

    /// Trained column names, in order.
    fn columns(&self) -> Vec<&str>;
}
