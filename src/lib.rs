//! Green Calculator: carbon-credit estimates for renewable energy plants.

pub mod api;
pub mod cli;
pub mod config;
/// Prediction dispatcher and result rounding.
pub mod dispatch;
pub mod energy;
pub mod error;
/// Per-energy-type feature construction.
pub mod features;
pub mod io;
/// Trained model artifacts and bindings.
pub mod model;
