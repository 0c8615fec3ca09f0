//! File-based input and output.

/// CSV batch prediction.
pub mod batch;
