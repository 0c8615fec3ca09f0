//! Common types and traits for per-energy-type feature construction.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::PredictError;

/// Raw form submission: field name to submitted string, unchecked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields(HashMap<String, String>);

impl RawFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the raw string for a required field.
    ///
    /// # Errors
    ///
    /// `FieldParse` if the field was not submitted.
    pub fn require_str(&self, field: &str) -> Result<&str, PredictError> {
        self.get(field)
            .ok_or_else(|| PredictError::field(field, "missing required field"))
    }

    /// Parses a required numeric field.
    ///
    /// Surrounding whitespace is ignored. NaN and infinities are rejected.
    ///
    /// # Errors
    ///
    /// `FieldParse` if the field is missing, not a number, or not finite.
    pub fn require_f64(&self, field: &str) -> Result<f64, PredictError> {
        let raw = self.require_str(field)?;
        let value: f64 = strip_digit_separators(raw.trim())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                PredictError::field(field, format!("could not convert \"{raw}\" to a number"))
            })?;
        if !value.is_finite() {
            return Err(PredictError::field(
                field,
                format!("\"{raw}\" is not a finite number"),
            ));
        }
        Ok(value)
    }
}

/// Removes `_` digit separators (`"1_000"`).
///
/// An underscore is only valid with a digit on both sides; `None` otherwise.
fn strip_digit_separators(s: &str) -> Option<Cow<'_, str>> {
    if !s.contains('_') {
        return Some(Cow::Borrowed(s));
    }
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'_' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| bytes.get(j));
        let after = bytes.get(i + 1);
        if !before.is_some_and(u8::is_ascii_digit) || !after.is_some_and(u8::is_ascii_digit) {
            return None;
        }
    }
    Some(Cow::Owned(s.replace('_', "")))
}

impl From<HashMap<String, String>> for RawFields {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A single labeled feature value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Category(_) => None,
        }
    }
}

/// Feature representation handed to a model.
///
/// Solar and wind models take a positional numeric row; biomass and hydro
/// models take a labeled record whose column order matches training.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureInput {
    Positional(Vec<f64>),
    Labeled(Vec<(&'static str, FeatureValue)>),
}

impl FeatureInput {
    pub fn len(&self) -> usize {
        match self {
            FeatureInput::Positional(values) => values.len(),
            FeatureInput::Labeled(columns) => columns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a labeled column by name. Always `None` for positional input.
    pub fn column(&self, name: &str) -> Option<&FeatureValue> {
        match self {
            FeatureInput::Positional(_) => None,
            FeatureInput::Labeled(columns) => columns
                .iter()
                .find(|(column, _)| *column == name)
                .map(|(_, value)| value),
        }
    }
}

/// Options that change how categorical fields are encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Reject categorical values outside the known level set instead of
    /// encoding them as all zeros.
    pub strict_categories: bool,
}

/// Trait implemented by each energy type's feature schema.
///
/// A schema knows which form fields it reads and how to turn them into the
/// exact column layout its model was trained on.
pub trait FeatureSchema {
    /// Model column names in training order.
    const COLUMNS: &'static [&'static str];

    /// Builds the model input from raw form fields.
    ///
    /// # Errors
    ///
    /// `FieldParse` if a required field is missing or malformed.
    fn build(fields: &RawFields, opts: EncodeOptions) -> Result<FeatureInput, PredictError>;
}

/// One-hot encodes `value` against a fixed, ordered level set.
///
/// Exact string match. A value outside `levels` yields all zeros unless
/// `opts.strict_categories` is set.
///
/// # Errors
///
/// `FieldParse` for an unknown level in strict mode.
pub fn one_hot(
    field: &str,
    value: &str,
    levels: &[&str],
    opts: EncodeOptions,
) -> Result<Vec<f64>, PredictError> {
    let encoded: Vec<f64> = levels
        .iter()
        .map(|level| if *level == value { 1.0 } else { 0.0 })
        .collect();

    if !levels.contains(&value) {
        if opts.strict_categories {
            return Err(PredictError::field(
                field,
                format!("unknown value \"{value}\", expected one of: {}", levels.join(", ")),
            ));
        }
        tracing::warn!(field, value, "categorical value outside known levels, encoding as zeros");
    }

    Ok(encoded)
}
