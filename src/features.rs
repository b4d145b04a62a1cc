//! Feature vector construction.
//!
//! The classifier was trained on columns in a fixed order. [`FEATURE_NAMES`] is
//! the one place that order is written down; every backend receives its input
//! through [`FeatureVector`].

use crate::models::PredictionRequest;

/// Training-time column order
pub const FEATURE_NAMES: [&str; 3] = ["rainfall", "temperature", "humidity"];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn from_request(req: &PredictionRequest) -> Self {
        Self([req.rainfall, req.temperature, req.humidity])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Single-precision copy for backends that take `f32` tensors
    pub fn as_f32(&self) -> [f32; FEATURE_COUNT] {
        self.0.map(|v| v as f32)
    }

    /// Look up a value by its training-time column name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.0[idx])
    }
}

/// Check that an artifact's declared columns match [`FEATURE_NAMES`] exactly.
pub fn check_feature_names<S: AsRef<str>>(declared: &[S]) -> Result<(), String> {
    let declared: Vec<&str> = declared.iter().map(AsRef::as_ref).collect();
    if declared != FEATURE_NAMES {
        return Err(format!(
            "model expects features {:?}, service provides {:?}",
            declared, FEATURE_NAMES
        ));
    }
    Ok(())
}
