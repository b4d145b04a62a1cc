//! Prediction handling: feature assembly, inference, and response shaping

use std::collections::HashMap;
use std::sync::Arc;

use crate::classifier::Classifier;
use crate::config::SeverityConfig;
use crate::error::{Error, Result};
use crate::features::FeatureVector;
use crate::models::{PredictionRequest, PredictionResponse};

/// Fixed lookup from predicted class to severity label
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityMap {
    positive_class: i64,
    positive_label: String,
    negative_label: String,
}

impl SeverityMap {
    pub fn new(
        positive_class: i64,
        positive_label: impl Into<String>,
        negative_label: impl Into<String>,
    ) -> Self {
        Self {
            positive_class,
            positive_label: positive_label.into(),
            negative_label: negative_label.into(),
        }
    }

    pub fn label_for(&self, class: i64) -> &str {
        if class == self.positive_class {
            &self.positive_label
        } else {
            &self.negative_label
        }
    }
}

impl Default for SeverityMap {
    fn default() -> Self {
        Self::new(1, "High", "Low")
    }
}

impl From<&SeverityConfig> for SeverityMap {
    fn from(cfg: &SeverityConfig) -> Self {
        Self::new(
            cfg.positive_class,
            cfg.positive_label.clone(),
            cfg.negative_label.clone(),
        )
    }
}

/// Round to two decimal places, ties to even (0.625 -> 0.62, 0.375 -> 0.38)
pub fn round_confidence(p: f64) -> f64 {
    (p * 100.0).round_ties_even() / 100.0
}

/// Highest class probability. Every entry must lie in [0, 1].
pub fn max_probability(proba: &[f64]) -> Result<f64> {
    if proba.is_empty() {
        return Err(Error::inference("model returned no probabilities"));
    }
    if let Some(bad) = proba.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(Error::InvalidProbability(*bad));
    }
    Ok(proba.iter().copied().fold(0.0, f64::max))
}

/// Application context shared by every request: the loaded model plus the
/// static lookups used to shape its output.
pub struct Predictor {
    classifier: Arc<dyn Classifier>,
    severity: SeverityMap,
    recommendations: HashMap<String, String>,
}

impl Predictor {
    pub fn new(classifier: Arc<dyn Classifier>, severity: SeverityMap) -> Self {
        Self {
            classifier,
            severity,
            recommendations: HashMap::new(),
        }
    }

    /// Attach a static recommendation per severity label
    pub fn with_recommendations(mut self, recommendations: HashMap<String, String>) -> Self {
        self.recommendations = recommendations;
        self
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn predict(&self, req: &PredictionRequest) -> Result<PredictionResponse> {
        let features = FeatureVector::from_request(req);

        let (class, proba) = self.classifier.predict_with_proba(&features)?;
        let confidence = max_probability(&proba)?;

        let severity = self.severity.label_for(class).to_string();
        let recommendation = self.recommendations.get(&severity).cloned();

        Ok(PredictionResponse {
            severity,
            confidence: round_confidence(confidence),
            recommendation,
        })
    }
}
