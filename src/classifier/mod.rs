//! Classifier trait and model backends

use crate::error::Result;
use crate::features::FeatureVector;

mod forest;
mod loader;
mod onnx;

pub use forest::{ForestClassifier, ForestModel, Node, Tree};
pub use loader::load_model;
pub use onnx::OnnxClassifier;

/// A pre-trained binary (or multi-class) classifier.
///
/// Implementations are loaded once and shared read-only across requests, so
/// both operations take `&self` and must not mutate any state.
pub trait Classifier: Send + Sync {
    /// Predicted class label for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<i64>;

    /// Per-class probabilities for one feature vector
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>>;

    /// Label and probabilities together. Backends that get both from a single
    /// pass override this.
    fn predict_with_proba(&self, features: &FeatureVector) -> Result<(i64, Vec<f64>)> {
        Ok((self.predict(features)?, self.predict_proba(features)?))
    }

    /// Backend name, used in logs
    fn name(&self) -> &str;
}
