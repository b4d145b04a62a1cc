//! Flood severity prediction service.
//!
//! A pre-trained classifier is loaded once at startup ([`classifier::load_model`])
//! and shared read-only by every request through [`Predictor`]. The HTTP layer
//! ([`server`], [`handlers`]) only parses requests and shapes responses.

pub mod classifier;
pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod models;
pub mod predictor;
pub mod server;

pub use classifier::{load_model, Classifier};
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use features::{FeatureVector, FEATURE_NAMES};
pub use models::{PredictionRequest, PredictionResponse};
pub use predictor::{Predictor, SeverityMap};
