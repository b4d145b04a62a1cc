//! Error types for the flood prediction service

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::path::PathBuf;

use crate::models::ErrorBody;

/// Result type alias using the service's Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The model artifact does not exist at the configured path
    #[error("Model file not found at {}", .path.display())]
    ModelNotFound { path: PathBuf },

    /// The artifact extension has no matching backend
    #[error("Unsupported model format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The artifact was read but is not a usable classifier
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The classifier failed while scoring a feature vector
    #[error("inference failed: {0}")]
    Inference(String),

    /// The classifier produced a confidence outside [0, 1]
    #[error("invalid probability: {0}")]
    InvalidProbability(f64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The blocking inference task was cancelled
    #[error("prediction task was cancelled")]
    Blocking,
}

impl Error {
    pub fn invalid_model(msg: impl Into<String>) -> Self {
        Self::InvalidModel(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }
}

impl From<actix_web::error::BlockingError> for Error {
    fn from(_: actix_web::error::BlockingError) -> Self {
        Self::Blocking
    }
}

/// Request failures are not classified further: every one is a 500 carrying
/// the error text as `detail`.
impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_error_maps_to_500_with_detail() {
        let err = Error::inference("feature shape mismatch");
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["detail"], "inference failed: feature shape mismatch");
    }

    #[test]
    fn test_model_not_found_message_names_path() {
        let err = Error::ModelNotFound {
            path: PathBuf::from("app/models/flood_model.onnx"),
        };
        assert_eq!(
            err.to_string(),
            "Model file not found at app/models/flood_model.onnx"
        );
    }
}
