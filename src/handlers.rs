use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, Error, HttpRequest, HttpResponse, Result};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::models::{ErrorBody, HealthResponse, PredictionRequest, StatusResponse};
use crate::predictor::Predictor;

pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        status: "ok".to_string(),
        message: "Flood API is LIVE".to_string(),
    })
}

/// Liveness. The model is loaded before the server binds, so reaching this
/// handler means it is available.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy())
}

pub async fn predict(
    predictor: web::Data<Predictor>,
    payload: web::Json<PredictionRequest>,
) -> Result<HttpResponse, Error> {
    let request_id = Uuid::new_v4();
    let input = payload.into_inner();
    let predictor = predictor.into_inner();

    // inference is CPU-bound; keep it off the async workers
    let outcome = web::block(move || predictor.predict(&input))
        .await
        .map_err(crate::Error::from)?;

    match outcome {
        Ok(response) => {
            debug!(
                %request_id,
                rainfall = input.rainfall,
                temperature = input.temperature,
                humidity = input.humidity,
                severity = %response.severity,
                confidence = response.confidence,
                "Prediction complete"
            );
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            error!(%request_id, "Prediction failed: {}", e);
            Err(e.into())
        }
    }
}

/// Turns JSON extraction failures (bad JSON, missing or non-numeric fields)
/// into 422 responses before any handler runs.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    warn!("Rejected request body for {}: {}", req.path(), err);
    let body = ErrorBody::new(err.to_string());
    InternalError::from_response(err, HttpResponse::UnprocessableEntity().json(body)).into()
}
