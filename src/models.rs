use serde::{Deserialize, Serialize};

/// Body of `POST /predict`. All three fields are required numbers.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    pub rainfall: f64,
    pub temperature: f64,
    pub humidity: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResponse {
    pub severity: String,
    /// Highest class probability, rounded to two decimals
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

/// Error payload for 422 and 500 responses
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_integer_fields() {
        let req: PredictionRequest =
            serde_json::from_str(r#"{"rainfall": 120, "temperature": 28.0, "humidity": 80}"#)
                .unwrap();
        assert_eq!(req.rainfall, 120.0);
        assert_eq!(req.humidity, 80.0);
    }

    #[test]
    fn test_request_rejects_missing_field() {
        let res = serde_json::from_str::<PredictionRequest>(r#"{"rainfall": 1.0, "humidity": 2.0}"#);
        assert!(res.is_err());
    }

    #[test]
    fn test_response_omits_absent_recommendation() {
        let resp = PredictionResponse {
            severity: "High".to_string(),
            confidence: 0.91,
            recommendation: None,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json, serde_json::json!({"severity": "High", "confidence": 0.91}));
    }
}
