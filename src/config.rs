//! Service configuration

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// HTTP worker threads (actix default when unset)
    pub workers: Option<usize>,

    /// Path to the serialized classifier (`.onnx` or `.json`)
    pub model_path: PathBuf,

    /// Prefix the health and predict routes are mounted under
    pub api_prefix: String,

    /// Predicted class to severity label mapping
    pub severity: SeverityConfig,

    /// Static recommendation text keyed by severity label
    pub recommendations: HashMap<String, String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: None,
            model_path: PathBuf::from("app/models/flood_model.onnx"),
            api_prefix: "/api/v1".to_string(),
            severity: SeverityConfig::default(),
            recommendations: HashMap::new(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a YAML file, or defaults if the file is absent
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let mut config: Self = serde_yaml::from_str(content)?;
        config.api_prefix = normalize_prefix(&config.api_prefix);
        Ok(config)
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityConfig {
    pub positive_class: i64,
    pub positive_label: String,
    pub negative_label: String,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            positive_class: 1,
            positive_label: "High".to_string(),
            negative_label: "Low".to_string(),
        }
    }
}

/// `api/v1/` -> `/api/v1`, `/` -> ``
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.api_prefix, "/api/v1");
        assert_eq!(config.model_path, PathBuf::from("app/models/flood_model.onnx"));
        assert_eq!(config.severity.positive_label, "High");
        assert!(config.recommendations.is_empty());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ServiceConfig::from_yaml(
            r#"
port: 9090
model_path: models/flood.json
api_prefix: "v2/"
recommendations:
  High: Evacuate low-lying areas
"#,
        )
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.model_path, PathBuf::from("models/flood.json"));
        assert_eq!(config.api_prefix, "/v2");
        assert_eq!(config.severity.negative_label, "Low");
        assert_eq!(
            config.recommendations.get("High").map(String::as_str),
            Some("Evacuate low-lying areas")
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        assert!(ServiceConfig::from_yaml("port: [not a port").is_err());
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/api/v1"), "/api/v1");
        assert_eq!(normalize_prefix("api/v1/"), "/api/v1");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }
}
