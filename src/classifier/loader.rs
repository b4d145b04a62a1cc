use std::path::Path;
use std::sync::Arc;
use tracing::info;

use super::{Classifier, ForestClassifier, OnnxClassifier};
use crate::error::{Error, Result};

/// Load the model artifact at `path`.
///
/// Called once before the server binds. A missing or unreadable artifact is
/// returned as an error and must stop startup; there is no retry.
pub fn load_model(path: &Path) -> Result<Arc<dyn Classifier>> {
    if !path.exists() {
        return Err(Error::ModelNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let classifier: Arc<dyn Classifier> = match extension.as_deref() {
        Some("onnx") => Arc::new(OnnxClassifier::load(path)?),
        Some("json") => Arc::new(ForestClassifier::load(path)?),
        _ => {
            return Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    info!(
        "Loaded {} model from {}",
        classifier.name(),
        path.display()
    );
    Ok(classifier)
}
