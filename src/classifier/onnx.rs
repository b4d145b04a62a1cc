//! ONNX backend.
//!
//! Expects the layout scikit-learn exporters produce with `zipmap` disabled:
//! a single `f32 [N, 3]` input, output 0 holding the `i64` class label and
//! output 1 holding `f32 [N, n_classes]` probabilities. Single-output models
//! that emit probabilities only are also accepted; the label is then the
//! index of the highest probability.

use std::path::Path;
use tract_onnx::prelude::*;

use super::Classifier;
use crate::error::{Error, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};

type Plan = TypedRunnableModel<TypedModel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// outputs: label (i64), probabilities (f32)
    LabelAndProbabilities,
    /// outputs: probabilities (f32)
    ProbabilitiesOnly,
}

impl Layout {
    fn of(model: &TypedModel) -> Result<Self> {
        let output_type = |ix: usize| {
            model
                .output_fact(ix)
                .map(|fact| fact.datum_type)
                .map_err(|e| Error::invalid_model(e.to_string()))
        };

        match model.outputs.len() {
            1 => {
                let probs = output_type(0)?;
                if probs != DatumType::F32 {
                    return Err(Error::invalid_model(format!(
                        "probability output must be f32, found {probs:?}"
                    )));
                }
                Ok(Self::ProbabilitiesOnly)
            }
            2 => {
                let (label, probs) = (output_type(0)?, output_type(1)?);
                if label != DatumType::I64 {
                    return Err(Error::invalid_model(format!(
                        "label output must be i64, found {label:?}"
                    )));
                }
                if probs != DatumType::F32 {
                    return Err(Error::invalid_model(format!(
                        "probability output must be f32, found {probs:?}"
                    )));
                }
                Ok(Self::LabelAndProbabilities)
            }
            n => Err(Error::invalid_model(format!(
                "expected 1 or 2 outputs (label, probabilities), found {n}"
            ))),
        }
    }
}

pub struct OnnxClassifier {
    plan: Plan,
    layout: Layout,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| Error::invalid_model(format!("{}: {e}", path.display())))?;
        Self::from_model(model)
    }

    /// Pin the input to one `f32` row, optimize, and check the output layout
    pub fn from_model(model: InferenceModel) -> Result<Self> {
        let plan = model
            .with_input_fact(0, f32::fact([1, FEATURE_COUNT]).into())
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| Error::invalid_model(e.to_string()))?;

        let layout = Layout::of(plan.model())?;
        Ok(Self { plan, layout })
    }

    fn run(&self, features: &FeatureVector) -> Result<TVec<TValue>> {
        let input: Tensor = tract_ndarray::arr2(&[features.as_f32()]).into();
        self.plan
            .run(tvec!(input.into()))
            .map_err(|e| Error::inference(e.to_string()))
    }

    fn probabilities(output: &Tensor) -> Result<Vec<f64>> {
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| Error::inference(format!("probability output: {e}")))?;
        Ok(view.iter().map(|p| *p as f64).collect())
    }
}

/// Index of the highest probability; the first one wins a tie
fn argmax(proba: &[f64]) -> Option<usize> {
    proba
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, p)| match best {
            Some((_, bp)) if bp >= *p => best,
            _ => Some((i, *p)),
        })
        .map(|(i, _)| i)
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<i64> {
        self.predict_with_proba(features).map(|(label, _)| label)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        self.predict_with_proba(features).map(|(_, proba)| proba)
    }

    /// One inference pass yields both outputs
    fn predict_with_proba(&self, features: &FeatureVector) -> Result<(i64, Vec<f64>)> {
        let outputs = self.run(features)?;

        match self.layout {
            Layout::ProbabilitiesOnly => {
                let proba = Self::probabilities(&outputs[0])?;
                let label = argmax(&proba)
                    .ok_or_else(|| Error::inference("model returned no probabilities"))?;
                Ok((label as i64, proba))
            }
            Layout::LabelAndProbabilities => {
                let labels = outputs[0]
                    .to_array_view::<i64>()
                    .map_err(|e| Error::inference(format!("label output: {e}")))?;
                let label = labels
                    .iter()
                    .next()
                    .copied()
                    .ok_or_else(|| Error::inference("model returned no label"))?;
                Ok((label, Self::probabilities(&outputs[1])?))
            }
        }
    }

    fn name(&self) -> &str {
        "onnx"
    }
}
