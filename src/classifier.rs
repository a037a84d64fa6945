use std::path::Path;

use ndarray::Array4;
use tract_onnx::prelude::*;

use crate::error::PredictError;

/// A loaded model that scores one batch of images.
///
/// Implementations are shared across all HTTP workers, so `classify` takes
/// `&self` and must not rely on per-call mutable state.
pub trait Classifier: Send + Sync {
    /// Returns one score per class for a batch of size one.
    fn classify(&self, batch: Array4<f32>) -> Result<Vec<f32>, PredictError>;
}

/// ONNX model compiled by tract into a runnable plan.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
}

impl OnnxClassifier {
    /// Loads, pins the input shape of, and optimizes the model at `path`.
    pub fn load(path: &Path, input_shape: [usize; 4]) -> TractResult<Self> {
        let plan = tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(0, f32::fact(input_shape).into())?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self { plan })
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, batch: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let batch = batch.as_standard_layout();
        let data = batch
            .as_slice()
            .ok_or_else(|| PredictError::Preprocess("input tensor is not contiguous".into()))?;
        let tensor = Tensor::from_shape(batch.shape(), data)
            .map_err(|e| PredictError::Preprocess(format!("{e:#}")))?;

        let result = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| PredictError::Inference(format!("{e:#}")))?;

        let output = result
            .first()
            .ok_or_else(|| PredictError::Inference("model produced no outputs".into()))?;
        let scores = output
            .to_array_view::<f32>()
            .map_err(|e| PredictError::Inference(format!("{e:#}")))?;

        Ok(scores.iter().copied().collect())
    }
}
