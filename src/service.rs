use std::sync::Arc;

use ndarray::Array4;

use crate::classifier::Classifier;
use crate::error::PredictError;
use crate::labels::LabelSet;
use crate::models::ClassificationResult;
use crate::prediction::{self, OutputKind};
use crate::preprocess::Preprocessor;

/// Everything a request needs to turn image bytes into a label, built once at
/// startup and shared read-only by all workers.
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
    labels: LabelSet,
    preprocessor: Preprocessor,
    output: OutputKind,
}

impl PredictionService {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        labels: LabelSet,
        preprocessor: Preprocessor,
        output: OutputKind,
    ) -> Self {
        Self {
            classifier,
            labels,
            preprocessor,
            output,
        }
    }

    pub fn predict(&self, bytes: &[u8]) -> Result<ClassificationResult, PredictError> {
        let batch = self.preprocessor.prepare(bytes)?;
        let scores = self.classifier.classify(batch)?;
        prediction::interpret(&scores, self.output, &self.labels)
    }

    /// Runs a blank image through the model and checks it yields one score
    /// per label. Catches a label file that does not match the model before
    /// any request is served.
    pub fn warm_up(&self) -> Result<(), PredictError> {
        let [n, d1, d2, d3] = self.preprocessor.input_shape();
        let scores = self
            .classifier
            .classify(Array4::<f32>::zeros((n, d1, d2, d3)))?;

        if scores.len() != self.labels.len() {
            return Err(PredictError::Inference(format!(
                "model has {} outputs but {} labels are configured {}",
                scores.len(),
                self.labels.len(),
                self.labels
            )));
        }

        Ok(())
    }
}
