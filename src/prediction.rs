use clap::ValueEnum;

use crate::error::PredictError;
use crate::labels::LabelSet;
use crate::models::ClassificationResult;

/// What the model's output vector holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// Already a probability distribution (softmax inside the model).
    Probabilities,
    /// Raw scores; softmax is applied before picking the class.
    Logits,
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index and value of the largest score. Ties go to the lowest index.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, score)| match best {
            Some((_, top)) if score <= top => best,
            _ => Some((i, score)),
        })
}

/// Percentage with two decimals, e.g. `0.85` becomes `85.0`.
pub fn confidence_percent(probability: f32) -> f64 {
    (probability as f64 * 100.0 * 100.0).round() / 100.0
}

/// Maps the classifier output onto the label set.
pub fn interpret(
    scores: &[f32],
    kind: OutputKind,
    labels: &LabelSet,
) -> Result<ClassificationResult, PredictError> {
    if scores.len() != labels.len() {
        return Err(PredictError::Inference(format!(
            "model returned {} scores for {} labels",
            scores.len(),
            labels.len()
        )));
    }
    if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
        return Err(PredictError::Inference(format!(
            "model returned non-finite score {bad}"
        )));
    }

    let probabilities = match kind {
        OutputKind::Probabilities => {
            if let Some(bad) = scores.iter().find(|s| !(0.0..=1.0).contains(*s)) {
                return Err(PredictError::Inference(format!(
                    "model returned probability {bad} outside [0, 1]"
                )));
            }
            scores.to_vec()
        }
        OutputKind::Logits => softmax(scores),
    };

    let (index, top) = argmax(&probabilities)
        .ok_or_else(|| PredictError::Inference("model returned no scores".into()))?;
    let class_name = labels
        .get(index)
        .ok_or_else(|| PredictError::Inference(format!("no label for class index {index}")))?;

    Ok(ClassificationResult {
        class_name: class_name.to_string(),
        confidence: confidence_percent(top),
    })
}
