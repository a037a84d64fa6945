use serde::Serialize;

/// Body returned for every failed prediction, whatever the stage that failed.
pub const PREDICTION_FAILED: &str = "Prediction failed";

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ClassificationResult {
    #[serde(rename = "class")]
    pub class_name: String,
    /// Top probability as a percentage, rounded to two decimals.
    pub confidence: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn prediction_failed() -> Self {
        Self {
            error: PREDICTION_FAILED.to_string(),
        }
    }
}
