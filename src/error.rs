use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Failure of a single prediction, tagged by the pipeline stage that produced it.
///
/// Every variant renders the same generic 500 body; the detail is only ever
/// written to the server log.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to build input tensor: {0}")]
    Preprocess(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    pub fn stage(&self) -> &'static str {
        match self {
            PredictError::Decode(_) => "decode",
            PredictError::Preprocess(_) => "preprocess",
            PredictError::Inference(_) => "inference",
        }
    }
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::prediction_failed())
    }
}
