use actix_web::{web, HttpResponse};
use tracing::{error, info};
use uuid::Uuid;

use crate::error::PredictError;
use crate::service::PredictionService;

/// Registers the shared service, the body size limit and `/predict`.
pub fn configure(
    service: web::Data<PredictionService>,
    payload_limit: usize,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(service)
            .app_data(web::PayloadConfig::new(payload_limit))
            .service(web::resource("/predict").route(web::post().to(predict)));
    }
}

/// `POST /predict`: the body is the raw encoded image, any content type.
pub async fn predict(
    service: web::Data<PredictionService>,
    body: web::Bytes,
) -> Result<HttpResponse, PredictError> {
    let request_id = Uuid::new_v4();
    let size = body.len();

    // Decoding and inference are CPU bound; keep them off the async workers.
    let outcome = web::block(move || service.predict(&body))
        .await
        .map_err(|e| PredictError::Inference(format!("blocking pool unavailable: {e}")))
        .and_then(|result| result);

    match outcome {
        Ok(result) => {
            info!(
                %request_id,
                bytes = size,
                class = %result.class_name,
                confidence = result.confidence,
                "Prediction served"
            );
            Ok(HttpResponse::Ok().json(result))
        }
        Err(err) => {
            error!(
                %request_id,
                bytes = size,
                stage = err.stage(),
                error = %err,
                "Prediction failed"
            );
            Err(err)
        }
    }
}
