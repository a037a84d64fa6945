mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use image::{ImageOutputFormat, Rgb, RgbImage};
use clap::Parser;
use leaf_classifier::models::PREDICTION_FAILED;
use leaf_classifier::{handlers, Config};
use leaf_classifier::labels::DEFAULT_LABELS;
use serde_json::{json, Value};

use common::{solid_png, Broken, ChannelShare, FixedScores};

macro_rules! app {
    ($classifier:expr) => {
        test::init_service(
            App::new().configure(handlers::configure(
                common::service($classifier),
                default_payload_limit(),
            )),
        )
        .await
    };
}

/// Body limit the server starts with when no flag or env var is given.
fn default_payload_limit() -> usize {
    Config::try_parse_from(["leaf-classifier"])
        .unwrap()
        .payload_limit()
}

fn post(body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post().uri("/predict").set_payload(body)
}

#[actix_web::test]
async fn maps_fixed_scores_to_label_and_confidence() {
    let app = app!(FixedScores(vec![0.1, 0.85, 0.05]));

    let req = post(solid_png(16, 16, [30, 120, 40])).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "class": "Late Blight", "confidence": 85.0 }));
}

#[actix_web::test]
async fn jpeg_and_png_are_both_accepted() {
    let app = app!(ChannelShare);

    let image = RgbImage::from_pixel(32, 20, Rgb([10, 200, 10]));
    for format in [ImageOutputFormat::Png, ImageOutputFormat::Jpeg(90)] {
        let req = post(common::encode(image.clone(), format)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["class"], "Late Blight");
        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&confidence));
    }
}

#[actix_web::test]
async fn undecodable_bodies_get_the_generic_error() {
    let app = app!(FixedScores(vec![0.1, 0.85, 0.05]));

    let truncated = solid_png(4, 4, [1, 2, 3])[..16].to_vec();
    for body in [Vec::new(), truncated, b"GIF87a but not really".to_vec()] {
        let resp = test::call_service(&app, post(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": PREDICTION_FAILED }));
    }
}

#[actix_web::test]
async fn inference_failure_gets_the_generic_error() {
    let app = app!(Broken);

    let resp = test::call_service(&app, post(solid_png(8, 8, [0, 0, 0])).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": PREDICTION_FAILED }));
}

#[actix_web::test]
async fn mismatched_output_length_is_a_failure() {
    let app = app!(FixedScores(vec![0.3, 0.7]));

    let resp = test::call_service(&app, post(solid_png(8, 8, [9, 9, 9])).to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn repeated_requests_are_deterministic() {
    let app = app!(ChannelShare);
    let bytes = solid_png(24, 24, [200, 90, 40]);

    let mut answers = Vec::new();
    for _ in 0..3 {
        let resp = test::call_service(&app, post(bytes.clone()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        answers.push(test::read_body_json::<Value, _>(resp).await);
    }

    assert_eq!(answers[0]["class"], "Early Blight");
    assert!(answers.iter().all(|a| a == &answers[0]));
}

#[actix_web::test]
async fn concurrent_requests_do_not_interfere() {
    let app = app!(ChannelShare);
    let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];

    let requests = (0..50u32).map(|i| {
        let color = colors[i as usize % 3];
        // Distinct sizes so no two bodies are identical.
        let req = post(solid_png(10 + i, 12 + i, color)).to_request();
        test::call_service(&app, req)
    });
    let responses = futures_util::future::join_all(requests).await;

    for (i, resp) in responses.into_iter().enumerate() {
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["class"], DEFAULT_LABELS[i % 3]);
        assert_eq!(body["confidence"], 100.0);
    }
}

#[actix_web::test]
async fn bodies_above_the_framework_default_limit_are_accepted() {
    let app = app!(ChannelShare);

    // Uncompressed BMP, roughly 480 KiB.
    let noisy = RgbImage::from_fn(400, 400, |x, y| {
        Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
    });
    let bytes = common::encode(noisy, ImageOutputFormat::Bmp);
    assert!(bytes.len() > 256 * 1024);

    let resp = test::call_service(&app, post(bytes).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn content_type_is_not_required() {
    let app = app!(FixedScores(vec![0.7, 0.2, 0.1]));

    let req = post(solid_png(8, 8, [1, 1, 1]))
        .insert_header(("content-type", "text/plain"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "class": "Early Blight", "confidence": 70.0 }));
}
