#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use actix_web::web;
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use leaf_classifier::classifier::Classifier;
use leaf_classifier::prediction::OutputKind;
use leaf_classifier::preprocess::{Layout, Normalization, Preprocessor, ResizeMode};
use leaf_classifier::{LabelSet, PredictError, PredictionService};
use ndarray::{Array4, Axis};

/// Always answers with the same scores.
pub struct FixedScores(pub Vec<f32>);

impl Classifier for FixedScores {
    fn classify(&self, _batch: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        Ok(self.0.clone())
    }
}

/// Scores each class by the share of the matching RGB channel, so a pure red
/// image is the first label, pure green the second and pure blue the third.
pub struct ChannelShare;

impl Classifier for ChannelShare {
    fn classify(&self, batch: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        let sums: Vec<f32> = batch.axis_iter(Axis(3)).map(|c| c.sum()).collect();
        let total: f32 = sums.iter().sum();
        if total == 0.0 {
            return Ok(vec![1.0 / 3.0; 3]);
        }
        Ok(sums.into_iter().map(|s| s / total).collect())
    }
}

pub struct Broken;

impl Classifier for Broken {
    fn classify(&self, _batch: Array4<f32>) -> Result<Vec<f32>, PredictError> {
        Err(PredictError::Inference("device lost".into()))
    }
}

pub fn service(classifier: impl Classifier + 'static) -> web::Data<PredictionService> {
    web::Data::new(PredictionService::new(
        Arc::new(classifier),
        LabelSet::default(),
        Preprocessor {
            size: 8,
            layout: Layout::Nhwc,
            normalization: Normalization::Raw,
            resize: ResizeMode::Stretch,
        },
        OutputKind::Probabilities,
    ))
}

pub fn encode(image: RgbImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(
        RgbImage::from_pixel(width, height, Rgb(color)),
        ImageOutputFormat::Png,
    )
}
