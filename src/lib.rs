pub mod classifier;
pub mod config;
pub mod error;
pub mod handlers;
pub mod labels;
pub mod models;
pub mod prediction;
pub mod preprocess;
pub mod service;

pub use classifier::{Classifier, OnnxClassifier};
pub use config::Config;
pub use error::PredictError;
pub use labels::LabelSet;
pub use models::{ClassificationResult, ErrorResponse};
pub use service::PredictionService;
