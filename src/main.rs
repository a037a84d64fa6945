use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use leaf_classifier::{handlers, Config, LabelSet, OnnxClassifier, PredictionService};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("leaf_classifier=info,actix_web=info")),
        )
        .init();

    let config = Config::parse();

    let labels = LabelSet::resolve(config.labels_path.as_deref(), &config.model_path)
        .context("failed to load class labels")?;

    let preprocessor = config.preprocessor();
    let input_shape = preprocessor.input_shape();
    info!(
        model = %config.model_path.display(),
        ?input_shape,
        %labels,
        "Loading model"
    );

    let classifier = OnnxClassifier::load(&config.model_path, input_shape)
        .with_context(|| format!("failed to load model from {}", config.model_path.display()))?;

    let service = PredictionService::new(Arc::new(classifier), labels, preprocessor, config.output);
    service
        .warm_up()
        .context("model does not match the configured labels")?;

    let service = web::Data::new(service);
    let payload_limit = config.payload_limit();
    let (host, port) = config.bind_addr();

    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .configure(handlers::configure(service.clone(), payload_limit))
    });

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let server = server
        .bind((host.as_str(), port))
        .with_context(|| format!("failed to bind {host}:{port}"))?;

    info!("Server running at http://{}:{}", host, port);
    server.run().await?;

    Ok(())
}
