//! Route table and HTTP server startup

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::classifier::load_model;
use crate::config::ServiceConfig;
use crate::handlers;
use crate::predictor::{Predictor, SeverityMap};

/// Register routes and shared state. Health and predict live under
/// `api_prefix`; `/` always answers with a liveness message.
pub fn configure(
    predictor: web::Data<Predictor>,
    api_prefix: String,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(predictor)
            .app_data(web::JsonConfig::default().error_handler(handlers::json_error_handler))
            .route("/", web::get().to(handlers::root))
            .service(
                web::scope(&api_prefix)
                    .route("/health", web::get().to(handlers::health))
                    .route("/predict", web::post().to(handlers::predict)),
            );
    }
}

/// Any origin, method and header; credentials are not allowed
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

/// Build the shared prediction context from configuration. Fails when the
/// model artifact is missing or unreadable.
pub fn build_predictor(config: &ServiceConfig) -> anyhow::Result<Predictor> {
    let classifier = load_model(&config.model_path)
        .with_context(|| format!("failed to load model from {}", config.model_path.display()))?;

    Ok(Predictor::new(classifier, SeverityMap::from(&config.severity))
        .with_recommendations(config.recommendations.clone()))
}

/// Load the model, then serve until shutdown. The server never binds if
/// loading fails.
pub async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let predictor = web::Data::from(Arc::new(build_predictor(&config)?));
    info!("Model ready: {}", predictor.model_name());

    let api_prefix = config.api_prefix.clone();
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(Logger::default())
            .configure(configure(predictor.clone(), api_prefix.clone()))
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let (host, port) = config.bind_addr();
    let server = server
        .bind((host.as_str(), port))
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    info!("Server running at http://{}:{}", host, port);

    server.run().await?;
    info!("Server shutdown complete");
    Ok(())
}
