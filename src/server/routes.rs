// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{
    health_handler, image_generation_handler, metrics_handler,
    IMAGE_GENERATION_ALIAS_PATH, IMAGE_GENERATION_PATH,
};
use super::middleware::{cors_layer, request_id_layers};
use crate::config::AppConfig;
use crate::error::Result;
use crate::pipeline::AcquisitionPipeline;
use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<AcquisitionPipeline>,
}

pub fn create_router(config: AppConfig, pipeline: AcquisitionPipeline) -> Result<Router> {
    let body_limit = config.server.max_body_bytes;
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(IMAGE_GENERATION_PATH, post(image_generation_handler))
        .route(IMAGE_GENERATION_ALIAS_PATH, post(image_generation_handler))
        // Prompts are short; the handler turns an over-limit body into the generic failure
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state);

    Ok(app)
}
