//! Axum-based HTTP server for the promptpix service.
//!
//! Exposes the prompt-to-image endpoint consumed by the post-creation UI,
//! plus health and metrics endpoints for operators.
//!
//! # Components
//!
//! - `handlers`: Implementation of the individual endpoints.
//! - `middleware`: Request ID tracking and CORS.
//! - `routes`: The main router configuration that ties everything together.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{
    HealthCheck, HealthResponse, HealthStatus, ImageGenerationRequest, ImageGenerationResponse,
    IMAGE_GENERATION_ALIAS_PATH, IMAGE_GENERATION_PATH,
};
pub use routes::{create_router, AppState};
