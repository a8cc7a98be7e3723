// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::AppError;
use crate::models::EncodedImage;
use axum::body::Bytes;
use axum::extract::{rejection::BytesRejection, MatchedPath, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const IMAGE_GENERATION_PATH: &str = "/image-generation";
pub const IMAGE_GENERATION_ALIAS_PATH: &str = "/api/v1/generate-image";

#[derive(Debug, Deserialize)]
pub struct ImageGenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    pub photo: EncodedImage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub providers: BTreeMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub position: usize,
}

/// Handler for the prompt-to-image endpoint.
///
/// Any failure, including an unreadable, oversized or malformed body, is
/// reported with the same generic 500 response.
pub async fn image_generation_handler(
    State(state): State<AppState>,
    matched: MatchedPath,
    body: Result<Bytes, BytesRejection>, // Rejections are mapped here, not by axum
) -> Result<Json<ImageGenerationResponse>, AppError> {
    let started = Instant::now();
    let result = match body {
        Ok(body) => generate(&state, &body).await,
        Err(rejection) => {
            warn!("Rejected image request body: {}", rejection.body_text());
            Err(AppError::InvalidInput(rejection.body_text()))
        }
    };

    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    crate::metrics::record_request(
        "POST",
        matched.as_str(),
        status.as_u16(),
        started.elapsed().as_secs_f64(),
    );

    result
}

async fn generate(state: &AppState, body: &[u8]) -> Result<Json<ImageGenerationResponse>, AppError> {
    let req: ImageGenerationRequest = serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected image request with malformed body: {}", e);
        AppError::InvalidInput(format!("JSON deserialization error: {}", e))
    })?;

    let raw_prompt = req.prompt.unwrap_or_default();
    let acquisition = state.pipeline.acquire_raw(&raw_prompt).await.map_err(|e| {
        warn!("Rejected image request: {}", e);
        e
    })?;

    info!(
        "Served image for request {} from {}",
        acquisition.request_id, acquisition.source
    );
    debug!("Encoded image length: {}", acquisition.image.as_str().len());

    Ok(Json(ImageGenerationResponse {
        photo: acquisition.image,
    }))
}

/// Reports which providers are configured, in chain order. Never exposes key values.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut providers = BTreeMap::new();
    let mut any_external = false;

    for (position, provider) in state.pipeline.providers().enumerate() {
        let configured = provider.is_configured();
        any_external |= configured;
        let status = if configured { "configured" } else { "unconfigured" };
        providers.insert(
            provider.name().to_string(),
            HealthCheck {
                status: status.to_string(),
                position,
            },
        );
    }

    let last = providers.len();
    providers.insert(
        "synthetic".to_string(),
        HealthCheck {
            status: "ok".to_string(),
            position: last,
        },
    );

    // The synthetic fallback keeps the service up; without any provider it is only degraded
    let status = if any_external {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    Json(HealthResponse {
        status,
        providers,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Prometheus text exposition
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [("content-type", "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}
