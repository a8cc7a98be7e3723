// Error types for the promptpix service
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// The single message a caller ever sees on failure.
///
/// Provider-specific detail is logged but never returned, so the response
/// cannot reveal which credentials are configured.
pub const GENERIC_FAILURE_MESSAGE: &str = "Image generation service is currently unavailable";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of a single provider adapter.
///
/// These never leave the acquisition pipeline; they are recorded on the
/// attempt log and the next provider is tried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("upstream error: {0}")]
    UpstreamError(String),

    #[error("search returned no results")]
    NoResults,

    #[error("implausible payload: {size} bytes (minimum {minimum})")]
    ImplausiblePayload { size: usize, minimum: usize },
}

impl ProviderError {
    /// Short label used for metrics and the attempt table.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Unavailable(_) => "unavailable",
            ProviderError::UpstreamError(_) => "upstream_error",
            ProviderError::NoResults => "no_results",
            ProviderError::ImplausiblePayload { .. } => "implausible_payload",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::UpstreamError("request timed out".to_string())
        } else {
            // reqwest includes the URL, which may carry an API key
            ProviderError::UpstreamError(crate::utils::logging::sanitize(&e.to_string()))
        }
    }
}

// Every caller-visible failure collapses to the same generic 500
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = json!({
            "success": false,
            "status": status.as_u16(),
            "message": GENERIC_FAILURE_MESSAGE,
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
