// Shared HTTP plumbing for provider adapters
// Author: kelexine (https://github.com/kelexine)

use crate::config::ProvidersConfig;
use crate::error::{AppError, ProviderError, Result};
use crate::models::{ImageFormat, ImageResult};
use crate::utils::logging::sanitize;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Longest slice of an upstream error body kept in the failure reason.
const ERROR_BODY_PREVIEW: usize = 200;

/// Create the HTTP client shared by every adapter.
pub fn build_client(config: &ProvidersConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.attempt_timeout_seconds))
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_nodelay(true)
        .user_agent(concat!("promptpix/", env!("CARGO_PKG_VERSION")))
        .use_rustls_tls()
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Send a search request and parse its JSON body.
pub async fn search<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> std::result::Result<T, ProviderError> {
    let response = request.send().await?;
    let response = ensure_success(provider, response).await?;

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        ProviderError::UpstreamError(format!("{} returned an invalid search response: {}", provider, e))
    })
}

/// Download an image and validate it.
///
/// The payload must be at least `min_bytes` long and recognisable as an
/// image, either from its `Content-Type` or from its leading bytes.
pub async fn download_image(
    provider: &str,
    client: &Client,
    url: &str,
    min_bytes: usize,
) -> std::result::Result<ImageResult, ProviderError> {
    debug!("{}: fetching image {}", provider, sanitize(url));

    let response = client.get(url).send().await?;
    let response = ensure_success(provider, response).await?;

    let declared = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = response.bytes().await?;
    check_plausible(bytes.len(), min_bytes)?;

    let format = declared
        .as_deref()
        .and_then(ImageFormat::from_mime_type)
        .or_else(|| ImageFormat::detect(&bytes))
        .ok_or_else(|| {
            ProviderError::UpstreamError(format!(
                "{} returned non-image content ({})",
                provider,
                declared.as_deref().unwrap_or("no content type")
            ))
        })?;

    debug!("{}: downloaded {} bytes of {}", provider, bytes.len(), format.mime_type());
    Ok(ImageResult::new(bytes, format.mime_type()))
}

/// Reject payloads too small to be a real image.
pub fn check_plausible(size: usize, minimum: usize) -> std::result::Result<(), ProviderError> {
    if size < minimum {
        return Err(ProviderError::ImplausiblePayload { size, minimum });
    }
    Ok(())
}

async fn ensure_success(provider: &str, response: Response) -> std::result::Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
    Err(ProviderError::UpstreamError(format!(
        "{} returned HTTP {}: {}",
        provider,
        status.as_u16(),
        sanitize(preview.trim())
    )))
}
