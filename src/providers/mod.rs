//! Upstream image provider adapters.
//!
//! Each adapter turns a prompt into raw image bytes through one third-party
//! service. Adapters share one HTTP client and the download/validation
//! helpers in `http`; they differ only in how they search.
//!
//! # Adapters
//!
//! - `unsplash`: Keyword photo search, authorised with an access key.
//! - `pixabay`: Keyword stock-photo search, authorised with an API key.
//! - `placeholder`: Text banner rendered by a placeholder service, no key needed.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod http;
mod pixabay;
mod placeholder;
mod unsplash;

pub use pixabay::PixabayProvider;
pub use placeholder::PlaceholderProvider;
pub use unsplash::UnsplashProvider;

use crate::config::ProvidersConfig;
use crate::error::{ProviderError, Result};
use crate::models::{ImageResult, Prompt};
use async_trait::async_trait;
use std::sync::Arc;

/// A single strategy in the acquisition chain.
///
/// Implementations make at most two outbound requests per call and never
/// retry. Every failure is reported through `ProviderError`.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Stable identifier used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Whether the credentials this provider needs are present.
    fn is_configured(&self) -> bool;

    async fn fetch_image(&self, prompt: &Prompt) -> std::result::Result<ImageResult, ProviderError>;
}

/// Build the default chain in priority order: photo search, stock search, text banner.
pub fn default_chain(config: &ProvidersConfig) -> Result<Vec<Arc<dyn ImageProvider>>> {
    let client = http::build_client(config)?;

    Ok(vec![
        Arc::new(UnsplashProvider::new(client.clone(), &config.unsplash, config.min_image_bytes)),
        Arc::new(PixabayProvider::new(client.clone(), &config.pixabay, config.min_image_bytes)),
        Arc::new(PlaceholderProvider::new(client, &config.placeholder, config.min_image_bytes)),
    ])
}
