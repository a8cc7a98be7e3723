// Text banner placeholder adapter
// Author: kelexine (https://github.com/kelexine)

use super::http::download_image;
use super::ImageProvider;
use crate::config::PlaceholderConfig;
use crate::error::ProviderError;
use crate::models::{ImageResult, Prompt};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const BANNER_PATH: &str = "512x512/4A90E2/FFFFFF";

/// Renders the first few prompt words on a plain banner via a placeholder service.
///
/// There is no search step; the banner URL is fetched directly.
pub struct PlaceholderProvider {
    client: Client,
    base_url: String,
    max_words: usize,
    min_image_bytes: usize,
}

impl PlaceholderProvider {
    pub fn new(client: Client, config: &PlaceholderConfig, min_image_bytes: usize) -> Self {
        Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            max_words: config.max_words.max(1),
            min_image_bytes,
        }
    }

    fn banner_url(&self, prompt: &Prompt) -> String {
        let keywords = prompt.leading_words(self.max_words).join("+");
        format!(
            "{}/{}?text={}",
            self.base_url,
            BANNER_PATH,
            urlencoding::encode(&keywords)
        )
    }
}

#[async_trait]
impl ImageProvider for PlaceholderProvider {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }

    async fn fetch_image(&self, prompt: &Prompt) -> Result<ImageResult, ProviderError> {
        if !self.is_configured() {
            return Err(ProviderError::Unavailable("no placeholder service URL".to_string()));
        }

        let url = self.banner_url(prompt);
        debug!("Requesting placeholder banner: {}", url);

        download_image(self.name(), &self.client, &url, self.min_image_bytes).await
    }
}
