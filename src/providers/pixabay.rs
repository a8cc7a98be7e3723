// Pixabay stock photo search adapter
// Author: kelexine (https://github.com/kelexine)

use super::http::{download_image, search};
use super::ImageProvider;
use crate::config::PixabayConfig;
use crate::error::ProviderError;
use crate::models::{ImageResult, Prompt};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "webformatURL")]
    webformat_url: String,
}

/// Searches Pixabay for a horizontal stock photo.
pub struct PixabayProvider {
    client: Client,
    api_key: Option<String>,
    api_base_url: String,
    min_image_bytes: usize,
}

impl PixabayProvider {
    pub fn new(client: Client, config: &PixabayConfig, min_image_bytes: usize) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            min_image_bytes,
        }
    }

    fn search_url(&self, api_key: &str, prompt: &Prompt) -> String {
        format!(
            "{}/api/?key={}&q={}&image_type=photo&per_page=3&orientation=horizontal",
            self.api_base_url,
            urlencoding::encode(api_key),
            urlencoding::encode(prompt.as_str())
        )
    }
}

#[async_trait]
impl ImageProvider for PixabayProvider {
    fn name(&self) -> &'static str {
        "pixabay"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch_image(&self, prompt: &Prompt) -> Result<ImageResult, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::Unavailable("no Pixabay API key".to_string()))?;

        debug!("Searching Pixabay for: {}", prompt);

        let request = self.client.get(self.search_url(api_key, prompt));
        let response: SearchResponse = search(self.name(), request).await?;
        let hit = response.hits.into_iter().next().ok_or(ProviderError::NoResults)?;

        download_image(self.name(), &self.client, &hit.webformat_url, self.min_image_bytes).await
    }
}
