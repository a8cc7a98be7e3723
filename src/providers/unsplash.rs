// Unsplash photo search adapter
// Author: kelexine (https://github.com/kelexine)

use super::http::{download_image, search};
use super::ImageProvider;
use crate::config::UnsplashConfig;
use crate::error::ProviderError;
use crate::models::{ImageResult, Prompt};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

/// Searches Unsplash for a landscape photo matching the full prompt.
pub struct UnsplashProvider {
    client: Client,
    access_key: Option<String>,
    api_base_url: String,
    min_image_bytes: usize,
}

impl UnsplashProvider {
    pub fn new(client: Client, config: &UnsplashConfig, min_image_bytes: usize) -> Self {
        Self {
            client,
            access_key: config.access_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            min_image_bytes,
        }
    }

    fn search_url(&self, prompt: &Prompt) -> String {
        format!(
            "{}/search/photos?query={}&per_page=1&orientation=landscape",
            self.api_base_url,
            urlencoding::encode(prompt.as_str())
        )
    }
}

#[async_trait]
impl ImageProvider for UnsplashProvider {
    fn name(&self) -> &'static str {
        "unsplash"
    }

    fn is_configured(&self) -> bool {
        self.access_key.is_some()
    }

    async fn fetch_image(&self, prompt: &Prompt) -> Result<ImageResult, ProviderError> {
        let access_key = self
            .access_key
            .as_deref()
            .ok_or_else(|| ProviderError::Unavailable("no Unsplash access key".to_string()))?;

        debug!("Searching Unsplash for: {}", prompt);

        let request = self
            .client
            .get(self.search_url(prompt))
            .header("Authorization", format!("Client-ID {}", access_key))
            .header("Accept-Version", "v1");

        let response: SearchResponse = search(self.name(), request).await?;
        let photo = response.results.into_iter().next().ok_or(ProviderError::NoResults)?;

        download_image(self.name(), &self.client, &photo.urls.regular, self.min_image_bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProvidersConfig;
    use crate::providers::http::build_client;
    use mockito::Matcher;

    fn provider(base_url: &str, key: Option<&str>) -> UnsplashProvider {
        let config = UnsplashConfig {
            access_key: key.map(str::to_string),
            api_base_url: base_url.to_string(),
        };
        UnsplashProvider::new(build_client(&ProvidersConfig::default()).unwrap(), &config, 750)
    }

    fn jpeg(len: usize) -> Vec<u8> {
        let mut data = b"\xFF\xD8\xFF\xE0".to_vec();
        data.resize(len, 0x11);
        data
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let prompt = Prompt::parse("red fox").unwrap();
        let result = provider("http://127.0.0.1:1", None).fetch_image(&prompt).await;
        assert!(matches!(result, Err(ProviderError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_search_then_download() {
        let mut server = mockito::Server::new_async().await;
        let search = server
            .mock("GET", "/search/photos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "red fox".into()),
                Matcher::UrlEncoded("per_page".into(), "1".into()),
                Matcher::UrlEncoded("orientation".into(), "landscape".into()),
            ]))
            .match_header("authorization", "Client-ID test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"total":1,"results":[{{"id":"x","urls":{{"regular":"{}/photo.jpg"}}}}]}}"#,
                server.url()
            ))
            .create_async()
            .await;
        let photo = server
            .mock("GET", "/photo.jpg")
            .with_status(200)
            .with_header("content-type", "image/jpeg")
            .with_body(jpeg(4096))
            .create_async()
            .await;

        let prompt = Prompt::parse("red fox").unwrap();
        let image = provider(&server.url(), Some("test-key")).fetch_image(&prompt).await.unwrap();

        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.len(), 4096);
        search.assert_async().await;
        photo.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_results() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/photos")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"total":0,"results":[]}"#)
            .create_async()
            .await;

        let prompt = Prompt::parse("zzqx").unwrap();
        let result = provider(&server.url(), Some("k")).fetch_image(&prompt).await;
        assert_eq!(result, Err(ProviderError::NoResults));
    }

    #[tokio::test]
    async fn test_search_failure_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/photos")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"errors":["OAuth error: The access token is invalid"]}"#)
            .create_async()
            .await;

        let prompt = Prompt::parse("red fox").unwrap();
        match provider(&server.url(), Some("bad")).fetch_image(&prompt).await {
            Err(ProviderError::UpstreamError(reason)) => assert!(reason.contains("401")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
