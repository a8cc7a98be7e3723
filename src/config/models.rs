//! Configuration data structures for the promptpix service.
//!
//! This module defines the schema for the application settings: server
//! parameters, per-provider credentials and endpoints, and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, workers).
    #[serde(default)]
    pub server: ServerConfig,

    /// Image provider chain settings.
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads for the Tokio runtime.
    /// Default: Number of logical CPU cores.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum accepted request body, in bytes.
    /// Default: `64 KiB`
    #[serde(default = "default_body_limit")]
    pub max_body_bytes: usize,
}

/// Settings shared by every provider adapter, plus one block per provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Upper bound on a single provider attempt (search plus download), in seconds.
    /// Default: `10`
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_seconds: u64,

    /// TCP connect timeout for upstream calls, in seconds.
    /// Default: `5`
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Downloads smaller than this many bytes are treated as error pages.
    /// Default: `750`
    #[serde(default = "default_min_image_bytes")]
    pub min_image_bytes: usize,

    #[serde(default)]
    pub unsplash: UnsplashConfig,

    #[serde(default)]
    pub pixabay: PixabayConfig,

    #[serde(default)]
    pub placeholder: PlaceholderConfig,
}

/// Unsplash photo search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsplashConfig {
    /// Access key sent as `Authorization: Client-ID <key>`.
    /// Falls back to `UNSPLASH_ACCESS_KEY` when unset.
    #[serde(default)]
    pub access_key: Option<String>,

    #[serde(default = "default_unsplash_url")]
    pub api_base_url: String,
}

/// Pixabay stock photo search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixabayConfig {
    /// API key sent as the `key` query parameter.
    /// Falls back to `PIXABAY_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_pixabay_url")]
    pub api_base_url: String,
}

/// Text banner placeholder service. Needs no credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// Base URL of the banner service; empty disables the provider.
    #[serde(default = "default_placeholder_url")]
    pub base_url: String,

    /// Number of leading prompt words rendered on the banner.
    /// Default: `3`
    #[serde(default = "default_placeholder_words")]
    pub max_words: usize,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            max_body_bytes: default_body_limit(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_seconds: default_attempt_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            min_image_bytes: default_min_image_bytes(),
            unsplash: UnsplashConfig::default(),
            pixabay: PixabayConfig::default(),
            placeholder: PlaceholderConfig::default(),
        }
    }
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            access_key: None,
            api_base_url: default_unsplash_url(),
        }
    }
}

impl Default for PixabayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_pixabay_url(),
        }
    }
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            base_url: default_placeholder_url(),
            max_words: default_placeholder_words(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_body_limit() -> usize {
    64 * 1024
}

fn default_attempt_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_min_image_bytes() -> usize {
    750
}

fn default_unsplash_url() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_pixabay_url() -> String {
    "https://pixabay.com".to_string()
}

fn default_placeholder_url() -> String {
    "https://via.placeholder.com".to_string()
}

fn default_placeholder_words() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
