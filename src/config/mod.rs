// Configuration module
// Author: kelexine (https://github.com/kelexine)

mod models;

pub use models::*;

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

/// Conventional credential variables, honoured when the config leaves a key unset.
pub const UNSPLASH_KEY_VAR: &str = "UNSPLASH_ACCESS_KEY";
pub const PIXABAY_KEY_VAR: &str = "PIXABAY_API_KEY";

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    ///
    /// CLI overrides are applied by the caller afterwards.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], reading the file at `path` instead of the default location.
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        let file_path = path
            .map(str::to_string)
            .unwrap_or_else(Self::default_config_path);

        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists; an explicit path must exist
            .add_source(File::with_name(&file_path).required(path.is_some()))
            // Override with environment variables (prefix: PROMPTPIX_, nesting: __)
            .add_source(
                Environment::with_prefix("PROMPTPIX")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))?;

        app_config.apply_credential_fallbacks(|name| std::env::var(name).ok());
        Ok(app_config)
    }

    /// Fill missing provider keys from the conventional variables and drop blank ones.
    pub fn apply_credential_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let unsplash = &mut self.providers.unsplash.access_key;
        if unsplash.is_none() {
            *unsplash = lookup(UNSPLASH_KEY_VAR);
        }
        *unsplash = non_blank(unsplash.take());

        let pixabay = &mut self.providers.pixabay.api_key;
        if pixabay.is_none() {
            *pixabay = lookup(PIXABAY_KEY_VAR);
        }
        *pixabay = non_blank(pixabay.take());
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".promptpix")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.providers.min_image_bytes, 750);
        assert_eq!(config.providers.placeholder.max_words, 3);
        assert!(config.providers.unsplash.access_key.is_none());
    }

    #[test]
    fn test_credential_fallback_from_lookup() {
        let mut config = AppConfig::default();
        config.apply_credential_fallbacks(|name| match name {
            UNSPLASH_KEY_VAR => Some("unsplash-key".to_string()),
            PIXABAY_KEY_VAR => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.providers.unsplash.access_key.as_deref(), Some("unsplash-key"));
        assert!(config.providers.pixabay.api_key.is_none());
    }

    #[test]
    fn test_configured_key_wins_over_fallback() {
        let mut config = AppConfig::default();
        config.providers.pixabay.api_key = Some("from-file".to_string());
        config.apply_credential_fallbacks(|_| Some("from-env".to_string()));
        assert_eq!(config.providers.pixabay.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 9191\n\n[providers]\nmin_image_bytes = 2048\n\n[providers.pixabay]\napi_key = \"abc\"\n"
        )
        .unwrap();

        let config = AppConfig::load_from(file.path().to_str()).unwrap();
        assert_eq!(config.server.port, 9191);
        assert_eq!(config.providers.min_image_bytes, 2048);
        assert_eq!(config.providers.pixabay.api_key.as_deref(), Some("abc"));
        assert_eq!(config.providers.unsplash.api_base_url, "https://api.unsplash.com");
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(AppConfig::load_from(Some("/definitely/not/here.toml")).is_err());
    }
}
