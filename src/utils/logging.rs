//! Structured logging and credential redaction.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides `sanitize`, which strips provider API keys out of upstream
//! error text before it reaches a log sink.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    // Configure filter from environment or config file
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

/// Sanitizes provider credentials from log messages.
///
/// Handles the two shapes used by the configured providers:
/// - `key=<value>` query parameters (Pixabay).
/// - `Client-ID <value>` authorization headers (Unsplash).
///
/// Every occurrence is replaced with `\[REDACTED\]`.
pub fn sanitize(input: &str) -> String {
    let result = redact_after(input, "key=", |c| c == '&' || c == '"' || c == '\'' || c.is_whitespace() || c == ')');
    redact_after(&result, "Client-ID ", |c| c == '"' || c == '\'' || c.is_whitespace() || c == ',')
}

fn redact_after<F>(input: &str, marker: &str, is_end: F) -> String
where
    F: Fn(char) -> bool,
{
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(marker) {
        let value_start = pos + marker.len();
        result.push_str(&rest[..value_start]);

        // Search for the end of the value (delimiter or end of string)
        let tail = &rest[value_start..];
        let end = tail.find(|c: char| is_end(c)).unwrap_or(tail.len());
        if end > 0 {
            result.push_str("[REDACTED]");
        }
        rest = &tail[end..];
    }

    result.push_str(rest);
    result
}
