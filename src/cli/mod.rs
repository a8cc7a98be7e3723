// CLI module for promptpix
// Author: kelexine (https://github.com/kelexine)

use crate::config::AppConfig;
use clap::Parser;

/// promptpix - prompt-to-image service with provider fallback
#[derive(Parser, Debug)]
#[command(name = "promptpix", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.promptpix/config.toml)
    #[arg(long, env = "PROMPTPIX_CONFIG")]
    pub config: Option<String>,

    /// Override the bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    pub port: Option<u16>,

    /// Run the provider chain once for PROMPT, print every attempt, and exit
    #[arg(long, value_name = "PROMPT")]
    pub probe: Option<String>,

    /// Print probe results as JSON
    #[arg(long, requires = "probe")]
    pub json: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
