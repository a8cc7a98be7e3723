// promptpix - prompt-to-image service with provider fallback
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod server;
pub mod synthetic;
pub mod utils;
