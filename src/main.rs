// promptpix - prompt-to-image service with provider fallback
// Author: kelexine (https://github.com/kelexine)

use anyhow::{Context, Result};
use clap::Parser;
use promptpix::cli::Args;
use promptpix::config::AppConfig;
use promptpix::pipeline::{Acquisition, AcquisitionPipeline};
use promptpix::server::create_router;
use promptpix::utils::logging;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load_from(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting promptpix v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.server.workers.max(1))
        .enable_all()
        .build()
        .context("failed to build Tokio runtime")?;

    runtime.block_on(run(args, config))
}

async fn run(args: Args, config: AppConfig) -> Result<()> {
    // Phase 3: Build the provider chain
    let pipeline = AcquisitionPipeline::from_config(&config.providers)?;
    for provider in pipeline.providers() {
        info!(
            "Provider {}: {}",
            provider.name(),
            if provider.is_configured() { "configured" } else { "not configured" }
        );
    }

    // Phase 3.5: Handle --probe (one-shot diagnostics, no server)
    if let Some(prompt) = args.probe.as_deref() {
        let acquisition = pipeline.acquire_raw(prompt).await?;
        print_probe(&acquisition, args.json)?;
        return Ok(());
    }

    // Phase 4: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, pipeline)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

fn print_probe(acquisition: &Acquisition, json: bool) -> Result<()> {
    let summaries: Vec<_> = acquisition.attempts.iter().map(|a| a.summary()).collect();

    if json {
        let report = serde_json::json!({
            "request_id": acquisition.request_id,
            "source": acquisition.source,
            "attempts": summaries,
            "encoded_length": acquisition.image.as_str().len(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{:<12} {:<20} {:>8}  detail", "provider", "outcome", "ms");
    for s in &summaries {
        println!("{:<12} {:<20} {:>8}  {}", s.provider, s.outcome, s.elapsed_ms, s.detail);
    }
    println!(
        "\nserved by {} ({} chars of data URI)",
        acquisition.source,
        acquisition.image.as_str().len()
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
