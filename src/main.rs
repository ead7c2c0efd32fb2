//! # vetcrawl server
//!
//! Starts the HTTP service: reads the configuration, installs logging, builds
//! the crawler, the Gemini extractor and the pipeline, then serves the API
//! until interrupted.

mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use vetcrawl::api;
use vetcrawl::config::Config;
use vetcrawl::crawler::SpiderCrawler;
use vetcrawl::extraction::GeminiExtractor;
use vetcrawl::gemini::Client;
use vetcrawl::pipeline::Pipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.validate().context("Invalid configuration")?;
    let addr = config.bind_addr()?;

    let _telemetry = telemetry::init_tracing_subscriber(&config)?;

    let client = Client::with_api_key(&config.gemini_api_key)
        .context("Failed to create Gemini client")?;
    let extractor = GeminiExtractor::with_model(client, &config.model);
    let crawler = SpiderCrawler::new(config.crawler_config());
    let pipeline = Arc::new(Pipeline::new(crawler, extractor, config.pipeline_config()));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, model = %config.model, "Starting server");

    axum::serve(listener, api::router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
