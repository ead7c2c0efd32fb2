//! # HTTP API
//!
//! The axum router of the service:
//!
//! - `GET /` and `GET /v1/hello`: liveness messages
//! - `POST /v1/scraper/crawl`: crawl a clinic site and extract its data
//! - `GET /v1/scraper/health`: health of the scraper service
//!
//! Malformed or out-of-range requests are answered with a 4xx and a
//! `{"detail": "..."}` body before any crawling starts. Everything that goes
//! wrong afterwards is reported inside a 200 [`CrawlResponse`].

mod error;
mod request;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::{ApiError, ValidationError};
pub use request::CrawlRequest;

use crate::crawler::SiteCrawler;
use crate::extraction::Extractor;
use crate::pipeline::{CrawlResponse, Pipeline};

/// Build the service router around a pipeline
pub fn router<C, E>(pipeline: Arc<Pipeline<C, E>>) -> Router
where
    C: SiteCrawler + 'static,
    E: Extractor + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/v1/hello", get(hello))
        .route("/v1/scraper/crawl", post(crawl::<C, E>))
        .route("/v1/scraper/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Simple API is running" }))
}

async fn hello() -> Json<Value> {
    info!("Hello endpoint called");
    Json(json!({ "message": "Hello" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "service": "scraper" }))
}

async fn crawl<C, E>(
    State(pipeline): State<Arc<Pipeline<C, E>>>,
    payload: Result<Json<CrawlRequest>, JsonRejection>,
) -> Result<Json<CrawlResponse>, ApiError>
where
    C: SiteCrawler + 'static,
    E: Extractor + 'static,
{
    let Json(request) = payload?;
    let params = request.validate()?;

    info!(url = %request.url, "POST /v1/scraper/crawl");
    Ok(Json(pipeline.run(&params).await))
}
