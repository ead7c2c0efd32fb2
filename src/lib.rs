//! # vetcrawl - Veterinary Clinic Data Extraction
//!
//! This crate crawls the website of a veterinary clinic, turns its pages into
//! markdown and asks Gemini to extract structured clinic information from it:
//! name, contact details, opening hours, services, staff, FAQs and policies.
//!
//! ## Features
//!
//! - Same-domain, depth and page bounded crawling with `spider`
//! - Bounded aggregation of page content, one page section per source URL
//! - Schema-constrained extraction with deterministic decoding
//! - Failures reported as well-typed responses, never as raw errors
//! - An axum HTTP API around the whole pipeline
//!
//! ## Example
//!
//! ```rust,no_run
//! use vetcrawl::crawler::{CrawlParams, CrawlerConfig, SpiderCrawler};
//! use vetcrawl::extraction::GeminiExtractor;
//! use vetcrawl::gemini::Client;
//! use vetcrawl::pipeline::{Pipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = GeminiExtractor::new(Client::with_api_key("your-api-key")?);
//!     let crawler = SpiderCrawler::new(CrawlerConfig::default());
//!     let pipeline = Pipeline::new(crawler, extractor, PipelineConfig::default());
//!
//!     let url = "https://example-vet-clinic.com";
//!     let params = CrawlParams {
//!         seed: url.parse()?,
//!         url: url.to_string(),
//!         max_depth: 2,
//!         max_pages: 20,
//!     };
//!     let response = pipeline.run(&params).await;
//!
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```

mod error;
mod markdown;

pub mod aggregator;
pub mod api;
pub mod config;
pub mod crawler;
pub mod extraction;
pub mod gemini;
pub mod pipeline;

pub use error::{Error, Result};

/// Re-export of the most used types
pub mod prelude {
    pub use crate::crawler::{CrawlParams, PageResult, SiteCrawler};
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::extraction::{ClinicData, Extractor};
    pub use crate::pipeline::{CrawlResponse, Pipeline};
}
