//! # Site Crawler Module
//!
//! This module crawls a clinic website and turns its pages into markdown. It is
//! the first stage of the extraction pipeline, responsible for gathering the raw
//! content the model reads.
//!
//! ## Key Components
//!
//! - `CrawlParams`: validated seed URL and depth/page limits for one crawl
//! - `CrawlerConfig`: politeness and filtering settings shared by all crawls
//! - `PageResult`: one crawled page with its markdown content
//! - `SiteCrawler`: the seam the pipeline crawls through
//! - `SpiderCrawler`: the `spider` backed implementation
//!
//! ## Features
//!
//! - Same-domain breadth-first traversal bounded by depth and page count
//! - HTML to Markdown conversion with images stripped
//! - Feeds, sitemaps, API endpoints and downloads are skipped
//! - Failed pages are dropped, an unreachable seed fails the whole crawl

mod config;
mod content_extraction;
mod error;
pub mod mock_crawler;
mod spider_integration;

use std::future::Future;
use std::ops::RangeInclusive;

pub use config::CrawlerConfig;
pub use content_extraction::{discover_links, extract_title, should_skip_url, strip_images};
pub use error::CrawlError;
pub use spider_integration::crawl_website;

use serde::{Deserialize, Serialize};
use url::Url;

/// Accepted range for the crawl depth
pub const DEPTH_RANGE: RangeInclusive<u32> = 1..=10;

/// Accepted range for the page limit
pub const PAGES_RANGE: RangeInclusive<u32> = 1..=200;

/// Depth used when a request does not name one
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Page limit used when a request does not name one
pub const DEFAULT_MAX_PAGES: u32 = 50;

/// Validated input of a single crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlParams {
    /// Seed URL, the crawl never leaves its domain
    pub seed: Url,

    /// The URL exactly as the caller sent it
    pub url: String,

    /// Maximum link depth, the seed is depth 0
    pub max_depth: u32,

    /// Maximum number of pages returned
    pub max_pages: u32,
}

/// A crawled page with its markdown content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// URL of the page
    pub url: String,

    /// Contents of the `<title>` element, if any
    pub title: Option<String>,

    /// Content of the page in Markdown format
    pub content: String,

    /// Link depth at which the page was discovered
    pub depth: u32,
}

/// Something that can crawl a site
///
/// Implementations return pages in discovery order, never deeper than
/// `max_depth` and never more than `max_pages` of them.
pub trait SiteCrawler: Send + Sync {
    /// Crawl the site named by `params`
    fn crawl(
        &self,
        params: &CrawlParams,
    ) -> impl Future<Output = Result<Vec<PageResult>, CrawlError>> + Send;
}

/// Crawler backed by the `spider` crate
#[derive(Debug, Clone, Default)]
pub struct SpiderCrawler {
    config: CrawlerConfig,
}

impl SpiderCrawler {
    pub fn new(config: CrawlerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }
}

impl SiteCrawler for SpiderCrawler {
    async fn crawl(&self, params: &CrawlParams) -> Result<Vec<PageResult>, CrawlError> {
        crawl_website(params, &self.config).await
    }
}
