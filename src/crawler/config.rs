//! # Crawler Configuration Module
//!
//! Settings shared by every crawl the service performs. Per-request limits
//! (depth, page count) live in `CrawlParams` instead.
//!
//! ## Features
//!
//! - Defaults suitable for polite crawling of small clinic sites
//! - Builder pattern for flexible configuration
//! - Skip patterns for feeds, sitemaps, API endpoints and downloads

use std::time::Duration;

/// URL fragments that never point at clinic content
const DEFAULT_SKIP_PATTERNS: &[&str] = &[
    "/feed/",
    "/rss/",
    "/atom/",
    "robots.txt",
    "sitemap.xml",
    "/wp-json/",
    "/api/",
    "/download/",
];

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Rate limit in milliseconds between requests
    pub rate_limit_ms: u64,

    /// Whether to respect robots.txt
    pub respect_robots_txt: bool,

    /// User agent to use for requests
    pub user_agent: String,

    /// Pages with less markdown than this are dropped
    pub min_content_length: usize,

    /// Lowercase URL fragments that mark a page as non-content
    pub skip_patterns: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            rate_limit_ms: 0,
            respect_robots_txt: true,
            user_agent: format!("vetcrawl/{}", env!("CARGO_PKG_VERSION")),
            min_content_length: 100,
            skip_patterns: DEFAULT_SKIP_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Builder for CrawlerConfig
#[derive(Debug, Default)]
pub struct CrawlerConfigBuilder {
    config: CrawlerConfig,
}

impl CrawlerConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    /// Set the rate limit in milliseconds between requests
    pub fn rate_limit_ms(mut self, rate_limit_ms: u64) -> Self {
        self.config.rate_limit_ms = rate_limit_ms;
        self
    }

    /// Set whether to respect robots.txt
    pub fn respect_robots_txt(mut self, respect_robots_txt: bool) -> Self {
        self.config.respect_robots_txt = respect_robots_txt;
        self
    }

    /// Set the user agent to use for requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the minimum markdown length of a kept page
    pub fn min_content_length(mut self, min_content_length: usize) -> Self {
        self.config.min_content_length = min_content_length;
        self
    }

    /// Replace the skip patterns
    pub fn skip_patterns(mut self, skip_patterns: Vec<String>) -> Self {
        self.config.skip_patterns = skip_patterns
            .into_iter()
            .map(|p| p.to_lowercase())
            .collect();
        self
    }

    /// Build the configuration
    pub fn build(self) -> CrawlerConfig {
        self.config
    }
}

impl CrawlerConfig {
    /// Create a new builder
    pub fn builder() -> CrawlerConfigBuilder {
        CrawlerConfigBuilder::new()
    }

    /// Get the rate limit as a Duration
    pub fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }
}
