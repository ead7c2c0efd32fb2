//! # Mock Crawler for Testing
//!
//! Provides a `MockCrawler` that implements the `SiteCrawler` trait for use in
//! tests. It returns canned pages, an unreachable-seed failure, or stalls for a
//! while to exercise timeouts, without touching the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::crawler::{CrawlError, CrawlParams, PageResult, SiteCrawler};

/// A mock crawler for testing purposes.
#[derive(Debug, Clone, Default)]
pub struct MockCrawler {
    pages: Vec<PageResult>,
    unreachable: bool,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockCrawler {
    /// Creates a mock that returns the given pages
    pub fn with_pages(pages: Vec<PageResult>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// Creates a mock whose seed can never be reached
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Makes every crawl wait before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of crawls started so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Helper to build a page at the given depth
    pub fn page(url: &str, depth: u32, content: &str) -> PageResult {
        PageResult {
            url: url.to_string(),
            title: None,
            content: content.to_string(),
            depth,
        }
    }
}

impl SiteCrawler for MockCrawler {
    async fn crawl(&self, params: &CrawlParams) -> Result<Vec<PageResult>, CrawlError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.unreachable {
            return Err(CrawlError::Unreachable(params.seed.to_string()));
        }

        Ok(self
            .pages
            .iter()
            .filter(|page| page.depth <= params.max_depth)
            .take(params.max_pages as usize)
            .cloned()
            .collect())
    }
}
