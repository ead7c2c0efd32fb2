//! Error types for the crawler module

use thiserror::Error;

/// Error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// No page of the site could be fetched
    #[error("Could not reach {0}")]
    Unreachable(String),

    /// The crawl did not finish in time
    #[error("Crawl timed out after {0} seconds")]
    Timeout(u64),

    /// The page collecting task failed
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

impl From<tokio::task::JoinError> for CrawlError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::TaskJoin(err.to_string())
    }
}
