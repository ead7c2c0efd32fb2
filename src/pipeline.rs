//! # Crawl and Extract Pipeline
//!
//! Runs the three stages of a request in order: crawl the site, aggregate the
//! pages into one bounded text, extract clinic data from it. Every outcome,
//! including failures, ends in a [`CrawlResponse`].
//!
//! The crawl and the extraction call are each bounded by a timeout. When
//! aggregation leaves nothing worth reading, the extraction call is skipped.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{info, instrument, warn};

use crate::aggregator::{AggregatorConfig, aggregate};
use crate::crawler::{CrawlError, CrawlParams, SiteCrawler};
use crate::extraction::{ClinicData, ExtractionError, Extractor};

/// Error reported when a crawl produced nothing to extract from
pub const NO_CONTENT_MESSAGE: &str = "No content found on the website";

/// Configuration for the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Upper bound for a whole crawl
    pub crawl_timeout: Duration,

    /// Upper bound for the extraction call, retries included
    pub extraction_timeout: Duration,

    /// Content budget settings
    pub aggregator: AggregatorConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            crawl_timeout: Duration::from_secs(120),
            extraction_timeout: Duration::from_secs(120),
            aggregator: AggregatorConfig::default(),
        }
    }
}

/// Pipeline step a request failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Crawling,
    Aggregating,
    Extracting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Crawling => "crawling",
            Stage::Aggregating => "aggregating",
            Stage::Extracting => "extracting",
        };
        f.write_str(name)
    }
}

/// Result envelope of one crawl request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResponse {
    /// Whether extraction produced clinic data
    pub success: bool,

    /// The crawled site
    pub url: String,

    /// Pages whose content was handed to extraction
    pub pages_crawled: usize,

    /// Extracted data, an empty record on failure
    pub data: Option<ClinicData>,

    /// What went wrong, on failure
    pub error: Option<String>,
}

impl CrawlResponse {
    pub fn success(url: impl Into<String>, pages_crawled: usize, data: ClinicData) -> Self {
        Self {
            success: true,
            url: url.into(),
            pages_crawled,
            data: Some(data),
            error: None,
        }
    }

    /// A failed outcome, still carrying a well-typed empty `data`
    pub fn failure(url: impl Into<String>, pages_crawled: usize, error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: url.into(),
            pages_crawled,
            data: Some(ClinicData::default()),
            error: Some(error.into()),
        }
    }
}

/// Crawl, aggregate and extract, through pluggable crawler and extractor
#[derive(Debug, Clone)]
pub struct Pipeline<C, E> {
    crawler: C,
    extractor: E,
    config: PipelineConfig,
}

impl<C: SiteCrawler, E: Extractor> Pipeline<C, E> {
    pub fn new(crawler: C, extractor: E, config: PipelineConfig) -> Self {
        Self {
            crawler,
            extractor,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one request to completion
    ///
    /// Never fails: crawl and extraction problems are reported in the
    /// returned envelope.
    #[instrument(skip_all, fields(url = %params.url, max_depth = params.max_depth, max_pages = params.max_pages))]
    pub async fn run(&self, params: &CrawlParams) -> CrawlResponse {
        let url = params.url.clone();

        info!("Crawling site");
        let pages = match timeout(self.config.crawl_timeout, self.crawler.crawl(params)).await {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => return fail(Stage::Crawling, url, 0, e.to_string()),
            Err(_) => {
                let err = CrawlError::Timeout(self.config.crawl_timeout.as_secs());
                return fail(Stage::Crawling, url, 0, err.to_string());
            }
        };
        if pages.is_empty() {
            return fail(Stage::Crawling, url, 0, NO_CONTENT_MESSAGE);
        }
        info!(pages = pages.len(), "Crawl finished");

        let aggregated = aggregate(&pages, &self.config.aggregator);
        let pages_crawled = aggregated.pages_included;
        if !aggregated.is_usable(&self.config.aggregator) {
            return fail(Stage::Aggregating, url, pages_crawled, NO_CONTENT_MESSAGE);
        }

        info!(pages_crawled, chars = aggregated.text.len(), "Extracting clinic data");
        let extracted = timeout(
            self.config.extraction_timeout,
            self.extractor.extract(&aggregated.text),
        )
        .await
        .unwrap_or_else(|_| {
            Err(ExtractionError::Timeout(
                self.config.extraction_timeout.as_secs(),
            ))
        });

        match extracted {
            Ok(data) => {
                log_clinic_data(&data);
                CrawlResponse::success(url, pages_crawled, data)
            }
            Err(e) => fail(
                Stage::Extracting,
                url,
                pages_crawled,
                format!("Data extraction failed: {e}"),
            ),
        }
    }
}

fn fail(stage: Stage, url: String, pages_crawled: usize, error: impl Into<String>) -> CrawlResponse {
    let error = error.into();
    warn!(%stage, pages_crawled, %error, "Pipeline failed");
    CrawlResponse::failure(url, pages_crawled, error)
}

fn log_clinic_data(data: &ClinicData) {
    info!(
        name = ?data.name,
        phone = ?data.phone,
        email = ?data.email,
        address = ?data.address,
        business_hours = ?data.business_hours,
        services = ?data.services,
        staff = ?data.staff,
        faqs = ?data.faqs,
        policies = ?data.policies,
        additional_info = ?data.additional_info,
        "Extracted clinic data"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::mock_crawler::MockCrawler;
    use crate::extraction::mock_extractor::MockExtractor;
    use crate::extraction::{DayHours, OpeningHours};
    use url::Url;

    fn params(max_depth: u32, max_pages: u32) -> CrawlParams {
        CrawlParams {
            seed: Url::parse("https://happypaws.test/").unwrap(),
            url: "https://happypaws.test".to_string(),
            max_depth,
            max_pages,
        }
    }

    fn site() -> Vec<crate::crawler::PageResult> {
        vec![
            MockCrawler::page("https://happypaws.test/", 0, &"Welcome to Happy Paws Veterinary Clinic. ".repeat(5)),
            MockCrawler::page("https://happypaws.test/hours", 1, "Monday 9am-5pm. Tuesday to Sunday closed for renovation works."),
            MockCrawler::page("https://happypaws.test/team", 1, "Dr. Jane Doe, lead veterinarian with a focus on feline medicine."),
            MockCrawler::page("https://happypaws.test/team/jane", 2, "Jane has been treating cats since 2004 and loves them all."),
        ]
    }

    #[tokio::test]
    async fn test_successful_run() {
        let data = ClinicData {
            name: Some("Happy Paws".to_string()),
            ..ClinicData::default()
        };
        let extractor = MockExtractor::with_data(data.clone());
        let pipeline = Pipeline::new(
            MockCrawler::with_pages(site()),
            extractor.clone(),
            PipelineConfig::default(),
        );

        let response = pipeline.run(&params(3, 50)).await;

        assert!(response.success);
        assert_eq!(response.url, "https://happypaws.test");
        assert_eq!(response.pages_crawled, 4);
        assert_eq!(response.data, Some(data));
        assert!(response.error.is_none());

        let content = extractor.last_content().unwrap();
        assert!(content.starts_with("--- PAGE: https://happypaws.test/ ---\n"));
        assert!(content.contains("--- PAGE: https://happypaws.test/hours ---\nMonday 9am-5pm"));
    }

    #[tokio::test]
    async fn test_pages_crawled_respects_limits() {
        let pipeline = Pipeline::new(
            MockCrawler::with_pages(site()),
            MockExtractor::default(),
            PipelineConfig::default(),
        );

        assert_eq!(pipeline.run(&params(1, 50)).await.pages_crawled, 3);
        assert_eq!(pipeline.run(&params(3, 2)).await.pages_crawled, 2);
    }

    #[tokio::test]
    async fn test_unreachable_seed() {
        let extractor = MockExtractor::default();
        let pipeline = Pipeline::new(
            MockCrawler::unreachable(),
            extractor.clone(),
            PipelineConfig::default(),
        );

        let response = pipeline.run(&params(3, 50)).await;

        assert!(!response.success);
        assert_eq!(response.pages_crawled, 0);
        assert_eq!(response.data, Some(ClinicData::default()));
        assert_eq!(
            response.error.as_deref(),
            Some("Could not reach https://happypaws.test/")
        );
        assert_eq!(extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_crawl_timeout() {
        let config = PipelineConfig {
            crawl_timeout: Duration::from_millis(20),
            ..PipelineConfig::default()
        };
        let extractor = MockExtractor::default();
        let pipeline = Pipeline::new(
            MockCrawler::with_pages(site()).with_delay(Duration::from_secs(5)),
            extractor.clone(),
            config,
        );

        let response = pipeline.run(&params(3, 50)).await;

        assert!(!response.success);
        assert_eq!(response.pages_crawled, 0);
        assert_eq!(
            serde_json::to_value(&response.data).unwrap(),
            serde_json::json!({})
        );
        assert!(response.error.unwrap().contains("timed out"));
        assert_eq!(extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_no_usable_content_skips_extraction() {
        let extractor = MockExtractor::default();
        let pipeline = Pipeline::new(
            MockCrawler::with_pages(vec![
                MockCrawler::page("https://happypaws.test/", 0, "   "),
                MockCrawler::page("https://happypaws.test/a", 1, "***\n\n[](https://happypaws.test/b)"),
            ]),
            extractor.clone(),
            PipelineConfig::default(),
        );

        let response = pipeline.run(&params(3, 50)).await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some(NO_CONTENT_MESSAGE));
        assert_eq!(extractor.calls(), 0);

        let empty = Pipeline::new(
            MockCrawler::with_pages(Vec::new()),
            extractor.clone(),
            PipelineConfig::default(),
        );
        let response = empty.run(&params(3, 50)).await;
        assert_eq!(response.pages_crawled, 0);
        assert_eq!(response.error.as_deref(), Some(NO_CONTENT_MESSAGE));
        assert_eq!(extractor.calls(), 0);
    }

    #[tokio::test]
    async fn test_extraction_failure() {
        let pipeline = Pipeline::new(
            MockCrawler::with_pages(site()),
            MockExtractor::failing("quota exhausted"),
            PipelineConfig::default(),
        );

        let response = pipeline.run(&params(3, 50)).await;

        assert!(!response.success);
        assert_eq!(response.pages_crawled, 4);
        assert_eq!(response.data, Some(ClinicData::default()));
        assert_eq!(
            response.error.as_deref(),
            Some("Data extraction failed: Model API error: quota exhausted")
        );
    }

    #[tokio::test]
    async fn test_extraction_timeout() {
        let config = PipelineConfig {
            extraction_timeout: Duration::from_millis(20),
            ..PipelineConfig::default()
        };
        let pipeline = Pipeline::new(
            MockCrawler::with_pages(site()),
            MockExtractor::default().with_delay(Duration::from_secs(5)),
            config,
        );

        let response = pipeline.run(&params(3, 50)).await;

        assert!(!response.success);
        assert_eq!(response.pages_crawled, 4);
        assert!(response.error.unwrap().contains("Extraction timed out"));
    }

    #[tokio::test]
    async fn test_empty_extraction_is_success() {
        let pipeline = Pipeline::new(
            MockCrawler::with_pages(site()),
            MockExtractor::with_data(ClinicData::default()),
            PipelineConfig::default(),
        );

        let response = pipeline.run(&params(3, 50)).await;

        assert!(response.success);
        assert!(response.error.is_none());
        assert!(response.data.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_day_hours_pass_through() {
        let data: ClinicData =
            serde_json::from_str(r#"{"business_hours": {"monday": "9am-5pm"}}"#).unwrap();
        let pipeline = Pipeline::new(
            MockCrawler::with_pages(site()),
            MockExtractor::with_data(data),
            PipelineConfig::default(),
        );

        let response = pipeline.run(&params(3, 50)).await;
        let data = response.data.unwrap();
        let hours = data.business_hours.as_ref().and_then(OpeningHours::weekly).unwrap();

        assert_eq!(hours.monday, Some(DayHours::Text("9am-5pm".to_string())));
        assert_eq!(hours.known_days().len(), 1);
    }

    #[test]
    fn test_failure_envelope_shape() {
        let json = serde_json::to_value(CrawlResponse::failure("https://x.test/", 0, "boom")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "url": "https://x.test/",
                "pages_crawled": 0,
                "data": {},
                "error": "boom"
            })
        );
    }
}
