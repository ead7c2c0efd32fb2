//! # Mock Extractor for Testing
//!
//! Provides a `MockExtractor` that implements the `Extractor` trait with a
//! canned answer, recording the content it was handed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::extraction::{ClinicData, ExtractionError, Extractor};

/// A mock extractor for testing purposes.
#[derive(Debug, Clone, Default)]
pub struct MockExtractor {
    data: ClinicData,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    last_content: Arc<Mutex<Option<String>>>,
}

impl MockExtractor {
    /// Creates a mock that answers with `data`
    pub fn with_data(data: ClinicData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Creates a mock whose API call always fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Makes every extraction wait before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of extractions started so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Content passed to the most recent extraction
    pub fn last_content(&self) -> Option<String> {
        self.last_content
            .lock()
            .map(|content| content.clone())
            .unwrap_or_default()
    }
}

impl Extractor for MockExtractor {
    async fn extract(&self, content: &str) -> Result<ClinicData, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_content.lock() {
            *last = Some(content.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failure {
            Some(message) => Err(ExtractionError::Api(message.clone())),
            None => Ok(self.data.clone()),
        }
    }
}
