//! HTTP client implementation for the Gemini API
//!
//! This module provides the HTTP client for making requests to the Gemini API.

use crate::error::{Error, Result};
use crate::gemini::types::HttpOptions;
use rand::{thread_rng, Rng};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest wait between two rate-limited attempts, in seconds
const MAX_RETRY_DELAY_SECS: u64 = 60;

/// HTTP client for making requests to the Gemini API
///
/// This client handles authentication, request formatting, and response parsing for the Gemini API.
/// The API key travels in a header so it never appears in URLs or in error messages built from them.
///
/// The client can be configured to automatically retry requests when rate limited (HTTP 429 responses).
/// This behavior is controlled by the `retry_on_rate_limit`, `max_retries`, and `default_retry_after_secs`
/// options in the `HttpOptions` struct.
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: String,

    /// API version
    api_version: String,

    /// Whether to automatically retry requests when rate limited
    retry_on_rate_limit: bool,

    /// Maximum number of retry attempts for rate-limited requests
    max_retries: u32,

    /// Default retry delay in seconds if no Retry-After header is provided
    default_retry_after_secs: u64,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client with an API key and custom options
    pub fn with_api_key_and_options(api_key: &str, options: HttpOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| Error::Auth("API key contains invalid characters".to_string()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Other(format!("Invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Other(format!("Invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            api_version: options.api_version,
            retry_on_rate_limit: options.retry_on_rate_limit,
            max_retries: options.max_retries,
            default_retry_after_secs: options.default_retry_after_secs,
        })
    }

    /// Build a URL for the Gemini Developer API
    fn build_url(&self, path: &str) -> Result<Url> {
        let url = format!("{}/{}/{}", self.base_url, self.api_version, path);
        Url::parse(&url).map_err(|e| Error::Other(format!("Invalid URL: {}", e)))
    }

    /// Prepare a POST request with a JSON body
    #[instrument(skip(self, body), level = "debug")]
    pub async fn post<T: DeserializeOwned, B: Serialize + std::fmt::Debug>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path)?;
        debug!("Sending POST request to {}", path);
        self.execute_request(self.client.post(url).json(body)).await
    }

    /// Execute an HTTP request and handle the response
    async fn execute_request<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let mut attempts = 0;

        loop {
            // Clone the request builder for each attempt
            let request_clone = request
                .try_clone()
                .ok_or_else(|| Error::Other("Failed to clone request for retry".to_string()))?;

            let response = request_clone.send().await.map_err(Error::Http)?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                attempts += 1;

                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(self.default_retry_after_secs);

                let response_text = response.text().await.map_err(Error::Http)?;
                warn!("Rate limited: {} - {}", status, response_text);

                if self.retry_on_rate_limit && attempts <= self.max_retries {
                    let delay = backoff_delay(retry_after, attempts);
                    debug!(
                        "Retrying after {} seconds (attempt {}/{})",
                        delay, attempts, self.max_retries
                    );
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                    continue;
                }

                return Err(Error::RateLimit {
                    retry_after_secs: retry_after,
                });
            }

            let response_text = response.text().await.map_err(Error::Http)?;

            if status.is_success() {
                return serde_json::from_str(&response_text).map_err(|e| {
                    error!("Failed to parse response: {}", e);
                    Error::UnexpectedResponse(format!("Failed to parse response: {}", e))
                });
            }

            error!("API error: {} - {}", status, response_text);
            return match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(Error::Auth("Invalid API key or credentials".to_string()))
                }
                StatusCode::NOT_IMPLEMENTED => Err(Error::Unsupported(format!(
                    "Operation not supported: {}",
                    response_text
                ))),
                _ => Err(Error::Api {
                    status_code: status.as_u16(),
                    message: response_text,
                }),
            };
        }
    }
}

/// Exponential backoff with ±20% jitter, capped at one minute
fn backoff_delay(base_secs: u64, attempt: u32) -> u64 {
    let exp_factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    let mut delay = base_secs.saturating_mul(exp_factor);

    if delay > 1 {
        let jitter_factor = thread_rng().gen_range(0.8..1.2);
        delay = ((delay as f64) * jitter_factor) as u64;
    }

    delay.min(MAX_RETRY_DELAY_SECS)
}
