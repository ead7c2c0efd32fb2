//! # Service Configuration
//!
//! All settings are read once at startup, from command line flags or the
//! matching environment variables, into a single immutable [`Config`]. The
//! pipeline and the clients receive the pieces they need from it explicitly.
//!
//! ## Key Components
//!
//! - `Config`: the parsed settings, usable directly as a `clap` parser
//! - `ConfigError`: raised when a setting is missing or unusable
//!
//! Startup fails fast on a missing or blank `GEMINI_API_KEY`.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::aggregator::AggregatorConfig;
use crate::crawler::CrawlerConfig;
use crate::pipeline::PipelineConfig;

/// Default Gemini model used for extraction
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Error type for configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was not provided
    #[error("{0} is required")]
    Missing(&'static str),

    /// A setting was provided but cannot be used
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Name of the setting
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Process-wide settings
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Crawl veterinary clinic websites and extract structured clinic data", long_about = None)]
pub struct Config {
    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP server to
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Google Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    /// Gemini model used for extraction
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Upper bound for a whole site crawl, in seconds
    #[arg(long, env = "CRAWL_TIMEOUT_SECS", default_value = "120")]
    pub crawl_timeout_secs: u64,

    /// Upper bound for the extraction call, in seconds
    #[arg(long, env = "EXTRACTION_TIMEOUT_SECS", default_value = "120")]
    pub extraction_timeout_secs: u64,

    /// Character budget for the aggregated content sent to the model
    #[arg(long, env = "MAX_TOTAL_CHARS", default_value = "500000")]
    pub max_total_chars: usize,

    /// Per-page character cap applied before aggregation
    #[arg(long, env = "MAX_CHARS_PER_PAGE", default_value = "50000")]
    pub max_chars_per_page: usize,

    /// Delay between page requests in milliseconds
    #[arg(long, env = "CRAWL_DELAY_MS", default_value = "0")]
    pub crawl_delay_ms: u64,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Export traces and metrics over OTLP
    #[arg(long, env = "OTEL_ENABLED")]
    pub otel: bool,
}

impl Config {
    /// Check the settings that clap cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(ConfigError::Missing("GEMINI_API_KEY"));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "GEMINI_MODEL",
                reason: "must not be empty".to_string(),
            });
        }

        let non_zero = [
            ("CRAWL_TIMEOUT_SECS", self.crawl_timeout_secs as usize),
            ("EXTRACTION_TIMEOUT_SECS", self.extraction_timeout_secs as usize),
            ("MAX_TOTAL_CHARS", self.max_total_chars),
            ("MAX_CHARS_PER_PAGE", self.max_chars_per_page),
        ];
        for (name, value) in non_zero {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    name,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        self.bind_addr()?;
        Ok(())
    }

    /// Socket address the server listens on
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ConfigError::Invalid {
                name: "HOST",
                reason: e.to_string(),
            })?
            .next()
            .ok_or_else(|| ConfigError::Invalid {
                name: "HOST",
                reason: format!("{} does not resolve to an address", self.host),
            })
    }

    /// Crawler settings derived from this configuration
    pub fn crawler_config(&self) -> CrawlerConfig {
        CrawlerConfig::builder()
            .rate_limit_ms(self.crawl_delay_ms)
            .build()
    }

    /// Pipeline settings derived from this configuration
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            crawl_timeout: Duration::from_secs(self.crawl_timeout_secs),
            extraction_timeout: Duration::from_secs(self.extraction_timeout_secs),
            aggregator: self.aggregator_config(),
        }
    }

    /// Aggregator settings derived from this configuration
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            max_total_chars: self.max_total_chars,
            max_chars_per_page: self.max_chars_per_page,
            ..AggregatorConfig::default()
        }
    }
}
