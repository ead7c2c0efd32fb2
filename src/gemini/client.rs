//! Client implementation for the Gemini API
//!
//! This module provides the main client interface for interacting with the Gemini API.

use crate::error::Result;
use crate::gemini::http::HttpClient;
use crate::gemini::models::ModelsService;
use crate::gemini::types::HttpOptions;

/// Client for the Gemini API
///
/// This is the main entry point for interacting with the Gemini API.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with an API key for the Gemini Developer API
    pub fn with_api_key(api_key: impl AsRef<str>) -> Result<Self> {
        Self::with_options(api_key, HttpOptions::default())
    }

    /// Create a new client with custom HTTP options
    pub fn with_options(api_key: impl AsRef<str>, options: HttpOptions) -> Result<Self> {
        let http_client = HttpClient::with_api_key_and_options(api_key.as_ref(), options)?;
        Ok(Self { http_client })
    }

    /// Access the models service
    pub fn models(&self) -> ModelsService {
        ModelsService::new(self.http_client.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_client_creation() {
        assert!(Client::with_api_key("test-key").is_ok());
    }

    #[test]
    fn test_invalid_api_key_is_rejected() {
        let result = Client::with_api_key("bad\nkey");
        assert!(matches!(result, Err(Error::Auth(_))));
    }
}
