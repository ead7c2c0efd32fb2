//! # Extraction Module
//!
//! Turns aggregated website text into `ClinicData` with a single
//! schema-constrained Gemini call.
//!
//! ## Key Components
//!
//! - `ClinicData`: the structured record and its JSON Schema
//! - `Extractor`: the seam the pipeline extracts through
//! - `GeminiExtractor`: the Gemini backed implementation
//! - `ExtractionError`: why an extraction failed

mod error;
pub mod mock_extractor;
mod prompt;
mod schema;

use std::future::Future;

pub use error::ExtractionError;
pub use prompt::{EXTRACTION_PROMPT, content_message};
pub use schema::{
    BusinessHours, ClinicData, DayHours, Faq, OpeningHours, ServiceHours, ServiceSchedule,
    StaffMember, TextOrList, response_schema,
};

use tracing::{debug, instrument, warn};

use crate::config::DEFAULT_MODEL;
use crate::gemini::{Client, Content, GenerationConfig, ThinkingConfig};

/// Something that can read clinic data out of website text
pub trait Extractor: Send + Sync {
    /// Extract clinic data from aggregated page content
    ///
    /// Any answer that parses as `ClinicData` is a success, even when every
    /// field is empty.
    fn extract(
        &self,
        content: &str,
    ) -> impl Future<Output = Result<ClinicData, ExtractionError>> + Send;
}

/// Extractor calling the Gemini `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiExtractor {
    client: Client,
    model: String,
    schema: serde_json::Value,
}

impl GeminiExtractor {
    /// Creates an extractor using the default model
    pub fn new(client: Client) -> Self {
        Self::with_model(client, DEFAULT_MODEL)
    }

    /// Creates an extractor using `model`
    pub fn with_model(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            schema: response_schema(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Deterministic JSON output constrained to the clinic schema
    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: Some(0.0),
            response_mime_type: Some("application/json".to_string()),
            response_json_schema: Some(self.schema.clone()),
            thinking_config: Some(ThinkingConfig { thinking_budget: 0 }),
            ..Default::default()
        }
    }
}

impl Extractor for GeminiExtractor {
    #[instrument(skip_all, fields(model = %self.model, content_chars = content.len()))]
    async fn extract(&self, content: &str) -> Result<ClinicData, ExtractionError> {
        let system = Content::new().with_text(EXTRACTION_PROMPT);
        let request = Content::new()
            .with_role("user")
            .with_text(content_message(content));

        let response = self
            .client
            .models()
            .generate_content_with_config(
                self.model.as_str(),
                Some(system),
                vec![request],
                Some(self.generation_config()),
            )
            .await?;

        if let Some(reason) = response.block_reason() {
            warn!(reason, "Extraction prompt was blocked");
            return Err(ExtractionError::Blocked(reason.to_string()));
        }

        let text = response.text();
        if text.trim().is_empty() {
            let reason = response.finish_reason().unwrap_or("UNKNOWN").to_string();
            warn!(%reason, "Model returned no content");
            return Err(ExtractionError::EmptyResponse(reason));
        }

        let data: ClinicData = serde_json::from_str(&text)?;
        debug!(fields = ?data.present_fields(), "Parsed clinic data");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::HttpOptions;
    use mockito::{Matcher, Server, ServerGuard};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn extractor_for(server: &ServerGuard) -> GeminiExtractor {
        let options = HttpOptions {
            base_url: server.url(),
            retry_on_rate_limit: false,
            ..HttpOptions::default()
        };
        GeminiExtractor::new(Client::with_options("test-key", options).unwrap())
    }

    fn answer(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_request_is_schema_constrained() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(serde_json::json!({
                    "generationConfig": {
                        "temperature": 0.0,
                        "responseMimeType": "application/json",
                        "thinkingConfig": {"thinkingBudget": 0}
                    },
                    "systemInstruction": {"parts": [{"text": EXTRACTION_PROMPT}]},
                    "contents": [{
                        "role": "user",
                        "parts": [{"text": "Website content:\n\n--- PAGE: https://vet.test/ ---\nHappy Paws Veterinary\n\n"}]
                    }]
                })),
                Matcher::Regex("responseJsonSchema".to_string()),
            ]))
            .with_status(200)
            .with_body(answer(r#"{"name": "Happy Paws"}"#))
            .create_async()
            .await;

        let data = extractor_for(&server)
            .extract("--- PAGE: https://vet.test/ ---\nHappy Paws Veterinary\n\n")
            .await
            .unwrap();

        assert_eq!(data.name.as_deref(), Some("Happy Paws"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_hours_for_one_day_only() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .match_body(Matcher::Regex("Monday 9am-5pm".to_string()))
            .with_status(200)
            .with_body(answer(r#"{"business_hours": {"monday": "9am-5pm"}}"#))
            .create_async()
            .await;

        let data = extractor_for(&server)
            .extract("--- PAGE: https://vet.test/hours ---\nMonday 9am-5pm\n\n")
            .await
            .unwrap();

        let hours = data.business_hours.as_ref().and_then(OpeningHours::weekly).unwrap();
        assert_eq!(hours.monday, Some(DayHours::Text("9am-5pm".to_string())));
        assert!(hours.tuesday.is_none());
        assert!(hours.sunday.is_none());
    }

    #[tokio::test]
    async fn test_empty_object_is_a_success() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(answer("{}"))
            .create_async()
            .await;

        let data = extractor_for(&server).extract("nothing useful").await.unwrap();
        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(answer("The clinic is called Happy Paws"))
            .create_async()
            .await;

        let result = extractor_for(&server).extract("content").await;
        assert!(matches!(result, Err(ExtractionError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_blocked_and_empty_answers() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let result = extractor_for(&server).extract("content").await;
        assert!(matches!(result, Err(ExtractionError::Blocked(reason)) if reason == "SAFETY"));

        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .with_status(200)
            .with_body(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#)
            .create_async()
            .await;

        let result = extractor_for(&server).extract("content").await;
        assert!(matches!(result, Err(ExtractionError::EmptyResponse(reason)) if reason == "MAX_TOKENS"));
    }

    #[tokio::test]
    async fn test_api_failures() {
        let mut server = Server::new_async().await;
        let _unauthorized = server
            .mock("POST", GENERATE_PATH)
            .with_status(401)
            .with_body("{}")
            .create_async()
            .await;

        let result = extractor_for(&server).extract("content").await;
        assert!(matches!(result, Err(ExtractionError::Auth(_))));

        let mut server = Server::new_async().await;
        let _limited = server
            .mock("POST", GENERATE_PATH)
            .with_status(429)
            .with_header("retry-after", "30")
            .with_body("{}")
            .create_async()
            .await;

        let result = extractor_for(&server).extract("content").await;
        assert!(matches!(result, Err(ExtractionError::RateLimit(30))));
    }
}
