//! Gemini API client
//!
//! A small client for the `generateContent` endpoint of Google's Gemini API,
//! with structured output support and retries on rate limiting.

mod client;
mod http;
mod models;
mod types;

pub use client::Client;
pub use models::ModelsService;
pub use types::{
    Candidate, Content, DEFAULT_BASE_URL, GenerateContentResponse, GenerationConfig,
    HttpOptions, Part, PromptFeedback, ThinkingConfig, UsageMetadata,
};
