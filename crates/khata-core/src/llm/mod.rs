//! Pluggable LLM backend abstraction
//!
//! Backend-agnostic interface for the one generation call the extraction
//! pipeline makes. Concrete backends: `OpenRouterBackend` (hosted
//! chat-completions API) and `MockBackend` (deterministic, for tests).
//!
//! # Architecture
//!
//! - `LlmBackend` trait: the generation interface
//! - `LlmClient` enum: concrete wrapper providing Clone + compile-time
//!   dispatch without `Box<dyn>` overhead
//!
//! # Configuration
//!
//! Environment variables:
//! - `KHATA_LLM_BACKEND`: Backend to use (openrouter, mock). Default: openrouter
//! - `OPENROUTER_API_KEY`: API key (required for openrouter backend)
//! - `OPENROUTER_BASE_URL`: API base URL (default: https://openrouter.ai/api/v1)
//! - `OPENROUTER_MODEL`: Default model identifier (default: openai/gpt-4)

mod mock;
mod openrouter;
pub mod parsing;

pub use mock::MockBackend;
pub use openrouter::OpenRouterBackend;

use async_trait::async_trait;

use crate::error::Result;

/// A role-tagged chat message
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Generation parameters passed with every request
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        // Low temperature and a bounded token budget suit structured extraction
        Self {
            temperature: 0.1,
            max_tokens: 1500,
        }
    }
}

/// Trait defining the interface for all LLM backends
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate freeform text from a list of role-tagged messages
    async fn generate(
        &self,
        messages: &[ChatMessage],
        model: &str,
        options: &GenerateOptions,
    ) -> Result<String>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the default model identifier
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete LLM client enum
///
/// Provides Clone and compile-time dispatch. All variants implement the same
/// `LlmBackend` operations.
#[derive(Clone)]
pub enum LlmClient {
    /// OpenRouter chat-completions backend
    OpenRouter(OpenRouterBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl LlmClient {
    /// Create an LLM client from environment variables
    ///
    /// Checks `KHATA_LLM_BACKEND` to determine which backend to use.
    /// Returns None if required variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend =
            std::env::var("KHATA_LLM_BACKEND").unwrap_or_else(|_| "openrouter".to_string());

        match backend.to_lowercase().as_str() {
            "openrouter" => OpenRouterBackend::from_env().map(LlmClient::OpenRouter),
            "mock" => Some(LlmClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown KHATA_LLM_BACKEND, falling back to openrouter");
                OpenRouterBackend::from_env().map(LlmClient::OpenRouter)
            }
        }
    }

    /// Create an OpenRouter backend directly
    pub fn openrouter(base_url: &str, api_key: &str, model: &str) -> Self {
        LlmClient::OpenRouter(OpenRouterBackend::new(base_url, api_key, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        LlmClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different default model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            LlmClient::OpenRouter(b) => LlmClient::OpenRouter(b.with_model(model)),
            LlmClient::Mock(b) => LlmClient::Mock(b.with_model(model)),
        }
    }
}

#[async_trait]
impl LlmBackend for LlmClient {
    async fn generate(
        &self,
        messages: &[ChatMessage],
        model: &str,
        options: &GenerateOptions,
    ) -> Result<String> {
        match self {
            LlmClient::OpenRouter(b) => b.generate(messages, model, options).await,
            LlmClient::Mock(b) => b.generate(messages, model, options).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            LlmClient::OpenRouter(b) => b.health_check().await,
            LlmClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            LlmClient::OpenRouter(b) => b.model(),
            LlmClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            LlmClient::OpenRouter(b) => b.host(),
            LlmClient::Mock(b) => b.host(),
        }
    }
}
