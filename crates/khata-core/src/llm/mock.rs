//! Mock backend for testing
//!
//! Returns deterministic responses without a network. The default response
//! is a plausible extraction for a food-delivery receipt; tests can override
//! it per instance.

use async_trait::async_trait;

use crate::error::Result;

use super::{ChatMessage, GenerateOptions, LlmBackend};

const DEFAULT_RESPONSE: &str = r#"Here is the extracted expense information:
{"amount": 457.9, "currency": "INR", "description": "Swiggy food order", "category": "food_dining", "merchant": "Swiggy", "payment_method": "upi", "confidence_score": 0.92, "is_transaction": true}"#;

/// Mock LLM backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Canned response returned from every generate call
    pub response: String,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy, default food-order response)
    pub fn new() -> Self {
        Self {
            healthy: true,
            response: DEFAULT_RESPONSE.to_string(),
        }
    }

    /// Create a mock that returns a fixed response
    pub fn with_response(response: &str) -> Self {
        Self {
            healthy: true,
            response: response.to_string(),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            response: DEFAULT_RESPONSE.to_string(),
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    async fn generate(
        &self,
        _messages: &[ChatMessage],
        _model: &str,
        _options: &GenerateOptions,
    ) -> Result<String> {
        Ok(self.response.clone())
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
