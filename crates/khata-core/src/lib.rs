//! Khata Core Library
//!
//! Shared functionality for the khata expense tracker:
//! - Canonical expense record with India-focused vocabularies
//! - Keyword pre-filter for transaction emails
//! - Pluggable LLM backends (OpenRouter, mock) with JSON response parsing
//! - Currency normalization to INR with static fallback rates
//! - Merchant and payment-method enrichment tables
//! - Extraction orchestrator and batch summaries
//! - Prompt library and model catalog with override files

pub mod classifier;
pub mod currency;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod llm;
pub mod model_catalog;
pub mod models;
pub mod prompts;

/// Test utilities including mock OpenRouter and exchange-rate servers
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use classifier::{
    classify_category, summarize, ExpenseClassifier, ExpenseSummary, GroupTotal,
};
pub use currency::CurrencyConverter;
pub use enrich::enrich;
pub use error::{Error, Result};
pub use filter::is_transaction_email;
pub use llm::parsing::{parse_expense_response, validate};
pub use llm::{
    ChatMessage, GenerateOptions, LlmBackend, LlmClient, MockBackend, OpenRouterBackend,
};
pub use model_catalog::{CatalogConfig, ModelCatalog};
pub use models::{Category, ExpenseRecord, PaymentMethod};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
