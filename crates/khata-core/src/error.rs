//! Error types for khata

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or absent JSON in LLM output; recovered into a sentinel record
    #[error("Parse error: {0}")]
    Parse(String),

    /// LLM backend failure (transport, auth, rate limit)
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
