//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `email` - Email commands (check, extract) and shared input helpers
//! - `models` - Model catalog listing and backend health
//! - `prompts` - Prompt library management commands
//! - `summary` - Offline commands (classify, summarize)

pub mod email;
pub mod models;
pub mod prompts;
pub mod summary;

// Re-export command functions for main.rs
pub use email::*;
pub use models::*;
pub use prompts::*;
pub use summary::*;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read input from a file, or stdin when no file is given
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
