//! Prompt library
//!
//! Prompts are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/khata/prompts/overrides/)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! This allows users to customize prompts without modifying the source,
//! while automatically getting new default prompts on upgrade.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default prompts (compiled into binary)
mod defaults {
    pub const TRANSACTION_DETECTION: &str =
        include_str!("../../../prompts/transaction_detection.md");
    pub const INDIAN_EXPENSE_EXTRACTION: &str =
        include_str!("../../../prompts/indian_expense_extraction.md");
    pub const NLP_QUERY: &str = include_str!("../../../prompts/nlp_query.md");
}

/// Known prompt IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Yes/no judgment on whether an email is a financial transaction
    TransactionDetection,
    /// Structured expense extraction for Indian consumer emails
    IndianExpenseExtraction,
    /// Natural-language query interpretation over extracted expenses
    NlpQuery,
}

impl PromptId {
    /// Get the string identifier for this prompt
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransactionDetection => "transaction_detection",
            Self::IndianExpenseExtraction => "indian_expense_extraction",
            Self::NlpQuery => "nlp_query",
        }
    }

    /// Get all known prompt IDs
    pub fn all() -> &'static [PromptId] {
        &[
            Self::TransactionDetection,
            Self::IndianExpenseExtraction,
            Self::NlpQuery,
        ]
    }

    /// Get the default embedded content for this prompt
    fn default_content(&self) -> &'static str {
        match self {
            Self::TransactionDetection => defaults::TRANSACTION_DETECTION,
            Self::IndianExpenseExtraction => defaults::INDIAN_EXPENSE_EXTRACTION,
            Self::NlpQuery => defaults::NLP_QUERY,
        }
    }
}

/// Prompt frontmatter metadata
#[derive(Debug, Clone, Deserialize)]
pub struct PromptMetadata {
    /// Unique identifier
    pub id: String,
    /// Version number for tracking changes
    pub version: u32,
    /// Task type (structured_extraction, fast_classification, ...)
    pub task_type: String,
}

/// A loaded prompt with metadata and content
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Metadata from frontmatter
    pub metadata: PromptMetadata,
    /// The prompt content (system + user sections)
    pub content: String,
    /// Whether this came from an override file
    pub is_override: bool,
    /// Path to override file (if any)
    pub override_path: Option<PathBuf>,
}

impl Prompt {
    /// Get the system section of the prompt
    pub fn system_section(&self) -> Option<&str> {
        extract_section(&self.content, "# System")
    }

    /// Get the user section of the prompt
    pub fn user_section(&self) -> Option<&str> {
        extract_section(&self.content, "# User")
    }

    /// Render just the user section with `{{var}}` template variables
    pub fn render_user(&self, vars: &HashMap<&str, &str>) -> String {
        let template = self.user_section().unwrap_or(&self.content);
        let mut result = template.to_string();
        for (key, value) in vars {
            let pattern = format!("{{{{{}}}}}", key);
            result = result.replace(&pattern, value);
        }
        result
    }
}

/// Prompt library for loading and caching prompts
pub struct PromptLibrary {
    /// Override directory path
    override_dir: Option<PathBuf>,
    /// Cached parsed prompts
    cache: HashMap<PromptId, Prompt>,
}

impl PromptLibrary {
    /// Create a new prompt library with default paths
    pub fn new() -> Self {
        Self {
            override_dir: default_prompts_dir(),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with a custom override directory
    pub fn with_override_dir(path: PathBuf) -> Self {
        Self {
            override_dir: Some(path),
            cache: HashMap::new(),
        }
    }

    /// Create a prompt library with no override directory (embedded only)
    pub fn embedded_only() -> Self {
        Self {
            override_dir: None,
            cache: HashMap::new(),
        }
    }

    /// Get a prompt by ID, loading from override or default
    pub fn get(&mut self, id: PromptId) -> Result<&Prompt> {
        if !self.cache.contains_key(&id) {
            let prompt = self.load(id)?;
            self.cache.insert(id, prompt);
        }
        self.cache
            .get(&id)
            .ok_or_else(|| Error::NotFound(id.as_str().to_string()))
    }

    /// Get a prompt for a given language and version
    ///
    /// Only English prompts exist today; `language` and `version` are
    /// accepted for forward compatibility and currently ignored.
    pub fn get_localized(
        &mut self,
        id: PromptId,
        _language: &str,
        _version: &str,
    ) -> Result<&Prompt> {
        self.get(id)
    }

    /// Load a prompt (checking override first, then default)
    fn load(&self, id: PromptId) -> Result<Prompt> {
        if let Some(ref override_dir) = self.override_dir {
            let override_path = override_dir.join(format!("{}.md", id.as_str()));
            if override_path.exists() {
                let content = fs::read_to_string(&override_path).map_err(|e| {
                    Error::InvalidData(format!("Failed to read prompt override: {}", e))
                })?;
                let (metadata, body) = parse_prompt(&content)?;
                return Ok(Prompt {
                    metadata,
                    content: body,
                    is_override: true,
                    override_path: Some(override_path),
                });
            }
        }

        let (metadata, body) = parse_prompt(id.default_content())?;
        Ok(Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        })
    }

    /// List all prompts with their override status
    pub fn list(&mut self) -> Vec<PromptInfo> {
        PromptId::all()
            .iter()
            .map(|&id| {
                let has_override = self.has_override(id);
                let prompt = self.get(id).ok();
                PromptInfo {
                    id: id.as_str().to_string(),
                    version: prompt.as_ref().map(|p| p.metadata.version).unwrap_or(0),
                    task_type: prompt
                        .map(|p| p.metadata.task_type.clone())
                        .unwrap_or_default(),
                    has_override,
                    override_path: if has_override {
                        self.override_dir
                            .as_ref()
                            .map(|d| d.join(format!("{}.md", id.as_str())))
                    } else {
                        None
                    },
                }
            })
            .collect()
    }

    /// Check if a prompt has an override file
    pub fn has_override(&self, id: PromptId) -> bool {
        match self.override_dir {
            Some(ref dir) => dir.join(format!("{}.md", id.as_str())).exists(),
            None => false,
        }
    }

    /// Get the override directory path
    pub fn override_dir(&self) -> Option<&PathBuf> {
        self.override_dir.as_ref()
    }

    /// Clear the cache (useful after editing override files)
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Information about a prompt for listing
#[derive(Debug, Clone)]
pub struct PromptInfo {
    /// Prompt identifier
    pub id: String,
    /// Version from metadata
    pub version: u32,
    /// Task type
    pub task_type: String,
    /// Whether an override exists
    pub has_override: bool,
    /// Path to override file (if exists)
    pub override_path: Option<PathBuf>,
}

/// Default prompts override directory
pub fn default_prompts_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("khata").join("prompts").join("overrides"))
}

/// Parse a prompt file into metadata and body
fn parse_prompt(content: &str) -> Result<(PromptMetadata, String)> {
    let content = content.trim();

    if !content.starts_with("---") {
        return Err(Error::InvalidData(
            "Prompt must start with YAML frontmatter (---)".into(),
        ));
    }

    let rest = &content[3..];
    let end = rest.find("---").ok_or_else(|| {
        Error::InvalidData("Prompt frontmatter not closed (missing second ---)".into())
    })?;

    let frontmatter = rest[..end].trim();
    let body = rest[end + 3..].trim();

    let metadata: PromptMetadata = serde_yaml::from_str(frontmatter)
        .map_err(|e| Error::InvalidData(format!("Invalid prompt frontmatter: {}", e)))?;

    Ok((metadata, body.to_string()))
}

/// Extract a section from the prompt content
fn extract_section<'a>(content: &'a str, header: &str) -> Option<&'a str> {
    let start = content.find(header)?;
    let after_header = &content[start + header.len()..];
    let end = after_header.find("\n# ").unwrap_or(after_header.len());
    Some(after_header[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prompt() {
        let content = r#"---
id: test_prompt
version: 1
task_type: structured_extraction
---

# System
Test system prompt.

# User
Test user prompt with {{variable}}.
"#;

        let (metadata, body) = parse_prompt(content).unwrap();
        assert_eq!(metadata.id, "test_prompt");
        assert_eq!(metadata.version, 1);
        assert_eq!(metadata.task_type, "structured_extraction");
        assert!(body.contains("# System"));
        assert!(body.contains("# User"));
    }

    #[test]
    fn test_render_user() {
        let content = r#"---
id: test
version: 1
task_type: test
---

# System
You extract expenses.

# User
Subject: {{subject}}
Sender: {{sender}}
"#;
        let (metadata, body) = parse_prompt(content).unwrap();
        let prompt = Prompt {
            metadata,
            content: body,
            is_override: false,
            override_path: None,
        };

        let mut vars = HashMap::new();
        vars.insert("subject", "Swiggy Order Confirmation");
        vars.insert("sender", "noreply@swiggy.in");

        let rendered = prompt.render_user(&vars);
        assert!(rendered.contains("Subject: Swiggy Order Confirmation"));
        assert!(rendered.contains("Sender: noreply@swiggy.in"));
        assert!(!rendered.contains("You extract expenses"));
    }

    #[test]
    fn test_prompt_library_embedded() {
        let mut lib = PromptLibrary::embedded_only();
        for id in PromptId::all() {
            let prompt = lib.get(*id).unwrap();
            assert!(!prompt.is_override);
            assert!(prompt.override_path.is_none());
        }
    }

    #[test]
    fn test_default_prompts_parse() {
        for id in PromptId::all() {
            let result = parse_prompt(id.default_content());
            assert!(
                result.is_ok(),
                "Failed to parse {}: {:?}",
                id.as_str(),
                result.err()
            );
            let (metadata, _) = result.unwrap();
            assert_eq!(metadata.id, id.as_str());
        }
    }

    #[test]
    fn test_localized_get_ignores_language_and_version() {
        let mut lib = PromptLibrary::embedded_only();
        let default_version = lib
            .get(PromptId::IndianExpenseExtraction)
            .unwrap()
            .metadata
            .version;
        let localized = lib
            .get_localized(PromptId::IndianExpenseExtraction, "hi", "2")
            .unwrap();
        assert_eq!(localized.metadata.version, default_version);
    }

    #[test]
    fn test_override_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let override_content = r#"---
id: transaction_detection
version: 99
task_type: fast_classification
---

# System
Custom detection prompt.
"#;
        std::fs::write(
            dir.path().join("transaction_detection.md"),
            override_content,
        )
        .unwrap();

        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        let prompt = lib.get(PromptId::TransactionDetection).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 99);

        // Other prompts still resolve to embedded defaults
        let extraction = lib.get(PromptId::IndianExpenseExtraction).unwrap();
        assert!(!extraction.is_override);
    }

    #[test]
    fn test_clear_cache_picks_up_new_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut lib = PromptLibrary::with_override_dir(dir.path().to_path_buf());
        assert!(!lib.get(PromptId::TransactionDetection).unwrap().is_override);

        let override_content = r#"---
id: transaction_detection
version: 2
task_type: fast_classification
---

# System
Updated detection prompt.
"#;
        std::fs::write(
            dir.path().join("transaction_detection.md"),
            override_content,
        )
        .unwrap();

        // The cached copy survives until the cache is cleared
        assert!(!lib.get(PromptId::TransactionDetection).unwrap().is_override);

        lib.clear_cache();
        let prompt = lib.get(PromptId::TransactionDetection).unwrap();
        assert!(prompt.is_override);
        assert_eq!(prompt.metadata.version, 2);
    }
}
