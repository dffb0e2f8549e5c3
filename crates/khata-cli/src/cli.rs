//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Khata - Extract expenses from Indian transaction emails
#[derive(Parser)]
#[command(name = "khata")]
#[command(about = "LLM-backed expense extraction for Indian consumer emails", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether an email looks like a financial transaction
    Check {
        /// File containing the email body (stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Email subject line
        #[arg(short, long, default_value = "")]
        subject: String,

        /// Email sender address
        #[arg(long, default_value = "")]
        sender: String,

        /// Ask the LLM instead of the keyword pre-filter
        #[arg(long)]
        llm: bool,
    },

    /// Extract structured expense data from an email
    Extract {
        /// File containing the email body (stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Email subject line
        #[arg(short, long, default_value = "")]
        subject: String,

        /// Email sender address
        #[arg(long, default_value = "")]
        sender: String,

        /// Model alias or full identifier (default from catalog)
        #[arg(short, long)]
        model: Option<String>,

        /// Skip the keyword pre-filter and always call the LLM
        #[arg(long)]
        no_filter: bool,
    },

    /// Classify a description/merchant pair by keywords, without an LLM
    Classify {
        /// Expense description
        description: String,

        /// Merchant name
        #[arg(short, long, default_value = "")]
        merchant: String,
    },

    /// List available models and check backend health
    Models,

    /// Summarize a JSON array of extracted expense records
    Summarize {
        /// File containing the JSON array (stdin if omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Manage extraction prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all prompts and their override status
    List,
    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g. indian_expense_extraction)
        prompt_id: String,
    },
    /// Show the prompt override directory path
    Path,
}
