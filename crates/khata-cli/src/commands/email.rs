//! Email commands: pre-filter check and full expense extraction

use std::path::Path;

use anyhow::{bail, Result};
use khata_core::{is_transaction_email, ExpenseClassifier, LlmClient};

use super::read_input;

/// Build the classifier from environment configuration
fn build_classifier() -> Result<ExpenseClassifier> {
    let Some(llm) = LlmClient::from_env() else {
        bail!(
            "No LLM backend configured. Set OPENROUTER_API_KEY \
             (or KHATA_LLM_BACKEND=mock for testing)."
        );
    };
    Ok(ExpenseClassifier::new(llm)?)
}

/// Check whether an email looks like a financial transaction
pub async fn cmd_check(
    file: Option<&Path>,
    subject: &str,
    sender: &str,
    use_llm: bool,
) -> Result<()> {
    let content = read_input(file)?;

    let is_transaction = if use_llm {
        let classifier = build_classifier()?;
        classifier
            .detect_transaction(&content, subject, sender)
            .await?
    } else {
        is_transaction_email(&content, subject, sender)
    };

    if is_transaction {
        println!("transaction");
    } else {
        println!("not a transaction");
    }
    Ok(())
}

/// Extract structured expense data from an email, printing JSON
pub async fn cmd_extract(
    file: Option<&Path>,
    subject: &str,
    sender: &str,
    model: Option<&str>,
    no_filter: bool,
) -> Result<()> {
    let content = read_input(file)?;

    if !no_filter && !is_transaction_email(&content, subject, sender) {
        eprintln!("Email does not look like a transaction (use --no-filter to extract anyway)");
        let sentinel = khata_core::ExpenseRecord::sentinel();
        println!("{}", serde_json::to_string_pretty(&sentinel)?);
        return Ok(());
    }

    let classifier = build_classifier()?;
    let record = classifier
        .extract_expense(&content, subject, sender, model)
        .await;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
