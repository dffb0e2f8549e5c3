//! Offline commands: keyword classification and batch summaries

use std::path::Path;

use anyhow::{Context, Result};
use khata_core::{classify_category, summarize, ExpenseRecord};

use super::read_input;

/// Classify a description/merchant pair by keywords, without an LLM
pub fn cmd_classify(description: &str, merchant: &str) -> Result<()> {
    let (category, confidence) = classify_category(description, merchant);
    println!("{} (confidence: {:.2})", category, confidence);
    Ok(())
}

/// Summarize a JSON array of extracted expense records
pub fn cmd_summarize(file: Option<&Path>) -> Result<()> {
    let input = read_input(file)?;
    let expenses: Vec<ExpenseRecord> =
        serde_json::from_str(&input).context("Input is not a JSON array of expense records")?;

    let summary = summarize(&expenses);

    println!("Total:   ₹{:.2} across {} expenses", summary.total_amount, summary.count);
    println!("Average: ₹{:.2}", summary.average_amount);

    if !summary.by_category.is_empty() {
        println!("\nBy category:");
        for (category, group) in &summary.by_category {
            println!("  {:<22} ₹{:>12.2}  ({})", category, group.amount, group.count);
        }
    }

    if !summary.by_month.is_empty() {
        println!("\nBy month:");
        for (month, group) in &summary.by_month {
            println!("  {:<22} ₹{:>12.2}  ({})", month, group.amount, group.count);
        }
    }

    if !summary.by_payment_method.is_empty() {
        println!("\nBy payment method:");
        for (method, group) in &summary.by_payment_method {
            println!("  {:<22} ₹{:>12.2}  ({})", method, group.amount, group.count);
        }
    }

    Ok(())
}
