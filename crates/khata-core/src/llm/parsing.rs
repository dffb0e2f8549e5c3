//! JSON parsing and validation for LLM extraction responses
//!
//! Models often wrap their JSON payload in prose, so parsing scans for the
//! outermost brace-delimited object first and falls back to treating the
//! whole response as JSON. Validation never fails: out-of-range fields are
//! clamped or reset, and the result is idempotent under re-validation.

use tracing::warn;

use crate::error::{Error, Result};
use crate::models::ExpenseRecord;

/// Parse an expense record out of a raw LLM response
///
/// Unknown keys are ignored and missing keys take schema defaults; the only
/// failure mode is absent or syntactically invalid JSON.
pub fn parse_expense_response(response: &str) -> Result<ExpenseRecord> {
    let response = response.trim();

    // Look for the outermost JSON object
    let start = response.find('{');
    let end = response.rfind('}');

    let json_str = match (start, end) {
        (Some(s), Some(e)) if s < e => &response[s..=e],
        // No braces at all: try the entire response
        _ => response,
    };

    serde_json::from_str(json_str).map_err(|e| {
        // Truncate on char boundaries; responses are routinely full of ₹
        let truncated = if json_str.chars().count() > 200 {
            format!("{}...", json_str.chars().take(200).collect::<String>())
        } else {
            json_str.to_string()
        };
        Error::Parse(format!("Invalid JSON from LLM: {} | Raw: {}", e, truncated))
    })
}

/// Validate and clean an expense record
///
/// Always applied after parsing and again at the end of the pipeline as a
/// safety net. Category membership and tag presence hold by construction of
/// the types; the remaining clamps are applied here.
pub fn validate(mut record: ExpenseRecord) -> ExpenseRecord {
    if record.amount < 0.0 {
        warn!(amount = record.amount, "Negative amount, taking absolute value");
        record.amount = record.amount.abs();
    }

    record.description = record.description.trim().to_string();
    record.merchant = record.merchant.trim().to_string();

    if !(0.0..=1.0).contains(&record.confidence_score) {
        warn!(
            confidence = record.confidence_score,
            "Confidence score out of range, resetting to 0.5"
        );
        record.confidence_score = 0.5;
    }

    record
}
