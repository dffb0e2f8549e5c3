//! Transaction pre-filter
//!
//! Cheap heuristic gate that decides whether an email is worth sending to the
//! LLM at all. Three independent signals are OR-ed: transaction keywords in
//! the subject/body, known transactional senders, and a currency-amount
//! pattern. There are no negative signals; a false positive downstream just
//! yields a low-value extraction.

use std::sync::LazyLock;

use regex::Regex;

/// Keywords that indicate transaction emails (India focused)
const TRANSACTION_KEYWORDS: &[&str] = &[
    "receipt",
    "transaction",
    "payment",
    "purchase",
    "order",
    "confirmation",
    "billing",
    "invoice",
    "statement",
    "charge",
    "debit",
    "credit",
    "amazon",
    "flipkart",
    "myntra",
    "nykaa",
    "swiggy",
    "zomato",
    "uber",
    "ola",
    "netflix",
    "spotify",
    "airtel",
    "jio",
    "vodafone",
    "bsnl",
    "bank",
    "credit card",
    "debit card",
    "paypal",
    "stripe",
    "upi",
    "phonepe",
    "gpay",
    "paytm",
    "bhim",
    "neft",
    "imps",
    "rtgs",
    "alert",
    "notification",
    "successful",
    "completed",
];

/// Senders that typically send transaction emails (India focused)
const TRANSACTION_SENDERS: &[&str] = &[
    "noreply@amazon.in",
    "noreply@flipkart.com",
    "noreply@myntra.com",
    "receipts@uber.com",
    "receipts@ola.com",
    "receipts@rapido.com",
    "noreply@swiggy.in",
    "noreply@zomato.com",
    "info@netflix.com",
    "no-reply@spotify.com",
    "payments@paypal.com",
    "noreply@stripe.com",
    "noreply@airtel.com",
    "noreply@jio.com",
    "noreply@vodafone.com",
    "noreply@bsnl.in",
    "noreply@tatasky.com",
    "noreply@dishtv.com",
    "alerts@hdfcbank.com",
    "alerts@icicibank.com",
    "alerts@sbicard.com",
];

/// Currency symbol or code token adjacent to a decimal number (₹, Rs, INR)
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:₹|rs\.?|inr)\s*\d+(?:\.\d+)?|\d+(?:\.\d+)?\s*(?:inr|rupees?|rs\.?|paise)")
        .expect("amount pattern is valid")
});

/// Determine if an email is transaction-related
///
/// Pure function over the email's content, subject, and sender. Returns true
/// if any of the three signals fires.
pub fn is_transaction_email(content: &str, subject: &str, sender: &str) -> bool {
    let text = format!("{} {}", content, subject).to_lowercase();

    let keyword_match = TRANSACTION_KEYWORDS.iter().any(|kw| text.contains(kw));

    let sender_lower = sender.to_lowercase();
    let sender_match = TRANSACTION_SENDERS
        .iter()
        .any(|s| sender_lower.contains(s));

    let amount_match = AMOUNT_PATTERN.is_match(&text);

    keyword_match || sender_match || amount_match
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match() {
        assert!(is_transaction_email(
            "Your order has been confirmed",
            "Order update",
            "someone@example.com"
        ));
        assert!(is_transaction_email(
            "Thanks for shopping",
            "Swiggy delivery",
            "someone@example.com"
        ));
    }

    #[test]
    fn test_sender_match() {
        assert!(is_transaction_email(
            "Hello there",
            "Hello",
            "alerts@hdfcbank.com"
        ));
        // Case-insensitive sender matching
        assert!(is_transaction_email(
            "Hello there",
            "Hello",
            "Alerts@HDFCBank.com"
        ));
    }

    #[test]
    fn test_amount_match() {
        assert!(is_transaction_email(
            "You spent ₹457.90 today",
            "Spending",
            "someone@example.com"
        ));
        assert!(is_transaction_email(
            "Amount of Rs 1250 was deducted",
            "Info",
            "someone@example.com"
        ));
        assert!(is_transaction_email(
            "You sent 42.50 INR yesterday",
            "Info",
            "someone@example.com"
        ));
    }

    #[test]
    fn test_irrelevant_email_rejected() {
        // No keyword, unmatched sender, no amount pattern
        assert!(!is_transaction_email(
            "Hey, are we still meeting for chai tomorrow?",
            "Catching up",
            "friend@example.com"
        ));
        assert!(!is_transaction_email("", "", ""));
    }

    #[test]
    fn test_plain_number_without_currency_rejected() {
        assert!(!is_transaction_email(
            "The meeting room is 204 on the second floor",
            "Directions",
            "facilities@example.com"
        ));
    }
}
