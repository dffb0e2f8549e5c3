//! India-specific enrichment rules
//!
//! Pure transforms over fixed, ordered rule tables. Order matters: the first
//! matching entry wins, so the tables are slices rather than hash maps.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{Category, ExpenseRecord, PaymentMethod};

/// Popular Indian merchants mapped to categories; first substring match wins
const MERCHANT_CATEGORIES: &[(&str, Category)] = &[
    ("swiggy", Category::FoodDining),
    ("zomato", Category::FoodDining),
    ("dominos", Category::FoodDining),
    ("pizza hut", Category::FoodDining),
    ("kfc", Category::FoodDining),
    ("mcdonalds", Category::FoodDining),
    ("starbucks", Category::CoffeeTea),
    ("cafe coffee day", Category::CoffeeTea),
    ("uber", Category::Transportation),
    ("ola", Category::Transportation),
    ("rapido", Category::Transportation),
    ("indian oil", Category::Fuel),
    ("hp", Category::Fuel),
    ("bp", Category::Fuel),
    ("amazon", Category::OnlineShopping),
    ("flipkart", Category::OnlineShopping),
    ("myntra", Category::OnlineShopping),
    ("nykaa", Category::OnlineShopping),
    ("bigbasket", Category::Groceries),
    ("grofers", Category::Groceries),
    ("blinkit", Category::Groceries),
    ("airtel", Category::MobileBill),
    ("jio", Category::MobileBill),
    ("vodafone", Category::MobileBill),
    ("bsnl", Category::MobileBill),
    ("tata sky", Category::DthBill),
    ("dish tv", Category::DthBill),
    ("netflix", Category::Entertainment),
    ("amazon prime", Category::Entertainment),
    ("disney+ hotstar", Category::Entertainment),
    ("spotify", Category::Entertainment),
    ("apollo pharmacy", Category::Medicine),
    ("medplus", Category::Medicine),
    ("1mg", Category::Medicine),
    ("pharmeasy", Category::Medicine),
    ("bookmyshow", Category::Entertainment),
    ("coursera", Category::Education),
    ("udemy", Category::Education),
];

/// Payment methods and the keywords that indicate them; first hit wins
const PAYMENT_KEYWORDS: &[(PaymentMethod, &[&str])] = &[
    (PaymentMethod::Upi, &["upi", "phonepe", "gpay", "paytm", "bhim"]),
    (
        PaymentMethod::CreditCard,
        &["credit", "card", "visa", "mastercard"],
    ),
    (PaymentMethod::DebitCard, &["debit", "card", "atm"]),
    (
        PaymentMethod::NetBanking,
        &["net", "banking", "neft", "imps", "rtgs"],
    ),
    (PaymentMethod::Cash, &["cash", "money"]),
    (
        PaymentMethod::Wallet,
        &["wallet", "paytm", "phonepe", "amazon", "pay"],
    ),
    (PaymentMethod::Emi, &["emi", "installment", "monthly"]),
];

/// GST line item: "GST" label, optional parenthetical like "(5%)", optional
/// currency marker, then the amount. Receipts print this many ways:
/// "GST: ₹19.90", "GST (5%): ₹19.90", "gst 19.9".
static GST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)gst\s*(?:\([^)]*\))?[:\s]*(?:₹|rs\.?|inr)?\s*(\d+(?:\.\d+)?)")
        .expect("GST pattern is valid")
});

/// Enhance a record with Indian-specific rule tables
///
/// Overrides the category from the merchant table, detects the payment
/// method from keywords, and extracts GST amounts. Idempotent for unchanged
/// merchant/description text.
pub fn enrich(mut record: ExpenseRecord) -> ExpenseRecord {
    // Merchant-based category override
    let merchant_lower = record.merchant.to_lowercase();
    for (substring, category) in MERCHANT_CATEGORIES {
        if merchant_lower.contains(substring) {
            debug!(merchant = %record.merchant, category = %category, "Merchant category override");
            record.category = *category;
            break;
        }
    }

    // Payment method from combined description + merchant text
    let text = format!(
        "{} {}",
        record.description.to_lowercase(),
        merchant_lower
    );
    for (method, keywords) in PAYMENT_KEYWORDS {
        if keywords.iter().any(|kw| text.contains(kw)) {
            record.payment_method = Some(*method);
            break;
        }
    }

    // GST extraction; percentage derives from the (already converted) amount
    if let Some(caps) = GST_PATTERN.captures(&text) {
        if let Ok(gst) = caps[1].parse::<f64>() {
            record.gst_amount = gst;
            if record.amount > 0.0 {
                record.gst_percentage = gst / record.amount * 100.0;
            }
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merchant_category_override() {
        let record = ExpenseRecord {
            merchant: "Swiggy Order".to_string(),
            category: Category::Shopping,
            ..Default::default()
        };
        let enriched = enrich(record);
        assert_eq!(enriched.category, Category::FoodDining);
    }

    #[test]
    fn test_first_merchant_match_wins() {
        // "amazon prime" appears later in the table than "amazon", so the
        // plain amazon entry wins for merchants containing both
        let record = ExpenseRecord {
            merchant: "Amazon Prime Video".to_string(),
            ..Default::default()
        };
        let enriched = enrich(record);
        assert_eq!(enriched.category, Category::OnlineShopping);
    }

    #[test]
    fn test_unlisted_merchant_keeps_category() {
        let record = ExpenseRecord {
            merchant: "Sharma General Store".to_string(),
            category: Category::Groceries,
            ..Default::default()
        };
        let enriched = enrich(record);
        assert_eq!(enriched.category, Category::Groceries);
    }

    #[test]
    fn test_payment_method_detection() {
        let record = ExpenseRecord {
            description: "Paid via UPI (PhonePe)".to_string(),
            ..Default::default()
        };
        let enriched = enrich(record);
        assert_eq!(enriched.payment_method, Some(PaymentMethod::Upi));

        let record = ExpenseRecord {
            description: "Visa ending 1234".to_string(),
            ..Default::default()
        };
        let enriched = enrich(record);
        assert_eq!(enriched.payment_method, Some(PaymentMethod::CreditCard));
    }

    #[test]
    fn test_gst_extraction() {
        let record = ExpenseRecord {
            amount: 398.0,
            description: "Subtotal: ₹398 GST (5%): ₹19.90 Total: ₹417.90".to_string(),
            ..Default::default()
        };
        let enriched = enrich(record);
        assert_eq!(enriched.gst_amount, 19.9);
        assert!((enriched.gst_percentage - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_gst_without_amount_leaves_percentage_zero() {
        let record = ExpenseRecord {
            amount: 0.0,
            description: "GST: ₹19.90".to_string(),
            ..Default::default()
        };
        let enriched = enrich(record);
        assert_eq!(enriched.gst_amount, 19.9);
        assert_eq!(enriched.gst_percentage, 0.0);
    }

    #[test]
    fn test_enrich_is_idempotent() {
        let record = ExpenseRecord {
            amount: 398.0,
            merchant: "Swiggy".to_string(),
            description: "Paid via UPI. GST: ₹19.90".to_string(),
            ..Default::default()
        };
        let once = enrich(record.clone());
        let twice = enrich(once.clone());
        assert_eq!(once.category, twice.category);
        assert_eq!(once.payment_method, twice.payment_method);
        assert_eq!(once.gst_amount, twice.gst_amount);
        assert_eq!(once.gst_percentage, twice.gst_percentage);
    }
}
