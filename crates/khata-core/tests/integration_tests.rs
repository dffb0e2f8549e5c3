//! Integration tests for khata-core
//!
//! These tests exercise the full email → LLM → parse → convert → enrich →
//! validate pipeline against mock OpenRouter and exchange-rate servers.

use khata_core::model_catalog::{CatalogConfig, ModelCatalog};
use khata_core::test_utils::{MockExchangeServer, MockOpenRouterServer};
use khata_core::{
    is_transaction_email, summarize, Category, CurrencyConverter, ExpenseClassifier,
    ExpenseRecord, LlmClient, PaymentMethod,
};

/// A typical Indian food-delivery confirmation email
fn swiggy_email() -> &'static str {
    r#"Your Swiggy order has been confirmed!

Order #SW123456789
Order Date: December 15, 2024

Restaurant: Domino's Pizza
Items:
- Margherita Pizza: ₹299
- Garlic Bread: ₹99

Subtotal: ₹398
GST (5%): ₹19.90
Delivery Fee: ₹40

Total: ₹457.90

Payment Method: UPI (PhonePe)

Thank you for ordering with Swiggy!"#
}

fn classifier_against(
    llm_url: &str,
    exchange_url: &str,
) -> ExpenseClassifier {
    let llm = LlmClient::openrouter(llm_url, "test-key", "openai/gpt-4");
    ExpenseClassifier::with_parts(
        llm,
        CurrencyConverter::new(exchange_url),
        ModelCatalog::with_config(CatalogConfig::default()),
    )
}

// =============================================================================
// Pre-filter
// =============================================================================

#[test]
fn test_prefilter_accepts_receipt_and_rejects_newsletter() {
    assert!(is_transaction_email(
        swiggy_email(),
        "Swiggy Order Confirmation",
        "noreply@swiggy.in"
    ));

    assert!(!is_transaction_email(
        "Check out our new recipes this week!",
        "Weekly newsletter",
        "news@cooking.example.com"
    ));
}

// =============================================================================
// Full extraction pipeline
// =============================================================================

#[tokio::test]
async fn test_extract_swiggy_order() {
    let llm = MockOpenRouterServer::start().await;
    let fx = MockExchangeServer::start(83.0).await;
    let classifier = classifier_against(&llm.url(), &fx.url());

    let record = classifier
        .extract_expense(
            swiggy_email(),
            "Swiggy Order Confirmation",
            "noreply@swiggy.in",
            None,
        )
        .await;

    assert!(record.is_transaction);
    assert_eq!(record.amount, 457.9);
    assert_eq!(record.currency, "INR");
    assert_eq!(record.merchant, "Swiggy");
    assert_eq!(record.category, Category::FoodDining);
    assert_eq!(record.payment_method, Some(PaymentMethod::Upi));
    assert!(record.confidence_score > 0.9);
    // INR amounts are not converted
    assert!(!record.notes.contains("Converted"));
}

#[tokio::test]
async fn test_extract_converts_foreign_currency() {
    let response = r#"{"amount": 12.0, "currency": "USD", "description": "Netflix subscription",
        "merchant": "Netflix", "category": "entertainment", "is_transaction": true,
        "confidence_score": 0.9}"#;
    let llm = MockOpenRouterServer::start_with_response(response).await;
    let fx = MockExchangeServer::start(83.0).await;
    let classifier = classifier_against(&llm.url(), &fx.url());

    let record = classifier
        .extract_expense("Netflix charged $12", "Your receipt", "info@netflix.com", None)
        .await;

    assert_eq!(record.currency, "INR");
    assert!((record.amount - 996.0).abs() < 1e-9);
    assert_eq!(record.original_amount, 12.0);
    assert_eq!(record.original_currency, "USD");
    assert!(record.notes.contains("Converted from 12 USD (Rate: 83.0000)"));
}

#[tokio::test]
async fn test_extract_falls_back_when_exchange_api_down() {
    let response = r#"{"amount": 10.0, "currency": "USD", "merchant": "AWS",
        "is_transaction": true, "confidence_score": 0.8}"#;
    let llm = MockOpenRouterServer::start_with_response(response).await;
    // Port 1 refuses connections, forcing the static fallback table
    let classifier = classifier_against(&llm.url(), "http://127.0.0.1:1/unreachable");

    let record = classifier
        .extract_expense("AWS invoice $10", "Invoice", "billing@aws.example.com", None)
        .await;

    assert_eq!(record.currency, "INR");
    assert!((record.amount - 831.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_extract_sentinel_on_prose_response() {
    let llm = MockOpenRouterServer::start_with_response(
        "I could not find any expense information in this email.",
    )
    .await;
    let fx = MockExchangeServer::start(83.0).await;
    let classifier = classifier_against(&llm.url(), &fx.url());

    let record = classifier
        .extract_expense("hello there", "Hi", "friend@example.com", None)
        .await;

    assert!(!record.is_transaction);
    assert_eq!(record.amount, 0.0);
    assert_eq!(record.currency, "INR");
}

#[tokio::test]
async fn test_extract_sentinel_when_backend_unreachable() {
    let fx = MockExchangeServer::start(83.0).await;
    let classifier = classifier_against("http://127.0.0.1:1", &fx.url());

    let record = classifier
        .extract_expense(swiggy_email(), "Swiggy Order", "noreply@swiggy.in", None)
        .await;

    assert!(!record.is_transaction);
    assert_eq!(record.amount, 0.0);
}

#[tokio::test]
async fn test_extract_clamps_invalid_fields() {
    let response = r#"{"amount": -457.9, "currency": "INR", "merchant": "  Swiggy  ",
        "confidence_score": 1.7, "is_transaction": true}"#;
    let llm = MockOpenRouterServer::start_with_response(response).await;
    let fx = MockExchangeServer::start(83.0).await;
    let classifier = classifier_against(&llm.url(), &fx.url());

    let record = classifier
        .extract_expense(swiggy_email(), "Swiggy Order", "noreply@swiggy.in", None)
        .await;

    assert_eq!(record.amount, 457.9);
    assert_eq!(record.merchant, "Swiggy");
    assert_eq!(record.confidence_score, 0.5);
}

#[tokio::test]
async fn test_extract_enriches_gst_from_description() {
    let response = r#"{"amount": 457.9, "currency": "INR", "merchant": "Swiggy",
        "description": "Food order, Subtotal ₹398, GST (5%): ₹19.90",
        "is_transaction": true, "confidence_score": 0.9}"#;
    let llm = MockOpenRouterServer::start_with_response(response).await;
    let fx = MockExchangeServer::start(83.0).await;
    let classifier = classifier_against(&llm.url(), &fx.url());

    let record = classifier
        .extract_expense(swiggy_email(), "Swiggy Order", "noreply@swiggy.in", None)
        .await;

    assert_eq!(record.gst_amount, 19.9);
    assert!((record.gst_percentage - 4.345).abs() < 0.01);
}

// =============================================================================
// Transaction detection via LLM
// =============================================================================

#[tokio::test]
async fn test_detect_transaction_yes_and_no() {
    let llm = MockOpenRouterServer::start_with_response("Yes, this is a transaction.").await;
    let fx = MockExchangeServer::start(83.0).await;
    let classifier = classifier_against(&llm.url(), &fx.url());
    assert!(classifier
        .detect_transaction(swiggy_email(), "Swiggy Order", "noreply@swiggy.in")
        .await
        .unwrap());

    let llm = MockOpenRouterServer::start_with_response("no").await;
    let classifier = classifier_against(&llm.url(), &fx.url());
    assert!(!classifier
        .detect_transaction("newsletter", "News", "news@example.com")
        .await
        .unwrap());
}

// =============================================================================
// Batch summaries over extracted records
// =============================================================================

#[tokio::test]
async fn test_extract_then_summarize() {
    let llm = MockOpenRouterServer::start().await;
    let fx = MockExchangeServer::start(83.0).await;
    let classifier = classifier_against(&llm.url(), &fx.url());

    let mut records: Vec<ExpenseRecord> = Vec::new();
    for _ in 0..3 {
        records.push(
            classifier
                .extract_expense(swiggy_email(), "Swiggy Order", "noreply@swiggy.in", None)
                .await,
        );
    }

    let summary = summarize(&records);
    assert_eq!(summary.count, 3);
    assert!((summary.total_amount - 3.0 * 457.9).abs() < 1e-9);
    assert!((summary.average_amount - 457.9).abs() < 1e-9);
    assert_eq!(summary.by_category["food_dining"].count, 3);
    assert_eq!(summary.by_payment_method["upi"].count, 3);
    assert_eq!(summary.by_month["2024-12"].count, 3);
}
