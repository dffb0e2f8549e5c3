//! Expense extraction orchestrator
//!
//! Drives the full pipeline for one email: prompt rendering, LLM generation,
//! JSON parsing, currency normalization to INR, merchant enrichment, and
//! validation. Extraction never returns an error: every failure path degrades
//! to the zero-value sentinel record so batch callers keep going.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::currency::CurrencyConverter;
use crate::enrich;
use crate::error::{Error, Result};
use crate::llm::parsing::{parse_expense_response, validate};
use crate::llm::{ChatMessage, GenerateOptions, LlmBackend, LlmClient};
use crate::model_catalog::ModelCatalog;
use crate::models::{Category, ExpenseRecord};
use crate::prompts::{Prompt, PromptId, PromptLibrary};

/// Last-resort system prompt when the prompt library cannot load
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an expert at extracting expense information from Indian emails. \
     Return only valid JSON.";

/// Keyword associations per category, in priority order
///
/// Used by the offline keyword classifier. Earlier entries win ties, so the
/// broader categories come first.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::FoodDining,
        &["restaurant", "food", "dining", "delivery", "lunch", "dinner", "breakfast"],
    ),
    (
        Category::Transportation,
        &["uber", "ola", "rapido", "taxi", "metro", "bus", "train", "auto"],
    ),
    (
        Category::Shopping,
        &["clothing", "electronics", "shopping", "store", "mall"],
    ),
    (
        Category::Travel,
        &["hotel", "flight", "airline", "booking", "travel", "vacation", "trip"],
    ),
    (
        Category::Utilities,
        &["electricity", "water", "internet", "phone", "utility", "bill"],
    ),
    (
        Category::Entertainment,
        &["netflix", "spotify", "movie", "game", "entertainment", "streaming"],
    ),
    (
        Category::Healthcare,
        &["medical", "doctor", "pharmacy", "health", "dental", "vision"],
    ),
    (
        Category::Education,
        &["book", "course", "tuition", "education", "learning", "school"],
    ),
    (
        Category::Housing,
        &["rent", "mortgage", "home", "apartment", "housing"],
    ),
    (Category::Insurance, &["insurance", "coverage", "policy"]),
    (
        Category::Groceries,
        &["grocery", "vegetables", "fruits", "milk", "bread", "rice", "dal"],
    ),
    (
        Category::Fuel,
        &["petrol", "diesel", "cng", "gas", "fuel", "oil"],
    ),
    (
        Category::MobileRecharge,
        &["recharge", "prepaid", "postpaid", "mobile", "phone"],
    ),
    (
        Category::OnlineShopping,
        &["amazon", "flipkart", "myntra", "nykaa", "online", "ecommerce"],
    ),
    (
        Category::Restaurant,
        &["restaurant", "dining", "cafe", "food", "meal"],
    ),
    (
        Category::CoffeeTea,
        &["coffee", "tea", "starbucks", "ccd", "cafe"],
    ),
    (
        Category::StreetFood,
        &["street", "food", "snack", "chaat", "pani", "puri"],
    ),
    (
        Category::Medicine,
        &["medicine", "pharmacy", "drug", "tablet", "syrup"],
    ),
    (
        Category::DoctorConsultation,
        &["doctor", "consultation", "appointment", "clinic", "hospital"],
    ),
    (
        Category::SchoolFees,
        &["school", "college", "tuition", "fees", "education"],
    ),
    (
        Category::BooksStationery,
        &["book", "notebook", "pen", "pencil", "stationery"],
    ),
    (
        Category::Rent,
        &["rent", "accommodation", "house", "flat", "pg"],
    ),
    (
        Category::Maintenance,
        &["maintenance", "repair", "service", "mechanic"],
    ),
    (
        Category::ElectricityBill,
        &["electricity", "power", "bill", "eb"],
    ),
    (Category::WaterBill, &["water", "bill", "supply"]),
    (Category::GasBill, &["gas", "lpg", "cylinder", "bill"]),
    (
        Category::InternetBill,
        &["internet", "broadband", "wifi", "bill"],
    ),
    (
        Category::MobileBill,
        &["mobile", "phone", "bill", "postpaid"],
    ),
    (
        Category::DthBill,
        &["dth", "cable", "tv", "bill", "tata", "sky"],
    ),
];

/// Classify an expense by keyword matching, without an LLM call
///
/// Returns the best-scoring category and a confidence score normalized so
/// that three keyword hits count as full confidence. Ties keep the earlier
/// category; zero hits return `(Other, 0.0)`.
pub fn classify_category(description: &str, merchant: &str) -> (Category, f64) {
    let text = format!("{} {}", description, merchant).to_lowercase();

    let mut best_category = Category::Other;
    let mut best_score = 0usize;

    for (category, keywords) in CATEGORY_KEYWORDS {
        let score = keywords.iter().filter(|kw| text.contains(*kw)).count();
        if score > best_score {
            best_score = score;
            best_category = *category;
        }
    }

    let confidence = (best_score as f64 / 3.0).min(1.0);
    (best_category, confidence)
}

/// Per-group totals in an expense summary
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct GroupTotal {
    pub amount: f64,
    pub count: usize,
}

/// Aggregate statistics over a batch of expense records
///
/// Breakdown maps are ordered by key so summaries render deterministically.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpenseSummary {
    pub total_amount: f64,
    pub count: usize,
    pub average_amount: f64,
    pub by_category: BTreeMap<String, GroupTotal>,
    pub by_month: BTreeMap<String, GroupTotal>,
    pub by_payment_method: BTreeMap<String, GroupTotal>,
}

/// Summarize a batch of expense records
///
/// Empty input yields the all-zero summary with empty breakdowns. Records
/// with no payment method are counted in the totals but skipped in the
/// payment-method breakdown.
pub fn summarize(expenses: &[ExpenseRecord]) -> ExpenseSummary {
    if expenses.is_empty() {
        return ExpenseSummary::default();
    }

    let total_amount: f64 = expenses.iter().map(|e| e.amount).sum();
    let count = expenses.len();

    let mut summary = ExpenseSummary {
        total_amount,
        count,
        average_amount: total_amount / count as f64,
        ..Default::default()
    };

    for expense in expenses {
        let entry = summary
            .by_category
            .entry(expense.category.as_str().to_string())
            .or_default();
        entry.amount += expense.amount;
        entry.count += 1;

        let month = expense.transaction_date.format("%Y-%m").to_string();
        let entry = summary.by_month.entry(month).or_default();
        entry.amount += expense.amount;
        entry.count += 1;

        if let Some(method) = expense.payment_method {
            let entry = summary
                .by_payment_method
                .entry(method.as_str().to_string())
                .or_default();
            entry.amount += expense.amount;
            entry.count += 1;
        }
    }

    summary
}

/// LLM-driven expense extractor for Indian consumer emails
///
/// Prompts are resolved once at construction, so a shared reference can run
/// any number of extractions in parallel.
pub struct ExpenseClassifier {
    llm: LlmClient,
    default_model: String,
    converter: CurrencyConverter,
    catalog: ModelCatalog,
    /// System prompt loaded once at construction
    system_prompt: String,
    extraction_prompt: Option<Prompt>,
    detection_prompt: Option<Prompt>,
}

impl ExpenseClassifier {
    /// Create a classifier with the default model catalog and converter
    pub fn new(llm: LlmClient) -> Result<Self> {
        Ok(Self::with_parts(
            llm,
            CurrencyConverter::default(),
            ModelCatalog::new()?,
        ))
    }

    /// Create a classifier with explicit converter and catalog (for testing)
    pub fn with_parts(
        llm: LlmClient,
        converter: CurrencyConverter,
        catalog: ModelCatalog,
    ) -> Self {
        let mut prompts = PromptLibrary::new();
        let extraction_prompt = match prompts.get(PromptId::IndianExpenseExtraction) {
            Ok(extraction) => Some(extraction.clone()),
            Err(e) => {
                warn!(error = %e, "Could not load extraction prompt, using built-in default");
                None
            }
        };
        let detection_prompt = match prompts.get(PromptId::TransactionDetection) {
            Ok(detection) => Some(detection.clone()),
            Err(e) => {
                warn!(error = %e, "Could not load transaction-detection prompt");
                None
            }
        };
        let system_prompt = extraction_prompt
            .as_ref()
            .map(|p| p.system_section().unwrap_or(&p.content).to_string())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
        let default_model = catalog.default_model().to_string();

        Self {
            llm,
            default_model,
            converter,
            catalog,
            system_prompt,
            extraction_prompt,
            detection_prompt,
        }
    }

    /// Extract structured expense data from one email
    ///
    /// Never fails: generation errors, unparseable responses, and conversion
    /// problems all degrade to the zero-value sentinel record.
    pub async fn extract_expense(
        &self,
        content: &str,
        subject: &str,
        sender: &str,
        model: Option<&str>,
    ) -> ExpenseRecord {
        let model_to_use = match model {
            Some(alias) => self.catalog.resolve(alias).to_string(),
            None => self.default_model.clone(),
        };

        let user_prompt = match self.render_user_prompt(content, subject, sender) {
            Some(prompt) => prompt,
            None => {
                error!("Extraction prompt unavailable, cannot render request");
                return ExpenseRecord::sentinel();
            }
        };

        let messages = [
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(user_prompt),
        ];

        let response = match self
            .llm
            .generate(&messages, &model_to_use, &GenerateOptions::default())
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(model = %model_to_use, error = %e, "LLM generation failed");
                return ExpenseRecord::sentinel();
            }
        };

        let record = match parse_expense_response(&response) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Failed to extract JSON from LLM response");
                return ExpenseRecord::sentinel();
            }
        };

        let record = validate(record);
        let record = self.convert_currency(record).await;
        let record = enrich::enrich(record);
        validate(record)
    }

    /// Ask the LLM whether an email is a financial transaction
    ///
    /// Heavier than the keyword pre-filter; useful for ambiguous emails.
    pub async fn detect_transaction(
        &self,
        content: &str,
        subject: &str,
        sender: &str,
    ) -> Result<bool> {
        let prompt = self
            .detection_prompt
            .as_ref()
            .ok_or_else(|| Error::NotFound(PromptId::TransactionDetection.as_str().to_string()))?;
        let system = prompt
            .system_section()
            .unwrap_or(&prompt.content)
            .to_string();

        let mut vars = HashMap::new();
        vars.insert("subject", subject);
        vars.insert("sender", sender);
        vars.insert("content", content);
        let user = prompt.render_user(&vars);

        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        let response = self
            .llm
            .generate(&messages, &self.default_model, &GenerateOptions::default())
            .await?;

        Ok(response.trim().to_lowercase().starts_with("yes"))
    }

    /// Switch the default model by alias, returning the resolved identifier
    ///
    /// Unknown aliases leave the current default in place.
    pub fn switch_model(&mut self, alias: &str) -> &str {
        if self.catalog.contains(alias) {
            self.default_model = self.catalog.resolve(alias).to_string();
            info!(model = %self.default_model, "Switched default model");
        } else {
            warn!(
                alias,
                current = %self.default_model,
                "Unknown model alias, keeping current model"
            );
        }
        &self.default_model
    }

    /// List available model aliases and their full identifiers
    pub fn available_models(&self) -> Vec<(&str, &str)> {
        self.catalog.list()
    }

    /// Current default model identifier
    pub fn model(&self) -> &str {
        &self.default_model
    }

    /// Check whether the LLM backend is reachable
    pub async fn health_check(&self) -> bool {
        self.llm.health_check().await
    }

    /// Normalize the record's amount to INR, noting the conversion
    async fn convert_currency(&self, mut record: ExpenseRecord) -> ExpenseRecord {
        if record.currency.trim().eq_ignore_ascii_case("INR") {
            record.currency = "INR".to_string();
            return record;
        }

        let original_amount = record.amount;
        let original_currency = record.currency.clone();

        let (converted, rate) = self
            .converter
            .convert_to_inr(original_amount, &original_currency)
            .await;

        record.original_amount = original_amount;
        record.original_currency = original_currency.clone();
        record.amount = converted;
        record.currency = "INR".to_string();

        let note = format!(
            "Converted from {} {} (Rate: {:.4})",
            original_amount, original_currency, rate
        );
        if record.notes.is_empty() {
            record.notes = note;
        } else {
            record.notes = format!("{} | {}", record.notes, note);
        }

        info!(
            amount = original_amount,
            currency = %original_currency,
            converted,
            "Converted to INR"
        );
        record
    }

    fn render_user_prompt(&self, content: &str, subject: &str, sender: &str) -> Option<String> {
        let prompt = self.extraction_prompt.as_ref()?;
        let mut vars = HashMap::new();
        vars.insert("subject", subject);
        vars.insert("sender", sender);
        vars.insert("content", content);
        Some(prompt.render_user(&vars))
    }
}
