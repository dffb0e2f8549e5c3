//! Core data model: the canonical expense record and its closed vocabularies
//!
//! An [`ExpenseRecord`] is built once per email from parsed LLM output merged
//! onto schema defaults, then flows through conversion, enrichment, and
//! validation. The category and payment-method vocabularies are closed enums:
//! anything the model emits outside the set deserializes to `Other`, so the
//! "category is always a member of the fixed set" invariant holds by
//! construction.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// India-focused expense categories
///
/// Unrecognized category strings from the LLM deserialize to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FoodDining,
    Transportation,
    Shopping,
    Travel,
    Utilities,
    Entertainment,
    Healthcare,
    Education,
    Housing,
    Insurance,
    Groceries,
    Fuel,
    MobileRecharge,
    OnlineShopping,
    Restaurant,
    CoffeeTea,
    StreetFood,
    Medicine,
    DoctorConsultation,
    SchoolFees,
    BooksStationery,
    Rent,
    Maintenance,
    ElectricityBill,
    WaterBill,
    GasBill,
    InternetBill,
    MobileBill,
    DthBill,
    #[serde(other)]
    Other,
}

impl Category {
    /// Get the wire identifier for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodDining => "food_dining",
            Self::Transportation => "transportation",
            Self::Shopping => "shopping",
            Self::Travel => "travel",
            Self::Utilities => "utilities",
            Self::Entertainment => "entertainment",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Housing => "housing",
            Self::Insurance => "insurance",
            Self::Groceries => "groceries",
            Self::Fuel => "fuel",
            Self::MobileRecharge => "mobile_recharge",
            Self::OnlineShopping => "online_shopping",
            Self::Restaurant => "restaurant",
            Self::CoffeeTea => "coffee_tea",
            Self::StreetFood => "street_food",
            Self::Medicine => "medicine",
            Self::DoctorConsultation => "doctor_consultation",
            Self::SchoolFees => "school_fees",
            Self::BooksStationery => "books_stationery",
            Self::Rent => "rent",
            Self::Maintenance => "maintenance",
            Self::ElectricityBill => "electricity_bill",
            Self::WaterBill => "water_bill",
            Self::GasBill => "gas_bill",
            Self::InternetBill => "internet_bill",
            Self::MobileBill => "mobile_bill",
            Self::DthBill => "dth_bill",
            Self::Other => "other",
        }
    }

    /// Get all categories in declaration order
    pub fn all() -> &'static [Category] {
        &[
            Self::FoodDining,
            Self::Transportation,
            Self::Shopping,
            Self::Travel,
            Self::Utilities,
            Self::Entertainment,
            Self::Healthcare,
            Self::Education,
            Self::Housing,
            Self::Insurance,
            Self::Groceries,
            Self::Fuel,
            Self::MobileRecharge,
            Self::OnlineShopping,
            Self::Restaurant,
            Self::CoffeeTea,
            Self::StreetFood,
            Self::Medicine,
            Self::DoctorConsultation,
            Self::SchoolFees,
            Self::BooksStationery,
            Self::Rent,
            Self::Maintenance,
            Self::ElectricityBill,
            Self::WaterBill,
            Self::GasBill,
            Self::InternetBill,
            Self::MobileBill,
            Self::DthBill,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indian payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    CreditCard,
    DebitCard,
    NetBanking,
    Cash,
    Wallet,
    Emi,
    #[serde(other)]
    Other,
}

impl PaymentMethod {
    /// Get the wire identifier for this payment method
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::NetBanking => "net_banking",
            Self::Cash => "cash",
            Self::Wallet => "wallet",
            Self::Emi => "emi",
            Self::Other => "other",
        }
    }

    /// Parse a wire identifier; unknown non-empty strings map to `Other`
    pub fn parse(s: &str) -> Option<PaymentMethod> {
        if s.trim().is_empty() {
            return None;
        }
        Some(match s.trim() {
            "upi" => Self::Upi,
            "credit_card" => Self::CreditCard,
            "debit_card" => Self::DebitCard,
            "net_banking" => Self::NetBanking,
            "cash" => Self::Cash,
            "wallet" => Self::Wallet,
            "emi" => Self::Emi,
            _ => Self::Other,
        })
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured expense data extracted from one email
///
/// Field names follow the JSON contract the extraction prompt specifies, so
/// this type deserializes directly from the model's output. Missing keys take
/// schema defaults; unknown keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseRecord {
    /// Amount in INR after normalization, non-negative after validation
    pub amount: f64,
    /// Always "INR" after normalization
    pub currency: String,
    /// Pre-conversion amount (equals `amount` when no conversion occurred)
    pub original_amount: f64,
    /// Pre-conversion currency
    pub original_currency: String,
    pub description: String,
    pub category: Category,
    pub merchant: String,
    pub location: String,
    pub city: String,
    pub state: String,
    /// Defaults to today; unparseable model dates also degrade to today
    #[serde(deserialize_with = "de_lenient_date")]
    pub transaction_date: NaiveDate,
    /// None when the source gives no signal
    #[serde(deserialize_with = "de_payment_method")]
    pub payment_method: Option<PaymentMethod>,
    /// Clamped to [0, 1]; out-of-range values reset to 0.5
    pub confidence_score: f64,
    pub tags: Vec<String>,
    /// Free text; conversion audit messages are appended here
    pub notes: String,
    pub gst_amount: f64,
    pub gst_percentage: f64,
    /// Whether this record represents a real financial transaction
    pub is_transaction: bool,
}

impl Default for ExpenseRecord {
    fn default() -> Self {
        Self {
            amount: 0.0,
            currency: "INR".to_string(),
            original_amount: 0.0,
            original_currency: "INR".to_string(),
            description: String::new(),
            category: Category::Other,
            merchant: String::new(),
            location: String::new(),
            city: String::new(),
            state: String::new(),
            transaction_date: today(),
            payment_method: None,
            confidence_score: 0.0,
            tags: Vec::new(),
            notes: String::new(),
            gst_amount: 0.0,
            gst_percentage: 0.0,
            is_transaction: false,
        }
    }
}

impl ExpenseRecord {
    /// The "could not extract" record: well-formed, zero-value, not a transaction
    pub fn sentinel() -> Self {
        Self::default()
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Accept `null`, empty, or malformed dates without failing the whole parse
fn de_lenient_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").unwrap_or_else(|_| {
            tracing::warn!(date = %s, "Unparseable transaction_date, defaulting to today");
            today()
        }),
        None => today(),
    })
}

/// Accept `null` or `""` as "undetermined"; unknown strings become `Other`
fn de_payment_method<'de, D>(deserializer: D) -> Result<Option<PaymentMethod>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(PaymentMethod::parse))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for cat in Category::all() {
            let json = serde_json::to_string(cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.as_str()));
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *cat);
        }
    }

    #[test]
    fn test_unknown_category_deserializes_to_other() {
        let cat: Category = serde_json::from_str("\"crypto_trading\"").unwrap();
        assert_eq!(cat, Category::Other);
    }

    #[test]
    fn test_record_defaults() {
        let record = ExpenseRecord::default();
        assert_eq!(record.amount, 0.0);
        assert_eq!(record.currency, "INR");
        assert_eq!(record.category, Category::Other);
        assert!(record.payment_method.is_none());
        assert!(record.tags.is_empty());
        assert!(!record.is_transaction);
    }

    #[test]
    fn test_record_from_partial_json() {
        let record: ExpenseRecord = serde_json::from_str(
            r#"{"amount": 457.9, "currency": "INR", "merchant": "Swiggy", "is_transaction": true}"#,
        )
        .unwrap();
        assert_eq!(record.amount, 457.9);
        assert_eq!(record.merchant, "Swiggy");
        assert!(record.is_transaction);
        assert_eq!(record.category, Category::Other);
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_empty_payment_method_is_none() {
        let record: ExpenseRecord =
            serde_json::from_str(r#"{"payment_method": ""}"#).unwrap();
        assert!(record.payment_method.is_none());

        let record: ExpenseRecord =
            serde_json::from_str(r#"{"payment_method": "upi"}"#).unwrap();
        assert_eq!(record.payment_method, Some(PaymentMethod::Upi));

        let record: ExpenseRecord =
            serde_json::from_str(r#"{"payment_method": "barter"}"#).unwrap();
        assert_eq!(record.payment_method, Some(PaymentMethod::Other));
    }

    #[test]
    fn test_bad_date_falls_back_to_today() {
        let record: ExpenseRecord =
            serde_json::from_str(r#"{"transaction_date": "December 15, 2024"}"#).unwrap();
        assert_eq!(record.transaction_date, chrono::Local::now().date_naive());

        let record: ExpenseRecord =
            serde_json::from_str(r#"{"transaction_date": "2024-12-15"}"#).unwrap();
        assert_eq!(
            record.transaction_date,
            NaiveDate::from_ymd_opt(2024, 12, 15).unwrap()
        );
    }
}
