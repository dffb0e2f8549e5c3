//! Currency conversion to INR
//!
//! Tries a live exchange-rate lookup first, bounded by a short timeout, and
//! degrades to a static fallback table on any failure. Conversion never
//! surfaces an error to the caller: an unknown currency converts at rate 1.0
//! (treated as already-local) with a warning.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Fallback exchange rates to INR (updated periodically)
const FALLBACK_RATES: &[(&str, f64)] = &[
    ("USD", 83.15),
    ("EUR", 90.85),
    ("GBP", 105.50),
    ("JPY", 0.56),
    ("AUD", 55.20),
    ("CAD", 61.80),
    ("CHF", 95.40),
    ("CNY", 11.65),
    ("SGD", 62.10),
    ("AED", 22.65),
    ("SAR", 22.18),
    ("INR", 1.0),
];

/// Exchange-rate API response shape: `{"rates": {"INR": 83.15, ...}}`
#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

/// Currency conversion utility backed by an exchange-rate API
pub struct CurrencyConverter {
    http_client: Client,
    base_url: String,
}

impl Clone for CurrencyConverter {
    fn clone(&self) -> Self {
        Self {
            http_client: self.http_client.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl CurrencyConverter {
    /// Create a converter against a specific exchange-rate API base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Convert an amount to INR
    ///
    /// Returns `(converted_amount, exchange_rate)`. Never fails: lookup
    /// errors fall back to the static table, unknown currencies to rate 1.0.
    pub async fn convert_to_inr(&self, amount: f64, from_currency: &str) -> (f64, f64) {
        let code = from_currency.trim().to_uppercase();
        if code == "INR" {
            return (amount, 1.0);
        }

        match self.fetch_rate(&code).await {
            Ok(rate) => {
                debug!(currency = %code, rate, "Live exchange rate");
                (amount * rate, rate)
            }
            Err(e) => {
                warn!(currency = %code, error = %e, "Falling back to static exchange rate");
                let rate = fallback_rate(&code);
                (amount * rate, rate)
            }
        }
    }

    /// Fetch the live INR rate for a currency
    async fn fetch_rate(&self, code: &str) -> Result<f64> {
        let response = self
            .http_client
            .get(format!("{}/{}", self.base_url, code))
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let rates: RatesResponse = response.json().await?;
        rates
            .rates
            .get("INR")
            .copied()
            .ok_or_else(|| Error::InvalidData(format!("No INR rate for {}", code)))
    }

    /// List the currency codes covered by the fallback table
    pub fn supported_currencies(&self) -> Vec<&'static str> {
        FALLBACK_RATES.iter().map(|(code, _)| *code).collect()
    }
}

/// Static fallback rate; unknown currencies are treated as already-local
fn fallback_rate(code: &str) -> f64 {
    match FALLBACK_RATES.iter().find(|(c, _)| *c == code) {
        Some((_, rate)) => *rate,
        None => {
            warn!(currency = %code, "Unknown currency, using rate 1.0");
            1.0
        }
    }
}
