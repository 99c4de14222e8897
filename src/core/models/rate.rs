use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Full day's rate table for one base currency, as fetched from the rate
/// source. Cached per `"{base}_{date}"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub date: NaiveDate,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn rate_for(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Predefined,
    Eod,
}

/// A resolved conversion rate between two currencies.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateQuote {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub date: NaiveDate,
    pub source: RateSource,
}
