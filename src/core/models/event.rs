use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Payment,
    Settled,
    Closed,
}

/// How an event resolves FX when its settlement currency differs from its
/// base currency.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateMode {
    Predefined,
    Eod,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    /// Currency expenses are recorded and balances computed in.
    pub currency: String,
    /// Currency payments are made in; equal to `currency` for most events.
    pub settlement_currency: String,
    pub rate_mode: RateMode,
    /// Admin-fixed rates keyed `"{from}_{to}"`, consulted in predefined mode.
    pub predefined_rates: HashMap<String, f64>,
    pub created_by: String,
    pub admin_ids: Vec<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.created_by == user_id || self.admin_ids.iter().any(|a| a == user_id)
    }
}
