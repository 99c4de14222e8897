mod lifecycle_tests;
mod planner_tests;

use crate::core::errors::SplitLedgerError;
use crate::core::fx::FxRateResolver;
use crate::core::models::{
    EntityRef, Event, EventStatus, Expense, Group, RateMode, RateTable, Split, SplitType,
};
use crate::core::orchestrator::SettlementOrchestrator;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::rates::in_memory::InMemoryRateCache;
use crate::infrastructure::rates::RateFetcher;
use crate::infrastructure::storage::in_memory::InMemoryStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Programmable rate source: serves fixed tables per base currency, or
/// fails outright. Counts fetches so cache behavior can be asserted.
pub struct StubRateFetcher {
    tables: HashMap<String, HashMap<String, f64>>,
    fail: bool,
    pub fetches: Arc<AtomicUsize>,
}

impl StubRateFetcher {
    pub fn new() -> Self {
        StubRateFetcher {
            tables: HashMap::new(),
            fail: false,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_table(mut self, base: &str, rates: &[(&str, f64)]) -> Self {
        self.tables.insert(
            base.to_string(),
            rates.iter().map(|(c, r)| (c.to_string(), *r)).collect(),
        );
        self
    }

    pub fn failing() -> Self {
        StubRateFetcher {
            tables: HashMap::new(),
            fail: true,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl RateFetcher for StubRateFetcher {
    async fn fetch(&self, base_currency: &str) -> Result<RateTable, SplitLedgerError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SplitLedgerError::RateFetchFailed {
                base: base_currency.to_string(),
                reason: "stubbed outage".to_string(),
            });
        }
        self.tables
            .get(base_currency)
            .map(|rates| RateTable {
                base: base_currency.to_string(),
                date: Utc::now().date_naive(),
                rates: rates.clone(),
            })
            .ok_or_else(|| SplitLedgerError::RateFetchFailed {
                base: base_currency.to_string(),
                reason: "unknown base".to_string(),
            })
    }
}

pub type TestOrchestrator =
    SettlementOrchestrator<InMemoryStore, InMemoryLogging, InMemoryRateCache, StubRateFetcher>;

pub fn create_test_orchestrator(fetcher: StubRateFetcher) -> (TestOrchestrator, InMemoryStore) {
    let store = InMemoryStore::new();
    let logging = InMemoryLogging::new();
    let fx = FxRateResolver::new(InMemoryRateCache::new(), fetcher);
    let orchestrator = SettlementOrchestrator::new(store.clone(), logging, fx);
    (orchestrator, store)
}

pub fn make_event(id: &str, created_by: &str) -> Event {
    let now = Utc::now();
    Event {
        id: id.to_string(),
        name: format!("Event {}", id),
        currency: "USD".to_string(),
        settlement_currency: "USD".to_string(),
        rate_mode: RateMode::Eod,
        predefined_rates: HashMap::new(),
        created_by: created_by.to_string(),
        admin_ids: Vec::new(),
        status: EventStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

pub fn make_group(id: &str, event_id: &str, members: &[&str], payer: &str) -> Group {
    let now = Utc::now();
    Group {
        id: id.to_string(),
        event_id: event_id.to_string(),
        member_ids: members.iter().map(|m| m.to_string()).collect(),
        representative_id: members[0].to_string(),
        payer_id: payer.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn make_expense(
    id: &str,
    event_id: &str,
    payer: &str,
    amount: f64,
    splits: &[(&str, f64)],
) -> Expense {
    let now = Utc::now();
    Expense {
        id: id.to_string(),
        event_id: event_id.to_string(),
        title: format!("Expense {}", id),
        amount,
        currency: "USD".to_string(),
        payer_user_id: payer.to_string(),
        is_private: false,
        split_type: SplitType::Custom,
        splits: splits
            .iter()
            .map(|(user, amount)| Split {
                entity: EntityRef::user(user.to_string()),
                amount: *amount,
                ratio: None,
            })
            .collect(),
        paid_on_behalf_of: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}
