use crate::core::errors::SplitLedgerError;
use crate::core::models::RateTable;
use async_trait::async_trait;

/// Per-day rate cache keyed `"{currency}_{date}"`. Writes are best-effort:
/// callers log and continue when `put` fails. Eviction belongs to the
/// backing store's own retention policy.
#[async_trait]
pub trait RateCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<RateTable>, SplitLedgerError>;
    async fn put(&self, key: &str, table: RateTable) -> Result<(), SplitLedgerError>;
}

/// External end-of-day rate source. May fail; the resolver falls back to
/// the reverse-direction cache before surfacing an error.
#[async_trait]
pub trait RateFetcher: Send + Sync {
    async fn fetch(&self, base_currency: &str) -> Result<RateTable, SplitLedgerError>;
}

pub mod http;
pub mod in_memory;

pub fn day_key(currency: &str, date: chrono::NaiveDate) -> String {
    format!("{}_{}", currency, date)
}
