use crate::core::errors::SplitLedgerError;
use crate::core::models::RateTable;
use crate::infrastructure::rates::RateCache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Single-instance per-day rate cache. Duplicate writes are harmless
/// (last write wins); stale day keys are simply never read again.
#[derive(Clone)]
pub struct InMemoryRateCache {
    tables: Arc<RwLock<HashMap<String, RateTable>>>,
}

impl InMemoryRateCache {
    pub fn new() -> Self {
        InMemoryRateCache {
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryRateCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateCache for InMemoryRateCache {
    async fn get(&self, key: &str) -> Result<Option<RateTable>, SplitLedgerError> {
        let tables = self.tables.read().await;
        Ok(tables.get(key).cloned())
    }

    async fn put(&self, key: &str, table: RateTable) -> Result<(), SplitLedgerError> {
        let mut tables = self.tables.write().await;
        tables.insert(key.to_string(), table);
        Ok(())
    }
}
