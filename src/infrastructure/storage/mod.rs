use crate::core::errors::SplitLedgerError;
use crate::core::models::{
    Event, EventStatus, Expense, Group, Settlement, SettlementStatus, StatusPatch,
};
use async_trait::async_trait;

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    async fn expenses_for_event(&self, event_id: &str) -> Result<Vec<Expense>, SplitLedgerError>;
}

#[async_trait]
pub trait GroupStore: Send + Sync {
    async fn groups_for_event(&self, event_id: &str) -> Result<Vec<Group>, SplitLedgerError>;
}

#[async_trait]
pub trait SettlementStore: Send + Sync {
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Settlement>, SplitLedgerError>;
    async fn bulk_delete(&self, ids: &[String]) -> Result<(), SplitLedgerError>;
    async fn create(&self, settlement: Settlement) -> Result<String, SplitLedgerError>;
    async fn get(&self, settlement_id: &str) -> Result<Option<Settlement>, SplitLedgerError>;
    /// Compare-and-swap: applies `patch` only while the record still holds
    /// `expected`, so two actors cannot race the same transition.
    async fn update_status(
        &self,
        settlement_id: &str,
        expected: SettlementStatus,
        patch: StatusPatch,
    ) -> Result<Settlement, SplitLedgerError>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn get(&self, event_id: &str) -> Result<Option<Event>, SplitLedgerError>;
    async fn update_status(
        &self,
        event_id: &str,
        status: EventStatus,
    ) -> Result<(), SplitLedgerError>;
}

pub mod in_memory;
