use crate::core::errors::SplitLedgerError;
use crate::core::models::{
    Event, EventStatus, Expense, Group, Settlement, SettlementStatus, StatusPatch,
};
use crate::infrastructure::storage::{EventStore, ExpenseStore, GroupStore, SettlementStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone)]
pub struct InMemoryStore {
    events: Arc<RwLock<HashMap<String, Event>>>,
    expenses: Arc<RwLock<HashMap<String, Expense>>>,
    groups: Arc<RwLock<HashMap<String, Group>>>,
    settlements: Arc<RwLock<HashMap<String, Settlement>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            events: Arc::new(RwLock::new(HashMap::new())),
            expenses: Arc::new(RwLock::new(HashMap::new())),
            groups: Arc::new(RwLock::new(HashMap::new())),
            settlements: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn save_event(&self, event: Event) {
        let mut events = self.events.write().await;
        events.insert(event.id.clone(), event);
    }

    pub async fn save_expense(&self, expense: Expense) {
        let mut expenses = self.expenses.write().await;
        expenses.insert(expense.id.clone(), expense);
    }

    pub async fn save_group(&self, group: Group) {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpenseStore for InMemoryStore {
    async fn expenses_for_event(&self, event_id: &str) -> Result<Vec<Expense>, SplitLedgerError> {
        let expenses = self.expenses.read().await;
        let mut found: Vec<Expense> = expenses
            .values()
            .filter(|e| e.event_id == event_id)
            .cloned()
            .collect();
        // Stable order for a stable snapshot.
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }
}

#[async_trait]
impl GroupStore for InMemoryStore {
    async fn groups_for_event(&self, event_id: &str) -> Result<Vec<Group>, SplitLedgerError> {
        let groups = self.groups.read().await;
        let mut found: Vec<Group> = groups
            .values()
            .filter(|g| g.event_id == event_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }
}

#[async_trait]
impl SettlementStore for InMemoryStore {
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Settlement>, SplitLedgerError> {
        let settlements = self.settlements.read().await;
        let mut found: Vec<Settlement> = settlements
            .values()
            .filter(|s| s.event_id == event_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<(), SplitLedgerError> {
        let mut settlements = self.settlements.write().await;
        for id in ids {
            settlements.remove(id);
        }
        Ok(())
    }

    async fn create(&self, settlement: Settlement) -> Result<String, SplitLedgerError> {
        let mut settlements = self.settlements.write().await;
        let id = Uuid::new_v4().to_string();
        let record = Settlement {
            id: id.clone(),
            ..settlement
        };
        settlements.insert(id.clone(), record);
        Ok(id)
    }

    async fn get(&self, settlement_id: &str) -> Result<Option<Settlement>, SplitLedgerError> {
        let settlements = self.settlements.read().await;
        Ok(settlements.get(settlement_id).cloned())
    }

    async fn update_status(
        &self,
        settlement_id: &str,
        expected: SettlementStatus,
        patch: StatusPatch,
    ) -> Result<Settlement, SplitLedgerError> {
        // Check and swap under one write lock.
        let mut settlements = self.settlements.write().await;
        let record = settlements
            .get_mut(settlement_id)
            .ok_or_else(|| SplitLedgerError::SettlementNotFound(settlement_id.to_string()))?;
        if record.status != expected {
            return Err(SplitLedgerError::InvalidStatus {
                id: settlement_id.to_string(),
                actual: record.status,
                expected,
            });
        }
        record.status = patch.status;
        if patch.remarks.is_some() {
            record.remarks = patch.remarks;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn get(&self, event_id: &str) -> Result<Option<Event>, SplitLedgerError> {
        let events = self.events.read().await;
        Ok(events.get(event_id).cloned())
    }

    async fn update_status(
        &self,
        event_id: &str,
        status: EventStatus,
    ) -> Result<(), SplitLedgerError> {
        let mut events = self.events.write().await;
        let event = events
            .get_mut(event_id)
            .ok_or_else(|| SplitLedgerError::EventNotFound(event_id.to_string()))?;
        event.status = status;
        event.updated_at = Utc::now();
        Ok(())
    }
}
