use crate::constants::{
    BALANCES_COMPUTED, EVENT_SETTLED, SETTLEMENT_GENERATED, SETTLEMENT_GENERATION_DENIED,
};
use crate::core::balance::{compute_balances, validate_expenses};
use crate::core::errors::SplitLedgerError;
use crate::core::fx::{FxRateResolver, convert};
use crate::core::group_resolver::GroupResolver;
use crate::core::lifecycle::SettlementLifecycle;
use crate::core::models::{Balance, EventStatus, Settlement, SettlementPlan};
use crate::core::planner::plan_settlements;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::rates::{RateCache, RateFetcher};
use crate::infrastructure::storage::{EventStore, ExpenseStore, GroupStore, SettlementStore};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Entry point of the engine: authorizes the caller, recomputes balances
/// and plan from the current expense/group snapshot, persists the new
/// settlement batch and drives event-level status transitions.
pub struct SettlementOrchestrator<S, L, C, F>
where
    S: ExpenseStore + GroupStore + SettlementStore + EventStore + Clone,
    L: LoggingService + Clone,
    C: RateCache,
    F: RateFetcher,
{
    store: S,
    logging: L,
    fx: FxRateResolver<C, F>,
    lifecycle: SettlementLifecycle<S, L>,
    // Generation is delete-then-write and not atomic against the store;
    // a per-event critical section keeps concurrent regenerations from
    // interleaving. Single-instance only; multi-instance deployments need
    // a distributed lock or a transactional store.
    event_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S, L, C, F> SettlementOrchestrator<S, L, C, F>
where
    S: ExpenseStore + GroupStore + SettlementStore + EventStore + Clone,
    L: LoggingService + Clone,
    C: RateCache,
    F: RateFetcher,
{
    pub fn new(store: S, logging: L, fx: FxRateResolver<C, F>) -> Self {
        let lifecycle = SettlementLifecycle::new(store.clone(), logging.clone());
        SettlementOrchestrator {
            store,
            logging,
            fx,
            lifecycle,
            event_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn event_lock(&self, event_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.event_locks.lock().await;
        locks
            .entry(event_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn load_snapshot(
        &self,
        event_id: &str,
    ) -> Result<(Vec<crate::core::models::Expense>, GroupResolver), SplitLedgerError> {
        let expenses = self.store.expenses_for_event(event_id).await?;
        let groups = self.store.groups_for_event(event_id).await?;
        validate_expenses(&expenses)?;
        Ok((expenses, GroupResolver::new(&groups)))
    }

    /// Net balances per entity for the event's current snapshot. Pure
    /// derivation, nothing is persisted.
    pub async fn compute_balances(&self, event_id: &str) -> Result<Vec<Balance>, SplitLedgerError> {
        EventStore::get(&self.store, event_id)
            .await?
            .ok_or_else(|| SplitLedgerError::EventNotFound(event_id.to_string()))?;

        let (expenses, resolver) = self.load_snapshot(event_id).await?;
        let balances = compute_balances(&expenses, &resolver);

        self.logging
            .log_action(
                BALANCES_COMPUTED,
                json!({ "event_id": event_id, "entities": balances.len() }),
                None,
            )
            .await?;

        Ok(balances)
    }

    /// Regenerates the settlement plan for an event. Only the event's
    /// creator or an admin may do this. Any prior batch is replaced, not
    /// added to; validation happens before the first write so a bad
    /// snapshot never leaves partial state behind.
    pub async fn generate_settlement(
        &self,
        event_id: &str,
        actor: &str,
    ) -> Result<SettlementPlan, SplitLedgerError> {
        let event = EventStore::get(&self.store, event_id)
            .await?
            .ok_or_else(|| SplitLedgerError::EventNotFound(event_id.to_string()))?;

        if !event.is_admin(actor) {
            warn!(event_id, actor, "settlement generation denied");
            self.logging
                .log_action(
                    SETTLEMENT_GENERATION_DENIED,
                    json!({ "event_id": event_id }),
                    Some(actor),
                )
                .await?;
            return Err(SplitLedgerError::Forbidden(actor.to_string()));
        }

        let lock = self.event_lock(event_id).await;
        let _guard = lock.lock().await;

        let (expenses, resolver) = self.load_snapshot(event_id).await?;
        let balances = compute_balances(&expenses, &resolver);
        let mut plan = plan_settlements(&balances, event_id, &event.currency, &resolver);

        if event.settlement_currency != event.currency {
            let quote = self
                .fx
                .get_rate(
                    &event.currency,
                    &event.settlement_currency,
                    &event.predefined_rates,
                    event.rate_mode,
                )
                .await?;
            for settlement in &mut plan.settlements {
                settlement.settlement_amount = Some(convert(settlement.amount, quote.rate));
                settlement.settlement_currency = Some(event.settlement_currency.clone());
                settlement.fx_rate = Some(quote.rate);
            }
        }

        let existing: Vec<String> = self
            .store
            .list_by_event(event_id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        self.store.bulk_delete(&existing).await?;

        for settlement in &mut plan.settlements {
            settlement.id = self.store.create(settlement.clone()).await?;
        }

        let next_status = if plan.total_transactions == 0 {
            EventStatus::Settled
        } else {
            EventStatus::Payment
        };
        EventStore::update_status(&self.store, event_id, next_status).await?;

        self.logging
            .log_action(
                SETTLEMENT_GENERATED,
                json!({
                    "event_id": event_id,
                    "transactions": plan.total_transactions,
                    "total_amount": plan.total_amount
                }),
                Some(actor),
            )
            .await?;

        info!(
            event_id,
            actor,
            transactions = plan.total_transactions,
            "settlement plan generated"
        );
        Ok(plan)
    }

    pub async fn initiate_settlement(
        &self,
        settlement_id: &str,
        actor: &str,
    ) -> Result<Settlement, SplitLedgerError> {
        self.lifecycle.initiate(settlement_id, actor).await
    }

    /// Approving the last open settlement moves the event to settled.
    pub async fn approve_settlement(
        &self,
        settlement_id: &str,
        actor: &str,
    ) -> Result<Settlement, SplitLedgerError> {
        let (settlement, all_completed) = self.lifecycle.approve(settlement_id, actor).await?;

        if all_completed {
            EventStore::update_status(&self.store, &settlement.event_id, EventStatus::Settled)
                .await?;
            self.logging
                .log_action(
                    EVENT_SETTLED,
                    json!({ "event_id": settlement.event_id }),
                    Some(actor),
                )
                .await?;
        }

        Ok(settlement)
    }

    pub async fn reject_settlement(
        &self,
        settlement_id: &str,
        actor: &str,
        reason: String,
        as_failed: bool,
    ) -> Result<Settlement, SplitLedgerError> {
        self.lifecycle
            .reject(settlement_id, actor, reason, as_failed)
            .await
    }

    /// Terminates every open settlement of a deleted event. The event
    /// record itself is the deleting caller's concern.
    pub async fn handle_event_deleted(&self, event_id: &str) -> Result<usize, SplitLedgerError> {
        self.lifecycle.terminate_for_event(event_id).await
    }

    pub async fn list_settlements(
        &self,
        event_id: &str,
    ) -> Result<Vec<Settlement>, SplitLedgerError> {
        self.store.list_by_event(event_id).await
    }
}
