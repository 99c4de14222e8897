use crate::constants::{
    SETTLEMENTS_TERMINATED, SETTLEMENT_COMPLETED, SETTLEMENT_INITIATED, SETTLEMENT_REJECTED,
};
use crate::core::errors::SplitLedgerError;
use crate::core::models::{Settlement, SettlementStatus, StatusPatch};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::SettlementStore;
use serde_json::json;
use tracing::{info, warn};

/// Per-transaction state machine: `pending → initiated → completed`, with
/// `initiated → pending|failed` on rejection and any non-terminal state
/// `→ terminated` administratively. Every transition is applied through
/// the store's compare-and-swap so two actors cannot race one record.
pub struct SettlementLifecycle<S: SettlementStore, L: LoggingService> {
    store: S,
    logging: L,
}

impl<S: SettlementStore, L: LoggingService> SettlementLifecycle<S, L> {
    pub fn new(store: S, logging: L) -> Self {
        SettlementLifecycle { store, logging }
    }

    async fn load(&self, settlement_id: &str) -> Result<Settlement, SplitLedgerError> {
        self.store
            .get(settlement_id)
            .await?
            .ok_or_else(|| SplitLedgerError::SettlementNotFound(settlement_id.to_string()))
    }

    /// The resolved payer marks the payment as sent.
    pub async fn initiate(
        &self,
        settlement_id: &str,
        actor: &str,
    ) -> Result<Settlement, SplitLedgerError> {
        let settlement = self.load(settlement_id).await?;
        if settlement.from_user_id != actor {
            warn!(settlement_id, actor, "initiate denied: not the payer");
            return Err(SplitLedgerError::Forbidden(actor.to_string()));
        }

        let updated = self
            .store
            .update_status(
                settlement_id,
                SettlementStatus::Pending,
                StatusPatch {
                    status: SettlementStatus::Initiated,
                    remarks: None,
                },
            )
            .await?;

        self.logging
            .log_action(
                SETTLEMENT_INITIATED,
                json!({ "settlement_id": settlement_id, "event_id": updated.event_id }),
                Some(actor),
            )
            .await?;

        info!(settlement_id, actor, "settlement initiated");
        Ok(updated)
    }

    /// The resolved payee confirms receipt. Returns the updated record and
    /// whether every settlement of the event is now completed, so the
    /// orchestrator can move the event to settled.
    pub async fn approve(
        &self,
        settlement_id: &str,
        actor: &str,
    ) -> Result<(Settlement, bool), SplitLedgerError> {
        let settlement = self.load(settlement_id).await?;
        if settlement.to_user_id != actor {
            warn!(settlement_id, actor, "approve denied: not the payee");
            return Err(SplitLedgerError::Forbidden(actor.to_string()));
        }

        let updated = self
            .store
            .update_status(
                settlement_id,
                SettlementStatus::Initiated,
                StatusPatch {
                    status: SettlementStatus::Completed,
                    remarks: None,
                },
            )
            .await?;

        let all_completed = self
            .store
            .list_by_event(&updated.event_id)
            .await?
            .iter()
            .all(|s| s.status == SettlementStatus::Completed);

        self.logging
            .log_action(
                SETTLEMENT_COMPLETED,
                json!({ "settlement_id": settlement_id, "event_id": updated.event_id }),
                Some(actor),
            )
            .await?;

        info!(settlement_id, actor, all_completed, "settlement completed");
        Ok((updated, all_completed))
    }

    /// The payee sends the payment back to the payer, either to be
    /// resubmitted (`pending`) or as definitively failed.
    pub async fn reject(
        &self,
        settlement_id: &str,
        actor: &str,
        reason: String,
        as_failed: bool,
    ) -> Result<Settlement, SplitLedgerError> {
        let settlement = self.load(settlement_id).await?;
        if settlement.to_user_id != actor {
            warn!(settlement_id, actor, "reject denied: not the payee");
            return Err(SplitLedgerError::Forbidden(actor.to_string()));
        }

        let next = if as_failed {
            SettlementStatus::Failed
        } else {
            SettlementStatus::Pending
        };
        let updated = self
            .store
            .update_status(
                settlement_id,
                SettlementStatus::Initiated,
                StatusPatch {
                    status: next,
                    remarks: Some(reason.clone()),
                },
            )
            .await?;

        self.logging
            .log_action(
                SETTLEMENT_REJECTED,
                json!({
                    "settlement_id": settlement_id,
                    "event_id": updated.event_id,
                    "reason": reason,
                    "as_failed": as_failed
                }),
                Some(actor),
            )
            .await?;

        info!(settlement_id, actor, "settlement rejected");
        Ok(updated)
    }

    /// Administrative bulk transition used when the owning event goes
    /// away. Bypasses actor checks; terminal records are left alone.
    pub async fn terminate_for_event(&self, event_id: &str) -> Result<usize, SplitLedgerError> {
        let settlements = self.store.list_by_event(event_id).await?;
        let mut terminated = 0;

        for settlement in settlements {
            if settlement.status.is_terminal() {
                continue;
            }
            match self
                .store
                .update_status(
                    &settlement.id,
                    settlement.status,
                    StatusPatch {
                        status: SettlementStatus::Terminated,
                        remarks: None,
                    },
                )
                .await
            {
                Ok(_) => terminated += 1,
                // Another actor moved it first; the record is either
                // terminal now or will be caught by a later sweep.
                Err(SplitLedgerError::InvalidStatus { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        self.logging
            .log_action(
                SETTLEMENTS_TERMINATED,
                json!({ "event_id": event_id, "count": terminated }),
                None,
            )
            .await?;

        info!(event_id, terminated, "settlements terminated");
        Ok(terminated)
    }
}
