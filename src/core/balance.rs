use crate::constants::{SPLIT_TOLERANCE, round2};
use crate::core::errors::SplitLedgerError;
use crate::core::group_resolver::GroupResolver;
use crate::core::models::{Balance, EntityRef, Expense, SplitType};
use std::collections::BTreeMap;
use tracing::debug;

/// Rejects expenses the engine must never ingest: non-positive or 2+dp
/// amounts are programmer error upstream, a custom split that does not sum
/// to the expense total is a validation failure the caller surfaces before
/// any write.
pub fn validate_expenses(expenses: &[Expense]) -> Result<(), SplitLedgerError> {
    for expense in expenses {
        if expense.amount <= 0.0 || !expense.amount.is_finite() {
            return Err(SplitLedgerError::InvalidAmount {
                expense_id: expense.id.clone(),
                amount: expense.amount,
            });
        }
        if expense.payer_user_id.is_empty()
            || expense.splits.iter().any(|s| s.entity.entity_id.is_empty())
        {
            return Err(SplitLedgerError::InvalidEntity(expense.id.clone()));
        }
        if expense.splits.iter().any(|s| s.amount < 0.0) {
            return Err(SplitLedgerError::InvalidAmount {
                expense_id: expense.id.clone(),
                amount: expense.amount,
            });
        }
        if !expense.is_private && expense.split_type == SplitType::Custom {
            let split_sum: f64 = expense.splits.iter().map(|s| s.amount).sum();
            if (split_sum - expense.amount).abs() > SPLIT_TOLERANCE {
                return Err(SplitLedgerError::InvalidSplit(expense.id.clone()));
            }
        }
    }
    Ok(())
}

/// Net position per entity over one event's expenses.
///
/// Private expenses are skipped outright. The payer's entity is credited
/// the full amount; every split is debited against its rolled-up entity.
/// When the expense was paid on behalf of others, any split landing back
/// on the payer's own entity is skipped so the payer nets the full credit.
/// Entities that end within tolerance of zero are dropped. Output order is
/// deterministic (sorted by entity) so that regenerating a plan from the
/// same snapshot yields the same plan.
pub fn compute_balances(expenses: &[Expense], resolver: &GroupResolver) -> Vec<Balance> {
    let mut totals: BTreeMap<EntityRef, f64> = BTreeMap::new();

    for expense in expenses.iter().filter(|e| !e.is_private) {
        let payer_entity = resolver.entity_for(&expense.payer_user_id);
        *totals.entry(payer_entity.clone()).or_insert(0.0) += expense.amount;

        let on_behalf = !expense.paid_on_behalf_of.is_empty();
        for split in &expense.splits {
            let target = resolver.roll_up(&split.entity);
            // On-behalf-of expenses must not charge the payer's own
            // entity, even if a split line for it slipped through.
            if on_behalf && target == payer_entity {
                continue;
            }
            *totals.entry(target).or_insert(0.0) -= split.amount;
        }
    }

    let balances: Vec<Balance> = totals
        .into_iter()
        .map(|(entity, amount)| (entity, round2(amount)))
        .filter(|(_, amount)| amount.abs() > SPLIT_TOLERANCE)
        .map(|(entity, amount)| Balance {
            entity_id: entity.entity_id,
            entity_type: entity.entity_type,
            amount,
        })
        .collect();

    debug!(entities = balances.len(), "balances computed");
    balances
}
