use crate::constants::{SPLIT_TOLERANCE, round2};
use crate::core::group_resolver::GroupResolver;
use crate::core::models::{
    Balance, EntityRef, Settlement, SettlementPlan, SettlementStatus,
};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

struct Party {
    entity: EntityRef,
    remaining: f64,
}

/// Greedy minimal-transaction matching over a balance list.
///
/// Creditors and debtors are sorted descending by remaining amount; ties
/// keep the balance list's input order (the sort is stable). The largest
/// debtor pays the largest creditor the smaller of the two remainders,
/// and whichever side falls within tolerance of zero advances. Greedy
/// matching keeps the transaction count low but is not globally optimal
/// for every topology; that is accepted behavior.
pub fn plan_settlements(
    balances: &[Balance],
    event_id: &str,
    currency: &str,
    resolver: &GroupResolver,
) -> SettlementPlan {
    let mut creditors: Vec<Party> = balances
        .iter()
        .filter(|b| b.amount > SPLIT_TOLERANCE)
        .map(|b| Party {
            entity: EntityRef {
                entity_type: b.entity_type,
                entity_id: b.entity_id.clone(),
            },
            remaining: b.amount,
        })
        .collect();

    let mut debtors: Vec<Party> = balances
        .iter()
        .filter(|b| b.amount < -SPLIT_TOLERANCE)
        .map(|b| Party {
            entity: EntityRef {
                entity_type: b.entity_type,
                entity_id: b.entity_id.clone(),
            },
            remaining: -b.amount,
        })
        .collect();

    creditors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));
    debtors.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));

    let now = Utc::now();
    let mut settlements = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < debtors.len() && j < creditors.len() {
        let settled = round2(debtors[i].remaining.min(creditors[j].remaining));

        if settled > SPLIT_TOLERANCE {
            let from = debtors[i].entity.clone();
            let to = creditors[j].entity.clone();
            settlements.push(Settlement {
                id: Uuid::new_v4().to_string(),
                event_id: event_id.to_string(),
                from_user_id: resolver.payer_user_id(&from),
                to_user_id: resolver.payer_user_id(&to),
                from,
                to,
                amount: settled,
                currency: currency.to_string(),
                settlement_amount: None,
                settlement_currency: None,
                fx_rate: None,
                status: SettlementStatus::Pending,
                remarks: None,
                created_at: now,
                updated_at: now,
            });
        }

        debtors[i].remaining -= settled;
        creditors[j].remaining -= settled;

        if debtors[i].remaining <= SPLIT_TOLERANCE {
            i += 1;
        }
        if creditors[j].remaining <= SPLIT_TOLERANCE {
            j += 1;
        }
    }

    let total_amount = round2(settlements.iter().map(|s| s.amount).sum::<f64>());
    let plan = SettlementPlan {
        event_id: event_id.to_string(),
        total_transactions: settlements.len(),
        total_amount,
        settlements,
    };

    debug!(
        event_id,
        transactions = plan.total_transactions,
        total = plan.total_amount,
        "settlement plan built"
    );
    plan
}
