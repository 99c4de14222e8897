use super::entity::EntityRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    Pending,
    Initiated,
    Completed,
    Failed,
    Terminated,
}

impl SettlementStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SettlementStatus::Completed | SettlementStatus::Failed | SettlementStatus::Terminated
        )
    }
}

impl std::fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Initiated => "initiated",
            SettlementStatus::Completed => "completed",
            SettlementStatus::Failed => "failed",
            SettlementStatus::Terminated => "terminated",
        };
        write!(f, "{}", s)
    }
}

/// One recommended payment from one entity to another.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settlement {
    pub id: String,
    pub event_id: String,
    pub from: EntityRef,
    pub to: EntityRef,
    /// Real user who pays; a group's designated payer when `from` is a group.
    pub from_user_id: String,
    /// Real user who receives; a group's designated payer when `to` is a group.
    pub to_user_id: String,
    pub amount: f64,
    pub currency: String,
    pub settlement_amount: Option<f64>,
    pub settlement_currency: Option<String>,
    pub fx_rate: Option<f64>,
    pub status: SettlementStatus,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a lifecycle transition may change alongside the status.
#[derive(Clone, Debug, Default)]
pub struct StatusPatch {
    pub status: SettlementStatus,
    pub remarks: Option<String>,
}

impl Default for SettlementStatus {
    fn default() -> Self {
        SettlementStatus::Pending
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SettlementPlan {
    pub event_id: String,
    pub settlements: Vec<Settlement>,
    pub total_transactions: usize,
    pub total_amount: f64,
}
