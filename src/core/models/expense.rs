use super::entity::EntityRef;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Equal,
    Ratio,
    Custom,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Split {
    pub entity: EntityRef,
    /// Portion of the expense attributed to the entity, 2-decimal.
    pub amount: f64,
    /// Weight used when the expense was split by ratio.
    pub ratio: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub amount: f64,
    pub currency: String,
    pub payer_user_id: String,
    /// Private expenses never enter shared balances.
    pub is_private: bool,
    pub split_type: SplitType,
    pub splits: Vec<Split>,
    /// Entities the payer covered without taking a share themselves.
    pub paid_on_behalf_of: Vec<EntityRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
