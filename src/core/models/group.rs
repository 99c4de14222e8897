use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A set of users tracked as one economic unit within an event.
///
/// `representative_id` and `payer_id` must both be members;
/// `payer_id` is the real user who sends or receives money on the
/// group's behalf when a settlement is resolved to people.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub event_id: String,
    pub member_ids: Vec<String>,
    pub representative_id: String,
    pub payer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|m| m == user_id)
    }
}
