use super::entity::EntityType;
use serde::{Deserialize, Serialize};

/// Net position of one entity. Positive means the entity is owed money,
/// negative means it owes. Derived on demand, never persisted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Balance {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub amount: f64,
}
