use serde::{Deserialize, Serialize};

/// Balances are tracked per entity: a lone user, or a group acting as one
/// economic unit.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Group,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    pub entity_type: EntityType,
    pub entity_id: String,
}

impl EntityRef {
    pub fn user(id: impl Into<String>) -> Self {
        EntityRef {
            entity_type: EntityType::User,
            entity_id: id.into(),
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        EntityRef {
            entity_type: EntityType::Group,
            entity_id: id.into(),
        }
    }
}
