use crate::core::models::{EntityRef, EntityType, Group};
use std::collections::HashMap;
use tracing::warn;

/// Maps users to the group entity they roll up into within one event.
///
/// Built once per operation from the event's groups and shared by payer
/// resolution, split resolution, settlement-identity resolution and
/// lifecycle authorization, so all four agree on the rollup.
pub struct GroupResolver {
    member_to_group: HashMap<String, String>,
    groups_by_id: HashMap<String, Group>,
}

impl GroupResolver {
    /// Upstream is expected to keep memberships disjoint. If a user shows
    /// up in more than one group anyway, the first group in input order
    /// wins and the overlap is logged; whether that is the right answer is
    /// an open data-model question, so the behavior is deliberately kept
    /// order-deterministic rather than "fixed" here.
    pub fn new(groups: &[Group]) -> Self {
        let mut member_to_group: HashMap<String, String> = HashMap::new();
        let mut groups_by_id = HashMap::new();

        for group in groups {
            for member in &group.member_ids {
                if let Some(existing) = member_to_group.get(member) {
                    warn!(
                        user_id = %member,
                        kept = %existing,
                        ignored = %group.id,
                        "user belongs to multiple groups in one event"
                    );
                    continue;
                }
                member_to_group.insert(member.clone(), group.id.clone());
            }
            groups_by_id.insert(group.id.clone(), group.clone());
        }

        GroupResolver {
            member_to_group,
            groups_by_id,
        }
    }

    /// The entity money is tracked against for `user_id`: their group if
    /// they belong to one, otherwise themselves.
    pub fn entity_for(&self, user_id: &str) -> EntityRef {
        match self.member_to_group.get(user_id) {
            Some(group_id) => EntityRef::group(group_id.clone()),
            None => EntityRef::user(user_id.to_string()),
        }
    }

    /// Rolls a split target up into its group when the target is a user
    /// with a group membership; group targets pass through unchanged.
    pub fn roll_up(&self, entity: &EntityRef) -> EntityRef {
        match entity.entity_type {
            EntityType::User => self.entity_for(&entity.entity_id),
            EntityType::Group => entity.clone(),
        }
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups_by_id.get(group_id)
    }

    /// The real user who pays or receives on behalf of an entity. For a
    /// group this is its designated payer; if the group is unknown the
    /// entity id is kept as-is rather than dropping the transaction.
    pub fn payer_user_id(&self, entity: &EntityRef) -> String {
        match entity.entity_type {
            EntityType::User => entity.entity_id.clone(),
            EntityType::Group => self
                .groups_by_id
                .get(&entity.entity_id)
                .map(|g| g.payer_id.clone())
                .unwrap_or_else(|| entity.entity_id.clone()),
        }
    }
}
