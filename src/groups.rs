//! Named entity groups for boundary-condition tagging.
//!
//! A group holds non-owning references to entities of a single kind. Adding
//! an entity of another kind is rejected; membership is otherwise free-form
//! and survives splits (the split operators copy membership onto fragments).

use std::collections::{BTreeMap, BTreeSet};

use crate::model_error::ModelError;
use crate::topology::entity_id::EntityId;
use crate::topology::kind::EntityKind;

/// A named, single-kind set of entity references.
#[derive(Clone, Debug)]
pub struct EntityGroup {
    pub id: EntityId,
    pub name: String,
    pub kind: EntityKind,
    members: BTreeSet<EntityId>,
}

impl EntityGroup {
    pub fn new(id: EntityId, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            members: BTreeSet::new(),
        }
    }

    /// Adds an entity of the group's kind.
    pub fn add(&mut self, entity: EntityId, kind: EntityKind) -> Result<bool, ModelError> {
        if kind != self.kind {
            return Err(ModelError::GroupKindMismatch {
                group: self.id,
                expected: self.kind,
                found: kind,
            });
        }
        Ok(self.members.insert(entity))
    }

    /// Removes an entity; returns whether it was a member.
    pub fn remove(&mut self, entity: EntityId) -> bool {
        self.members.remove(&entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.members.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in ascending id order.
    pub fn members(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().copied()
    }
}

/// All groups of one model, keyed by group id.
#[derive(Clone, Debug, Default)]
pub struct GroupRegistry {
    groups: BTreeMap<EntityId, EntityGroup>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: EntityGroup) {
        self.groups.insert(group.id, group);
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityGroup> {
        self.groups.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityGroup> {
        self.groups.get_mut(&id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<EntityGroup> {
        self.groups.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Ids of groups containing `entity`, ascending.
    pub fn groups_containing(&self, entity: EntityId) -> Vec<EntityId> {
        self.groups
            .values()
            .filter(|g| g.contains(entity))
            .map(|g| g.id)
            .collect()
    }

    /// Copies every membership of `source` onto `target` (same kind assumed;
    /// used by face split to tag fragments like their source).
    pub fn copy_membership(&mut self, source: EntityId, target: EntityId, kind: EntityKind) {
        for group in self.groups.values_mut() {
            if group.contains(source) {
                // Kind already matched when source was added.
                let _ = group.add(target, kind);
            }
        }
    }

    /// Drops `entity` from every group (destroy cleanup).
    pub fn remove_everywhere(&mut self, entity: EntityId) {
        for group in self.groups.values_mut() {
            group.remove(entity);
        }
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}
