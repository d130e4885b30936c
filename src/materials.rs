//! Materials: an exclusive partition over faces and regions.
//!
//! A face or region belongs to at most one material at a time; assigning it
//! to another material detaches it from the previous one first. The registry
//! keeps the reverse owner map so exclusivity holds by construction.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::topology::entity_id::EntityId;
use crate::topology::kind::EntityKind;

/// One exclusive-partition entry.
#[derive(Clone, Debug)]
pub struct Material {
    pub id: EntityId,
    pub name: String,
    members: BTreeMap<EntityKind, BTreeSet<EntityId>>,
}

impl Material {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    /// Associations summed across all entity kinds this material can own.
    pub fn count(&self) -> usize {
        self.members.values().map(BTreeSet::len).sum()
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.members.values().any(|set| set.contains(&entity))
    }

    /// Members of one kind, ascending.
    pub fn members_of(&self, kind: EntityKind) -> impl Iterator<Item = EntityId> + '_ {
        self.members
            .get(&kind)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    fn insert(&mut self, entity: EntityId, kind: EntityKind) {
        self.members.entry(kind).or_default().insert(entity);
    }

    fn remove(&mut self, entity: EntityId) -> bool {
        let mut removed = false;
        for set in self.members.values_mut() {
            removed |= set.remove(&entity);
        }
        removed
    }
}

/// All materials of one model plus the exclusive owner map.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    materials: BTreeMap<EntityId, Material>,
    owner_of: HashMap<EntityId, EntityId>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: Material) {
        // Rebuild owner entries for pre-populated materials (restore path).
        for kind in [EntityKind::Face, EntityKind::Region] {
            for entity in material.members_of(kind).collect::<Vec<_>>() {
                self.owner_of.insert(entity, material.id);
            }
        }
        self.materials.insert(material.id, material);
    }

    pub fn get(&self, id: EntityId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// The material currently owning `entity`, if any.
    pub fn material_of(&self, entity: EntityId) -> Option<EntityId> {
        self.owner_of.get(&entity).copied()
    }

    /// Assigns `entity` to `material`, detaching it from any prior material.
    ///
    /// Returns `false` when the material id is unknown.
    pub fn assign(&mut self, material: EntityId, entity: EntityId, kind: EntityKind) -> bool {
        if !self.materials.contains_key(&material) || !kind.has_material() {
            return false;
        }
        if let Some(previous) = self.owner_of.get(&entity).copied() {
            if previous == material {
                return true;
            }
            if let Some(record) = self.materials.get_mut(&previous) {
                record.remove(entity);
            }
        }
        self.materials
            .get_mut(&material)
            .expect("checked above")
            .insert(entity, kind);
        self.owner_of.insert(entity, material);
        true
    }

    /// Removes a material entirely, detaching all of its members.
    pub fn clear_material(&mut self, material: EntityId) {
        if let Some(record) = self.materials.remove(&material) {
            for kind in [EntityKind::Face, EntityKind::Region] {
                for entity in record.members_of(kind).collect::<Vec<_>>() {
                    self.owner_of.remove(&entity);
                }
            }
        }
    }

    /// Detaches `entity` from its material, if any (destroy cleanup).
    pub fn detach(&mut self, entity: EntityId) {
        if let Some(owner) = self.owner_of.remove(&entity) {
            if let Some(record) = self.materials.get_mut(&owner) {
                record.remove(entity);
            }
        }
    }

    pub fn clear(&mut self) {
        self.materials.clear();
        self.owner_of.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    #[test]
    fn assignment_is_exclusive() {
        let mut registry = MaterialRegistry::new();
        registry.insert(Material::new(id(1), "steel"));
        registry.insert(Material::new(id(2), "rubber"));
        let face = id(10);
        assert!(registry.assign(id(1), face, EntityKind::Face));
        assert!(registry.assign(id(2), face, EntityKind::Face));
        assert!(!registry.get(id(1)).unwrap().contains(face));
        assert!(registry.get(id(2)).unwrap().contains(face));
        assert_eq!(registry.material_of(face), Some(id(2)));
        let memberships: usize = registry.iter().filter(|m| m.contains(face)).count();
        assert_eq!(memberships, 1);
    }

    #[test]
    fn count_sums_across_kinds() {
        let mut registry = MaterialRegistry::new();
        registry.insert(Material::new(id(1), "steel"));
        registry.assign(id(1), id(10), EntityKind::Face);
        registry.assign(id(1), id(11), EntityKind::Region);
        assert_eq!(registry.get(id(1)).unwrap().count(), 2);
    }

    #[test]
    fn edges_cannot_take_materials() {
        let mut registry = MaterialRegistry::new();
        registry.insert(Material::new(id(1), "steel"));
        assert!(!registry.assign(id(1), id(10), EntityKind::Edge));
    }
}
