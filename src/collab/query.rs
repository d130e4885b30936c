//! Mesh-database query collaborator.
//!
//! Import reads an external unstructured mesh database through this
//! interface: range queries by type, tag, or dimension, adjacency walks,
//! and parent/child membership. Result sets are sorted handle lists, so
//! they compose with the set helpers below.

use std::collections::HashSet;

use crate::mesh::cell_type::CellType;
use crate::model_error::ModelError;

/// Opaque handle into the external database.
pub type EntityHandle = u64;

/// Read-only range queries over an external mesh database.
///
/// Every method returns handles sorted ascending; callers combine results
/// with [`union_sorted`], [`intersect_sorted`], and [`subtract_sorted`].
pub trait MeshQuery {
    /// All entities of one cell type.
    fn entities_by_type(&self, cell_type: CellType) -> Result<Vec<EntityHandle>, ModelError>;

    /// All entities carrying `tag == value`.
    fn entities_by_tag(&self, tag: &str, value: i64) -> Result<Vec<EntityHandle>, ModelError>;

    /// All entities of topological dimension `dim` (0..=3).
    fn entities_by_dimension(&self, dim: u8) -> Result<Vec<EntityHandle>, ModelError>;

    /// Entities of dimension `dim` adjacent to `entity`.
    fn adjacent(&self, entity: EntityHandle, dim: u8) -> Result<Vec<EntityHandle>, ModelError>;

    /// Direct children of a parent set entity.
    fn children_of(&self, parent: EntityHandle) -> Result<Vec<EntityHandle>, ModelError>;

    /// Whether `entity` is a member of the set `parent`.
    fn is_member(&self, parent: EntityHandle, entity: EntityHandle) -> Result<bool, ModelError>;
}

/// Union of two sorted handle sets, sorted deterministically.
pub fn union_sorted(a: &[EntityHandle], b: &[EntityHandle]) -> Vec<EntityHandle> {
    let mut union: HashSet<EntityHandle> = a.iter().copied().collect();
    union.extend(b.iter().copied());
    let mut handles: Vec<_> = union.into_iter().collect();
    handles.sort_unstable();
    handles
}

/// Intersection of two sorted handle sets, sorted deterministically.
pub fn intersect_sorted(a: &[EntityHandle], b: &[EntityHandle]) -> Vec<EntityHandle> {
    let b_set: HashSet<EntityHandle> = b.iter().copied().collect();
    let mut handles: Vec<_> = a
        .iter()
        .copied()
        .filter(|handle| b_set.contains(handle))
        .collect();
    handles.sort_unstable();
    handles.dedup();
    handles
}

/// Handles in `a` that are not in `b`, sorted deterministically.
pub fn subtract_sorted(a: &[EntityHandle], b: &[EntityHandle]) -> Vec<EntityHandle> {
    let b_set: HashSet<EntityHandle> = b.iter().copied().collect();
    let mut handles: Vec<_> = a
        .iter()
        .copied()
        .filter(|handle| !b_set.contains(handle))
        .collect();
    handles.sort_unstable();
    handles.dedup();
    handles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_helpers_sort_and_dedup() {
        let a = [1, 3, 5, 7];
        let b = [3, 4, 5];
        assert_eq!(union_sorted(&a, &b), vec![1, 3, 4, 5, 7]);
        assert_eq!(intersect_sorted(&a, &b), vec![3, 5]);
        assert_eq!(subtract_sorted(&a, &b), vec![1, 7]);
        assert_eq!(subtract_sorted(&b, &a), vec![4]);
    }
}
