//! Classification index: which Face or Edge owns each master-mesh cell.
//!
//! The index is a partition by construction: classifying a cell onto an
//! entity removes it from its previous owner first, so no cell ever has two
//! owners. Structural queries that depend on boundary shape (boundary point
//! ids) are derived on demand from the owned cells and never cached across a
//! reclassification.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::mesh::MasterMesh;
use crate::model_error::ModelError;
use crate::topology::entity_id::EntityId;

/// Reverse map from master-mesh cells to their owning entity.
#[derive(Debug, Default)]
pub struct ClassificationIndex {
    owner_of: HashMap<usize, EntityId>,
    cells_of: BTreeMap<EntityId, Vec<usize>>,
}

impl ClassificationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entity owning `cell`, if any.
    pub fn owner(&self, cell: usize) -> Option<EntityId> {
        self.owner_of.get(&cell).copied()
    }

    /// Ordered list of cells currently owned by `entity`.
    pub fn reverse_classification(&self, entity: EntityId) -> &[usize] {
        self.cells_of.get(&entity).map_or(&[], Vec::as_slice)
    }

    /// Number of cells owned by `entity`.
    pub fn cell_count(&self, entity: EntityId) -> usize {
        self.reverse_classification(entity).len()
    }

    /// Atomically reassigns `cells` to `entity`, detaching each from its
    /// current owner. Preserves the given order for newly added cells.
    pub fn classify_cells(&mut self, entity: EntityId, cells: &[usize]) {
        for &cell in cells {
            match self.owner_of.get(&cell) {
                Some(&owner) if owner == entity => continue,
                Some(&owner) => {
                    if let Some(list) = self.cells_of.get_mut(&owner) {
                        list.retain(|&c| c != cell);
                    }
                }
                None => {}
            }
            self.owner_of.insert(cell, entity);
            self.cells_of.entry(entity).or_default().push(cell);
        }
    }

    /// Drops `entity`'s classification; its cells become unowned.
    ///
    /// Returns the cells that were owned.
    pub fn remove_entity(&mut self, entity: EntityId) -> Vec<usize> {
        let cells = self.cells_of.remove(&entity).unwrap_or_default();
        for cell in &cells {
            self.owner_of.remove(cell);
        }
        cells
    }

    /// Entities that currently own at least one cell, ascending.
    pub fn classified_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.cells_of
            .iter()
            .filter(|(_, cells)| !cells.is_empty())
            .map(|(&entity, _)| entity)
    }

    /// Total number of classified cells.
    pub fn classified_cell_count(&self) -> usize {
        self.owner_of.len()
    }

    /// Clears the whole index (restore path).
    pub fn clear(&mut self) {
        self.owner_of.clear();
        self.cells_of.clear();
    }

    /// Point ids on the boundary of `entity`'s owned cells, derived on demand.
    ///
    /// For curve cells these are the points incident to exactly one owned
    /// segment (the free ends); for polygon cells they are the points of cell
    /// edges incident to fewer than two owned cells (the patch rim).
    pub fn boundary_point_ids(
        &self,
        entity: EntityId,
        mesh: &MasterMesh,
    ) -> Result<Vec<usize>, ModelError> {
        let cells = self.reverse_classification(entity);
        let mut boundary = BTreeSet::new();
        let owned: BTreeSet<usize> = cells.iter().copied().collect();
        for &cell in cells {
            let record = mesh.cell(cell)?;
            match record.cell_type.dimension() {
                1 => {
                    for &p in &record.points {
                        let owned_incident = mesh
                            .cells_using_point(p)
                            .iter()
                            .filter(|c| owned.contains(c))
                            .count();
                        if owned_incident == 1 {
                            boundary.insert(p);
                        }
                    }
                }
                2 => {
                    let n = record.points.len();
                    for i in 0..n {
                        let (a, b) = (record.points[i], record.points[(i + 1) % n]);
                        let shared = mesh
                            .cells_using_point(a)
                            .iter()
                            .filter(|&&c| {
                                owned.contains(&c)
                                    && mesh.cell(c).is_ok_and(|r| r.points.contains(&b))
                            })
                            .count();
                        if shared < 2 {
                            boundary.insert(a);
                            boundary.insert(b);
                        }
                    }
                }
                _ => {
                    return Err(ModelError::InvalidGeometry(format!(
                        "cell {cell} has no classifiable boundary"
                    )));
                }
            }
        }
        Ok(boundary.into_iter().collect())
    }
}
