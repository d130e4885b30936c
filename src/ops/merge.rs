//! Merge: absorb a source entity into a same-kind target.
//!
//! The inverse direction of the split operators. The target takes over every
//! classified cell (faces, edges) or shell-use (regions) of the source; the
//! source is left as an empty, dangling entity whose destruction is the
//! caller's separate step.

use crate::model::Model;
use crate::model_error::ModelError;
use crate::ops::operator::ModelOperator;
use crate::topology::entity_id::EntityId;
use crate::topology::events::ModelEvent;
use crate::topology::kind::EntityKind;

/// Merges `source` into `target`; both must be Faces, Edges, or Regions of
/// the same kind.
#[derive(Debug, Default)]
pub struct MergeOperator {
    target: Option<EntityId>,
    source: Option<EntityId>,
    /// For edges: the 1–2 vertices the two edges must share.
    shared_vertices: Vec<EntityId>,
    succeeded: bool,
}

impl MergeOperator {
    pub fn new(target: EntityId, source: EntityId) -> Self {
        Self {
            target: Some(target),
            source: Some(source),
            ..Self::default()
        }
    }

    /// Declares the vertices shared by two edges being merged.
    pub fn with_shared_vertices(mut self, vertices: Vec<EntityId>) -> Self {
        self.shared_vertices = vertices;
        self
    }

    fn unordered_region_pair(
        model: &Model,
        face: EntityId,
    ) -> Result<[Option<EntityId>; 2], ModelError> {
        let mut pair = model.regions_adjacent_to_face(face)?;
        pair.sort();
        Ok(pair)
    }

    fn edge_has_endpoint(model: &Model, edge: EntityId, vertex: EntityId) -> bool {
        model
            .graph
            .edge(edge)
            .is_ok_and(|record| record.vertices.contains(&Some(vertex)))
    }

    fn merge(
        &self,
        model: &mut Model,
        target: EntityId,
        source: EntityId,
        kind: EntityKind,
    ) -> Result<(), ModelError> {
        match kind {
            EntityKind::Face | EntityKind::Edge => {
                let cells = model.classification.remove_entity(source);
                model.classification.classify_cells(target, &cells);
            }
            EntityKind::Region => {
                let shells = std::mem::take(&mut model.graph.region_mut(source)?.shell_uses);
                for shell in &shells {
                    model.graph.shell_use_mut(*shell)?.region = target;
                }
                model.graph.region_mut(target)?.shell_uses.extend(shells);
            }
            other => {
                return Err(ModelError::InvalidGeometry(format!(
                    "{other:?} entities cannot be merged"
                )));
            }
        }
        model.publish(ModelEvent::BoundaryModified(target));
        Ok(())
    }
}

impl ModelOperator for MergeOperator {
    fn able_to_operate(&self, model: &Model) -> bool {
        let (Some(target), Some(source)) = (self.target, self.source) else {
            log::warn!("merge: target or source id not set");
            return false;
        };
        if target == source {
            log::warn!("merge: target and source are the same entity {target}");
            return false;
        }
        let (Some(target_kind), Some(source_kind)) = (
            model.graph.entity_kind(target),
            model.graph.entity_kind(source),
        ) else {
            log::warn!("merge: unresolved target {target} or source {source}");
            return false;
        };
        if target_kind != source_kind {
            log::warn!(
                "merge: kind mismatch, target {target} is {target_kind:?}, source {source} is {source_kind:?}"
            );
            return false;
        }
        if !target_kind.is_mergeable() {
            log::warn!("merge: {target_kind:?} entities cannot be merged");
            return false;
        }
        match target_kind {
            EntityKind::Face => {
                let pairs = (
                    Self::unordered_region_pair(model, target),
                    Self::unordered_region_pair(model, source),
                );
                match pairs {
                    (Ok(a), Ok(b)) if a == b => true,
                    (Ok(_), Ok(_)) => {
                        log::warn!(
                            "merge: faces {target} and {source} bound different region pairs"
                        );
                        false
                    }
                    _ => {
                        log::warn!("merge: could not resolve adjacent regions");
                        false
                    }
                }
            }
            EntityKind::Edge => {
                if self.shared_vertices.is_empty() || self.shared_vertices.len() > 2 {
                    log::warn!(
                        "merge: expected 1-2 shared vertices, got {}",
                        self.shared_vertices.len()
                    );
                    return false;
                }
                for &vertex in &self.shared_vertices {
                    if !Self::edge_has_endpoint(model, target, vertex)
                        || !Self::edge_has_endpoint(model, source, vertex)
                    {
                        log::warn!(
                            "merge: vertex {vertex} is not an endpoint of both edges"
                        );
                        return false;
                    }
                }
                true
            }
            EntityKind::Region => true,
            other => {
                log::warn!("merge: {other:?} entities cannot be merged");
                false
            }
        }
    }

    fn operate(&mut self, model: &mut Model) -> bool {
        self.succeeded = false;
        let (Some(target), Some(source)) = (self.target, self.source) else {
            log::warn!("merge: target or source id not set");
            return false;
        };
        let Some(kind) = model.graph.entity_kind(target) else {
            log::warn!("merge: unresolved target {target}");
            return false;
        };
        match self.merge(model, target, source, kind) {
            Ok(()) => {
                self.succeeded = true;
                true
            }
            Err(err) => {
                log::warn!("merge failed: {err}");
                false
            }
        }
    }

    fn succeeded(&self) -> bool {
        self.succeeded
    }
}
