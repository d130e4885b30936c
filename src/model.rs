//! The assembled kernel: master mesh, entity graph, classification index,
//! registries, and the event bus.
//!
//! A `Model` is exclusively owned by one caller; every operation runs to
//! completion on the caller's thread before returning. Builds routed through
//! the model publish [`ModelEvent::Created`]; destruction publishes
//! [`ModelEvent::AboutToDestroy`] after the destroyability check passes.

use itertools::Itertools;

use crate::classification::ClassificationIndex;
use crate::groups::{EntityGroup, GroupRegistry};
use crate::materials::{Material, MaterialRegistry};
use crate::mesh::MasterMesh;
use crate::model_error::ModelError;
use crate::topology::entity_id::EntityId;
use crate::topology::events::{EventBus, ModelEvent};
use crate::topology::graph::EntityGraph;
use crate::topology::kind::EntityKind;

/// One discrete B-Rep model.
#[derive(Debug, Default)]
pub struct Model {
    pub mesh: MasterMesh,
    pub graph: EntityGraph,
    pub classification: ClassificationIndex,
    pub groups: GroupRegistry,
    pub materials: MaterialRegistry,
    bus: EventBus,
}

impl Model {
    /// Creates an empty model over the given master mesh.
    pub fn new(mesh: MasterMesh) -> Self {
        Self {
            mesh,
            ..Self::default()
        }
    }

    /// Registers a structural-change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&ModelEvent) + 'static) {
        self.bus.subscribe(listener);
    }

    pub(crate) fn publish(&mut self, event: ModelEvent) {
        self.bus.publish(&event);
    }

    // ---- Build passthroughs (emit Created) ------------------------------

    pub fn build_vertex(&mut self, point: Option<usize>) -> EntityId {
        let id = self.graph.build_vertex(point);
        self.publish(ModelEvent::Created(id));
        id
    }

    pub fn build_edge(
        &mut self,
        v0: Option<EntityId>,
        v1: Option<EntityId>,
    ) -> Result<EntityId, ModelError> {
        let id = self.graph.build_edge(v0, v1)?;
        self.publish(ModelEvent::Created(id));
        Ok(id)
    }

    pub fn build_face(
        &mut self,
        regions: [Option<EntityId>; 2],
    ) -> Result<EntityId, ModelError> {
        let id = self.graph.build_face(regions)?;
        self.publish(ModelEvent::Created(id));
        Ok(id)
    }

    pub fn build_region(&mut self) -> EntityId {
        let id = self.graph.build_region();
        self.publish(ModelEvent::Created(id));
        id
    }

    pub fn build_group(&mut self, name: impl Into<String>, kind: EntityKind) -> EntityId {
        let id = self.graph.register_external(EntityKind::Group);
        self.groups.insert(EntityGroup::new(id, name, kind));
        self.publish(ModelEvent::Created(id));
        id
    }

    pub fn build_material(&mut self, name: impl Into<String>) -> EntityId {
        let id = self.graph.register_external(EntityKind::Material);
        self.materials.insert(Material::new(id, name));
        self.publish(ModelEvent::Created(id));
        id
    }

    // ---- Destruction -----------------------------------------------------

    /// Destroys an entity: `false` with no mutation when live external
    /// references remain. Classification, group, and material associations of
    /// the entity itself count as owned and are cleaned up.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        match self.graph.entity_kind(id) {
            Some(EntityKind::Group) => {
                self.publish(ModelEvent::AboutToDestroy(id));
                self.groups.remove(id);
                self.graph.unregister(id);
                true
            }
            Some(EntityKind::Material) => {
                self.publish(ModelEvent::AboutToDestroy(id));
                self.materials.clear_material(id);
                self.graph.unregister(id);
                true
            }
            Some(_) => {
                if !self.graph.is_destroyable(id) {
                    return false;
                }
                self.publish(ModelEvent::AboutToDestroy(id));
                self.classification.remove_entity(id);
                self.groups.remove_everywhere(id);
                self.materials.detach(id);
                self.graph.destroy(id)
            }
            None => false,
        }
    }

    // ---- Adjacency helpers ----------------------------------------------

    /// Faces reachable from an edge through its edge-uses' loops, ascending
    /// and deduplicated.
    pub fn faces_adjacent_to_edge(&self, edge: EntityId) -> Result<Vec<EntityId>, ModelError> {
        let record = self.graph.edge(edge)?;
        let mut faces = Vec::new();
        for use_id in record.uses {
            if let Some(loop_id) = self.graph.edge_use(use_id)?.loop_use {
                let face_use = self.graph.loop_use(loop_id)?.face_use;
                faces.push(self.graph.face_use(face_use)?.face);
            }
        }
        Ok(faces.into_iter().sorted().dedup().collect())
    }

    /// The regions on the two sides of a face, by side slot.
    pub fn regions_adjacent_to_face(
        &self,
        face: EntityId,
    ) -> Result<[Option<EntityId>; 2], ModelError> {
        let record = self.graph.face(face)?;
        let mut regions = [None, None];
        for (side, use_id) in record.uses.into_iter().enumerate() {
            if let Some(shell) = self.graph.face_use(use_id)?.shell_use {
                regions[side] = Some(self.graph.shell_use(shell)?.region);
            }
        }
        Ok(regions)
    }

    /// Boundary point ids of a classified entity, derived on demand.
    pub fn boundary_point_ids(&self, entity: EntityId) -> Result<Vec<usize>, ModelError> {
        self.classification.boundary_point_ids(entity, &self.mesh)
    }
}
