//! Edge split: partition an edge's classified curve cells at a point.
//!
//! Two terminal cases exist. A loop edge (no adjacent vertices) only gains a
//! vertex: both endpoint slots are set to one new vertex and no new edge is
//! created. An open edge is walked cell-to-cell from the slot-1 endpoint
//! toward the split point; the walked cells become a new edge spanning the
//! new vertex and the old endpoint.
//!
//! The open-edge path constructs the split vertex before the walk is
//! confirmed to succeed. When the walk fails, the operator returns `false`
//! with the edge's classification and endpoints untouched, but the vertex
//! stays in the graph — a deliberate reproduction of the observed behavior so
//! existing archives with such orphan vertices stay equivalent.

use std::collections::{BTreeSet, HashMap};

use crate::model::Model;
use crate::model_error::ModelError;
use crate::ops::operator::ModelOperator;
use crate::topology::entity_id::EntityId;
use crate::topology::events::ModelEvent;

/// Splits one edge of the model at a master-mesh point.
#[derive(Debug, Default)]
pub struct EdgeSplitOperator {
    edge: Option<EntityId>,
    split_point: Option<usize>,
    created_vertex: Option<EntityId>,
    created_edge: Option<EntityId>,
    succeeded: bool,
}

impl EdgeSplitOperator {
    pub fn new(edge: EntityId, split_point: usize) -> Self {
        Self {
            edge: Some(edge),
            split_point: Some(split_point),
            ..Self::default()
        }
    }

    /// The vertex built at the split point, once `operate` ran.
    pub fn created_vertex(&self) -> Option<EntityId> {
        self.created_vertex
    }

    /// The new edge, absent for loop-edge splits.
    pub fn created_edge(&self) -> Option<EntityId> {
        self.created_edge
    }

    /// Point indices of the edge's adjacent vertices, by slot.
    fn endpoint_points(model: &Model, edge: EntityId) -> Result<[Option<usize>; 2], ModelError> {
        let record = model.graph.edge(edge)?;
        let mut points = [None, None];
        for (slot, vertex) in record.vertices.into_iter().enumerate() {
            if let Some(vertex) = vertex {
                points[slot] = model.graph.vertex(vertex)?.point;
            }
        }
        Ok(points)
    }

    /// Walks segment cells from `start_point` to `stop_point` through the
    /// restricted incidence of `cells`, returning the visited cells in walk
    /// order.
    fn walk(
        model: &Model,
        cells: &[usize],
        start_point: usize,
        stop_point: usize,
    ) -> Result<Vec<usize>, ModelError> {
        let mut incident: HashMap<usize, Vec<usize>> = HashMap::new();
        for &cell in cells {
            for &p in &model.mesh.cell(cell)?.points {
                incident.entry(p).or_default().push(cell);
            }
        }
        let mut walked = Vec::new();
        let mut visited = BTreeSet::new();
        let mut current = start_point;
        while current != stop_point {
            let next = incident
                .get(&current)
                .and_then(|list| list.iter().find(|c| !visited.contains(*c)))
                .copied()
                .ok_or_else(|| {
                    ModelError::InvalidGeometry(format!(
                        "edge-cell walk has no next cell at point {current}"
                    ))
                })?;
            visited.insert(next);
            walked.push(next);
            current = model.mesh.segment_other_end(next, current)?;
            if walked.len() > cells.len() {
                return Err(ModelError::InvalidGeometry(
                    "edge-cell walk ran out of cells".into(),
                ));
            }
        }
        Ok(walked)
    }

    fn split_open_edge(
        &mut self,
        model: &mut Model,
        edge: EntityId,
        split_point: usize,
    ) -> Result<(), ModelError> {
        let far_vertex = model.graph.edge(edge)?.vertices[1]
            .ok_or_else(|| ModelError::InvalidGeometry("open edge missing endpoint".into()))?;
        let far_point = model.graph.vertex(far_vertex)?.point.ok_or_else(|| {
            ModelError::InvalidGeometry(format!("vertex {far_vertex} has no mesh point"))
        })?;
        let cells: Vec<usize> = model.classification.reverse_classification(edge).to_vec();

        // Built before the walk is confirmed; leaks on walk failure.
        let new_vertex = model.build_vertex(Some(split_point));
        self.created_vertex = Some(new_vertex);

        let walked = Self::walk(model, &cells, far_point, split_point)?;

        let new_edge = model.build_edge(Some(new_vertex), Some(far_vertex))?;
        self.created_edge = Some(new_edge);
        model.classification.classify_cells(new_edge, &walked);
        model.graph.relink_edge_endpoint(edge, 1, new_vertex)?;

        // Splice each direction's new edge-use into the loop its original
        // counterpart is chained into.
        let old_uses = model.graph.edge(edge)?.uses;
        let new_uses = model.graph.edge(new_edge)?.uses;
        for (old_use, new_use) in old_uses.into_iter().zip(new_uses) {
            if let Some(loop_id) = model.graph.edge_use(old_use)?.loop_use {
                model.graph.splice_into_loop(loop_id, old_use, new_use)?;
            }
        }

        model.publish(ModelEvent::BoundaryModified(edge));
        for face in model.faces_adjacent_to_edge(new_edge)? {
            model.publish(ModelEvent::BoundaryModified(face));
        }
        model.publish(ModelEvent::Split {
            source: edge,
            created_vertex: new_vertex,
            created_entity: Some(new_edge),
        });
        Ok(())
    }

    fn split_loop_edge(
        &mut self,
        model: &mut Model,
        edge: EntityId,
        split_point: usize,
    ) -> Result<(), ModelError> {
        let new_vertex = model.build_vertex(Some(split_point));
        self.created_vertex = Some(new_vertex);
        model.graph.relink_edge_endpoint(edge, 0, new_vertex)?;
        model.graph.relink_edge_endpoint(edge, 1, new_vertex)?;
        model.publish(ModelEvent::BoundaryModified(edge));
        model.publish(ModelEvent::Split {
            source: edge,
            created_vertex: new_vertex,
            created_entity: None,
        });
        Ok(())
    }
}

impl ModelOperator for EdgeSplitOperator {
    fn able_to_operate(&self, model: &Model) -> bool {
        let Some(edge) = self.edge else {
            log::warn!("edge split: no edge id set");
            return false;
        };
        let Some(split_point) = self.split_point else {
            log::warn!("edge split: no split point set");
            return false;
        };
        if let Err(err) = model.graph.edge(edge) {
            log::warn!("edge split: {err}");
            return false;
        }
        if split_point >= model.mesh.point_count() {
            log::warn!(
                "edge split: point {split_point} outside master mesh ({} points)",
                model.mesh.point_count()
            );
            return false;
        }
        let cells = model.classification.reverse_classification(edge);
        let incident = cells
            .iter()
            .filter(|&&c| {
                model
                    .mesh
                    .cell(c)
                    .is_ok_and(|r| r.points.contains(&split_point))
            })
            .count();
        if incident == 0 {
            log::warn!(
                "edge split: point {split_point} is not on edge {edge}'s classified cells"
            );
            return false;
        }
        if incident < 2 {
            log::warn!(
                "edge split: point {split_point} has fewer than two incident cells on edge {edge}"
            );
            return false;
        }
        match Self::endpoint_points(model, edge) {
            Ok(points) => {
                if points.into_iter().flatten().any(|p| p == split_point) {
                    log::warn!("edge split: point {split_point} is already an endpoint");
                    return false;
                }
            }
            Err(err) => {
                log::warn!("edge split: {err}");
                return false;
            }
        }
        true
    }

    fn operate(&mut self, model: &mut Model) -> bool {
        self.succeeded = false;
        let (Some(edge), Some(split_point)) = (self.edge, self.split_point) else {
            return false;
        };
        let is_loop = match model.graph.edge(edge) {
            Ok(record) => record.vertices.iter().all(Option::is_none),
            Err(err) => {
                log::warn!("edge split: {err}");
                return false;
            }
        };
        let outcome = if is_loop {
            self.split_loop_edge(model, edge, split_point)
        } else {
            self.split_open_edge(model, edge, split_point)
        };
        match outcome {
            Ok(()) => {
                self.succeeded = true;
                true
            }
            Err(err) => {
                log::warn!("edge split of {edge} failed: {err}");
                false
            }
        }
    }

    fn succeeded(&self) -> bool {
        self.succeeded
    }
}
