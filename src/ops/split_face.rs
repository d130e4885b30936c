//! Face split: partition a face's classified cells into smooth patches.
//!
//! Connectivity treats two cells as one patch only when they share a mesh
//! edge and the angle between their normals stays below the feature angle.
//! The component containing the lowest cell index keeps the original face's
//! id; every further component becomes a new face that copies the original
//! sides' shell linkage and group membership.

use std::collections::{BTreeSet, HashMap, VecDeque};

use itertools::Itertools;

use crate::model::Model;
use crate::model_error::ModelError;
use crate::ops::operator::ModelOperator;
use crate::topology::entity_id::EntityId;
use crate::topology::events::ModelEvent;
use crate::topology::kind::EntityKind;

/// Splits one face of the model along feature-angle discontinuities.
#[derive(Debug, Default)]
pub struct FaceSplitOperator {
    face: Option<EntityId>,
    feature_angle: Option<f64>,
    created_faces: Vec<EntityId>,
    succeeded: bool,
}

impl FaceSplitOperator {
    pub fn new(face: EntityId, feature_angle: f64) -> Self {
        Self {
            face: Some(face),
            feature_angle: Some(feature_angle),
            ..Self::default()
        }
    }

    /// Faces created by the last `operate` call; empty when the face was a
    /// single smooth patch (k = 1).
    pub fn created_faces(&self) -> &[EntityId] {
        &self.created_faces
    }

    /// Feature-angle connected components of `cells`, each ascending, ordered
    /// by their lowest cell index.
    fn connected_components(
        model: &Model,
        cells: &[usize],
        feature_angle: f64,
    ) -> Result<Vec<Vec<usize>>, ModelError> {
        let sorted: Vec<usize> = cells.iter().copied().sorted().dedup().collect();
        // Cells sharing a boundary edge are adjacency candidates.
        let mut by_edge: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for &cell in &sorted {
            let points = &model.mesh.cell(cell)?.points;
            let n = points.len();
            for i in 0..n {
                let (a, b) = (points[i], points[(i + 1) % n]);
                let key = (a.min(b), a.max(b));
                by_edge.entry(key).or_default().push(cell);
            }
        }
        let mut neighbors: HashMap<usize, Vec<usize>> = HashMap::new();
        for incident in by_edge.values() {
            for (&a, &b) in incident.iter().tuple_combinations() {
                neighbors.entry(a).or_default().push(b);
                neighbors.entry(b).or_default().push(a);
            }
        }
        for list in neighbors.values_mut() {
            list.sort_unstable();
            list.dedup();
        }

        let mut components = Vec::new();
        let mut seen = BTreeSet::new();
        for &seed in &sorted {
            if seen.contains(&seed) {
                continue;
            }
            let mut component = vec![];
            let mut queue = VecDeque::from([seed]);
            seen.insert(seed);
            while let Some(cell) = queue.pop_front() {
                component.push(cell);
                for &next in neighbors.get(&cell).map_or(&[][..], Vec::as_slice) {
                    if seen.contains(&next) {
                        continue;
                    }
                    if model.mesh.normal_angle_degrees(cell, next)? < feature_angle {
                        seen.insert(next);
                        queue.push_back(next);
                    }
                }
            }
            component.sort_unstable();
            components.push(component);
        }
        Ok(components)
    }

    fn split(
        &mut self,
        model: &mut Model,
        face: EntityId,
        feature_angle: f64,
    ) -> Result<(), ModelError> {
        let cells: Vec<usize> = model.classification.reverse_classification(face).to_vec();
        let components = Self::connected_components(model, &cells, feature_angle)?;
        if components.len() <= 1 {
            return Ok(());
        }

        let source_uses = model.graph.face(face)?.uses;
        let shells = [
            model.graph.face_use(source_uses[0])?.shell_use,
            model.graph.face_use(source_uses[1])?.shell_use,
        ];
        for component in &components[1..] {
            let new_face = model.build_face([None, None])?;
            let new_uses = model.graph.face(new_face)?.uses;
            for (side, shell) in shells.into_iter().enumerate() {
                if let Some(shell) = shell {
                    model.graph.attach_face_use_to_shell(new_uses[side], shell)?;
                }
            }
            model.classification.classify_cells(new_face, component);
            model
                .groups
                .copy_membership(face, new_face, EntityKind::Face);
            self.created_faces.push(new_face);
        }

        let adjacent_regions: Vec<EntityId> = model
            .regions_adjacent_to_face(face)?
            .into_iter()
            .flatten()
            .sorted()
            .dedup()
            .collect();
        for region in adjacent_regions {
            model.publish(ModelEvent::BoundaryModified(region));
        }
        Ok(())
    }
}

impl ModelOperator for FaceSplitOperator {
    fn able_to_operate(&self, model: &Model) -> bool {
        let Some(face) = self.face else {
            log::warn!("face split: no face id set");
            return false;
        };
        if let Err(err) = model.graph.face(face) {
            log::warn!("face split: {err}");
            return false;
        }
        match self.feature_angle {
            None => {
                log::warn!("face split: no feature angle set");
                false
            }
            Some(angle) if !angle.is_finite() || angle <= 0.0 || angle > 180.0 => {
                log::warn!("face split: degenerate feature angle {angle}");
                false
            }
            Some(_) => true,
        }
    }

    fn operate(&mut self, model: &mut Model) -> bool {
        self.succeeded = false;
        self.created_faces.clear();
        let (Some(face), Some(feature_angle)) = (self.face, self.feature_angle) else {
            log::warn!("face split: face or feature angle not set");
            return false;
        };
        match self.split(model, face, feature_angle) {
            Ok(()) => {
                self.succeeded = true;
                true
            }
            Err(err) => {
                log::warn!("face split of {face} failed: {err}");
                false
            }
        }
    }

    fn succeeded(&self) -> bool {
        self.succeeded
    }
}
