//! The entity graph: owner of all topological entities and their use objects.
//!
//! `EntityGraph` holds per-kind stores keyed by [`EntityId`] plus the
//! monotonically increasing id counter every build draws from. Entities are
//! created through the `build_*` factories — auto-assigning the next id, or
//! accepting an explicit id on the restore path — and removed through
//! [`EntityGraph::destroy`], which refuses to cascade through live external
//! references.
//!
//! Iteration over a kind is lazy, restartable, and ascending by id. Structural
//! mutation during iteration is not guarded; callers must not mutate the graph
//! while holding an iterator over it.

use std::collections::BTreeMap;

use crate::model_error::ModelError;
use crate::topology::entity::{
    Edge, EdgeUse, Face, FaceUse, LoopUse, Region, ShellUse, Vertex, VertexUse,
};
use crate::topology::entity_id::EntityId;
use crate::topology::kind::EntityKind;

/// Central store for all topological entities of one model.
#[derive(Debug)]
pub struct EntityGraph {
    next_id: u64,
    kinds: BTreeMap<EntityId, EntityKind>,
    vertices: BTreeMap<EntityId, Vertex>,
    edges: BTreeMap<EntityId, Edge>,
    faces: BTreeMap<EntityId, Face>,
    regions: BTreeMap<EntityId, Region>,
    edge_uses: BTreeMap<EntityId, EdgeUse>,
    loop_uses: BTreeMap<EntityId, LoopUse>,
    face_uses: BTreeMap<EntityId, FaceUse>,
    shell_uses: BTreeMap<EntityId, ShellUse>,
}

macro_rules! typed_accessors {
    ($get:ident, $get_mut:ident, $store:ident, $ty:ty, $kind:expr) => {
        /// Returns the record, or an error naming the actual kind when the id
        /// resolves to something else.
        pub fn $get(&self, id: EntityId) -> Result<&$ty, ModelError> {
            self.$store.get(&id).ok_or_else(|| self.missing(id, $kind))
        }

        pub fn $get_mut(&mut self, id: EntityId) -> Result<&mut $ty, ModelError> {
            let err = self.missing(id, $kind);
            self.$store.get_mut(&id).ok_or(err)
        }
    };
}

impl Default for EntityGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityGraph {
    /// Creates an empty graph; the first assigned id is 1.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            kinds: BTreeMap::new(),
            vertices: BTreeMap::new(),
            edges: BTreeMap::new(),
            faces: BTreeMap::new(),
            regions: BTreeMap::new(),
            edge_uses: BTreeMap::new(),
            loop_uses: BTreeMap::new(),
            face_uses: BTreeMap::new(),
            shell_uses: BTreeMap::new(),
        }
    }

    fn missing(&self, id: EntityId, expected: EntityKind) -> ModelError {
        match self.kinds.get(&id) {
            Some(&found) => ModelError::KindMismatch {
                id,
                expected,
                found,
            },
            None => ModelError::EntityNotFound(id),
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id).expect("id counter is monotone from 1");
        self.next_id += 1;
        id
    }

    /// Reserves an explicit id, advancing the counter past it.
    fn claim_id(&mut self, id: EntityId) -> Result<(), ModelError> {
        if self.kinds.contains_key(&id) {
            return Err(ModelError::DuplicateEntityId(id));
        }
        self.next_id = self.next_id.max(id.get() + 1);
        Ok(())
    }

    /// Current value of the id counter (the next id to be auto-assigned).
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Advances the id counter to at least `value`. Used by restore so that
    /// entities built after a restore never collide with restored ids.
    pub fn advance_id_counter(&mut self, value: u64) {
        self.next_id = self.next_id.max(value);
    }

    /// Kind of the entity, or `None` when the id is unknown.
    pub fn entity_kind(&self, id: EntityId) -> Option<EntityKind> {
        self.kinds.get(&id).copied()
    }

    /// Lazy, restartable iteration over all ids of one kind, ascending.
    pub fn iter(&self, kind: EntityKind) -> impl Iterator<Item = EntityId> + '_ {
        self.kinds
            .iter()
            .filter(move |&(_, &k)| k == kind)
            .map(|(&id, _)| id)
    }

    /// Number of entities of one kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.iter(kind).count()
    }

    /// Total number of records of any kind.
    pub fn total_count(&self) -> usize {
        self.kinds.len()
    }

    typed_accessors!(vertex, vertex_mut, vertices, Vertex, EntityKind::Vertex);
    typed_accessors!(edge, edge_mut, edges, Edge, EntityKind::Edge);
    typed_accessors!(face, face_mut, faces, Face, EntityKind::Face);
    typed_accessors!(region, region_mut, regions, Region, EntityKind::Region);
    typed_accessors!(edge_use, edge_use_mut, edge_uses, EdgeUse, EntityKind::EdgeUse);
    typed_accessors!(loop_use, loop_use_mut, loop_uses, LoopUse, EntityKind::LoopUse);
    typed_accessors!(face_use, face_use_mut, face_uses, FaceUse, EntityKind::FaceUse);
    typed_accessors!(
        shell_use,
        shell_use_mut,
        shell_uses,
        ShellUse,
        EntityKind::ShellUse
    );

    // ---- Build factories (auto id) -------------------------------------

    /// Builds a vertex, optionally anchored to a master-mesh point.
    pub fn build_vertex(&mut self, point: Option<usize>) -> EntityId {
        let id = self.allocate_id();
        self.kinds.insert(id, EntityKind::Vertex);
        self.vertices.insert(
            id,
            Vertex {
                point,
                ..Vertex::default()
            },
        );
        id
    }

    /// Builds an edge spanning zero or two vertices, together with its two
    /// edge-uses, and registers the vertex-uses on the adjacent vertices.
    ///
    /// An edge with exactly one adjacent vertex is invalid and rejected.
    /// Both slots referencing the same vertex is allowed (the loop-split
    /// outcome).
    pub fn build_edge(
        &mut self,
        v0: Option<EntityId>,
        v1: Option<EntityId>,
    ) -> Result<EntityId, ModelError> {
        if v0.is_some() != v1.is_some() {
            return Err(ModelError::InvalidGeometry(
                "edge must span zero or two vertices".into(),
            ));
        }
        for v in [v0, v1].into_iter().flatten() {
            self.vertex(v)?;
        }
        let id = self.allocate_id();
        let uses = [self.allocate_id(), self.allocate_id()];
        self.kinds.insert(id, EntityKind::Edge);
        for (use_id, forward) in uses.into_iter().zip([true, false]) {
            self.kinds.insert(use_id, EntityKind::EdgeUse);
            self.edge_uses.insert(
                use_id,
                EdgeUse {
                    edge: id,
                    forward,
                    loop_use: None,
                },
            );
        }
        self.edges.insert(
            id,
            Edge {
                vertices: [v0, v1],
                uses,
                appearance: Default::default(),
            },
        );
        for (end, v) in [v0, v1].into_iter().enumerate() {
            if let Some(v) = v {
                self.vertices
                    .get_mut(&v)
                    .expect("checked above")
                    .uses
                    .push(VertexUse {
                        edge: id,
                        end: end as u8,
                    });
            }
        }
        Ok(id)
    }

    /// Builds a face with its two face-uses, attaching each side to the first
    /// shell-use of the given region (created on demand).
    pub fn build_face(
        &mut self,
        regions: [Option<EntityId>; 2],
    ) -> Result<EntityId, ModelError> {
        for r in regions.into_iter().flatten() {
            self.region(r)?;
        }
        let id = self.allocate_id();
        let uses = [self.allocate_id(), self.allocate_id()];
        self.kinds.insert(id, EntityKind::Face);
        for (use_id, orientation) in uses.into_iter().zip([true, false]) {
            self.kinds.insert(use_id, EntityKind::FaceUse);
            self.face_uses.insert(
                use_id,
                FaceUse {
                    face: id,
                    orientation,
                    shell_use: None,
                    loop_uses: Vec::new(),
                },
            );
        }
        self.faces.insert(
            id,
            Face {
                uses,
                appearance: Default::default(),
            },
        );
        for (side, region) in regions.into_iter().enumerate() {
            if let Some(region) = region {
                let shell = self.first_or_new_shell_use(region)?;
                self.attach_face_use_to_shell(uses[side], shell)?;
            }
        }
        Ok(id)
    }

    /// Builds an empty region.
    pub fn build_region(&mut self) -> EntityId {
        let id = self.allocate_id();
        self.kinds.insert(id, EntityKind::Region);
        self.regions.insert(id, Region::default());
        id
    }

    /// Builds an empty shell-use on `region`.
    pub fn build_shell_use(&mut self, region: EntityId) -> Result<EntityId, ModelError> {
        self.region(region)?;
        let id = self.allocate_id();
        self.kinds.insert(id, EntityKind::ShellUse);
        self.shell_uses.insert(
            id,
            ShellUse {
                region,
                face_uses: Vec::new(),
            },
        );
        self.region_mut(region)?.shell_uses.push(id);
        Ok(id)
    }

    fn first_or_new_shell_use(&mut self, region: EntityId) -> Result<EntityId, ModelError> {
        match self.region(region)?.shell_uses.first() {
            Some(&shell) => Ok(shell),
            None => self.build_shell_use(region),
        }
    }

    /// Adds `face_use` to `shell_use`, setting the back-reference.
    pub fn attach_face_use_to_shell(
        &mut self,
        face_use: EntityId,
        shell_use: EntityId,
    ) -> Result<(), ModelError> {
        self.shell_use(shell_use)?;
        self.face_use_mut(face_use)?.shell_use = Some(shell_use);
        let shell = self.shell_use_mut(shell_use)?;
        if !shell.face_uses.contains(&face_use) {
            shell.face_uses.push(face_use);
        }
        Ok(())
    }

    /// Removes `face_use` from its shell-use, if it has one.
    pub fn detach_face_use_from_shell(&mut self, face_use: EntityId) -> Result<(), ModelError> {
        let shell = self.face_use(face_use)?.shell_use;
        if let Some(shell) = shell {
            self.shell_use_mut(shell)?.face_uses.retain(|&u| u != face_use);
            self.face_use_mut(face_use)?.shell_use = None;
        }
        Ok(())
    }

    /// Builds a loop-use on `face_use` from an ordered chain of
    /// `(edge, forward)` picks.
    ///
    /// Claims the chosen direction's edge-use of each edge; every picked
    /// edge-use must still be free. The chain must close head-to-tail through
    /// shared endpoint vertices; a loop edge (no vertices) is only accepted as
    /// a singleton chain.
    pub fn build_loop_use(
        &mut self,
        face_use: EntityId,
        chain: &[(EntityId, bool)],
    ) -> Result<EntityId, ModelError> {
        self.face_use(face_use)?;
        let mut picked = Vec::with_capacity(chain.len());
        for &(edge, forward) in chain {
            let record = self.edge(edge)?;
            let use_id = record.uses[usize::from(!forward)];
            if self.edge_use(use_id)?.loop_use.is_some() {
                return Err(ModelError::InvalidGeometry(format!(
                    "edge-use {use_id} already belongs to a loop"
                )));
            }
            picked.push(use_id);
        }
        let id = self.allocate_id();
        self.validate_chain(id, &picked)?;
        self.kinds.insert(id, EntityKind::LoopUse);
        self.loop_uses.insert(
            id,
            LoopUse {
                face_use,
                edge_uses: picked.clone(),
            },
        );
        for use_id in picked {
            self.edge_use_mut(use_id)?.loop_use = Some(id);
        }
        self.face_use_mut(face_use)?.loop_uses.push(id);
        Ok(id)
    }

    /// Tail and head vertices of an edge-use, in traversal order.
    pub fn edge_use_endpoints(
        &self,
        use_id: EntityId,
    ) -> Result<[Option<EntityId>; 2], ModelError> {
        let eu = self.edge_use(use_id)?;
        let edge = self.edge(eu.edge)?;
        Ok(if eu.forward {
            edge.vertices
        } else {
            [edge.vertices[1], edge.vertices[0]]
        })
    }

    fn validate_chain(&self, loop_id: EntityId, uses: &[EntityId]) -> Result<(), ModelError> {
        if uses.is_empty() {
            return Err(ModelError::OpenLoop(loop_id));
        }
        let endpoints: Vec<[Option<EntityId>; 2]> = uses
            .iter()
            .map(|&u| self.edge_use_endpoints(u))
            .collect::<Result<_, _>>()?;
        if endpoints.iter().any(|ends| ends[0].is_none()) {
            // A closed loop edge carries its own cycle.
            if uses.len() == 1 {
                return Ok(());
            }
            return Err(ModelError::OpenLoop(loop_id));
        }
        for (i, ends) in endpoints.iter().enumerate() {
            let next = &endpoints[(i + 1) % endpoints.len()];
            if ends[1] != next[0] {
                return Err(ModelError::OpenLoop(loop_id));
            }
        }
        Ok(())
    }

    /// Reserves an id for a registry-held entity (group or material) so ids
    /// stay process-wide unique and `entity_kind`/`iter` see them.
    pub fn register_external(&mut self, kind: EntityKind) -> EntityId {
        debug_assert!(matches!(kind, EntityKind::Group | EntityKind::Material));
        let id = self.allocate_id();
        self.kinds.insert(id, kind);
        id
    }

    /// Restore-path twin of [`EntityGraph::register_external`].
    pub fn register_external_with_id(
        &mut self,
        id: EntityId,
        kind: EntityKind,
    ) -> Result<(), ModelError> {
        self.claim_id(id)?;
        self.kinds.insert(id, kind);
        Ok(())
    }

    /// Forgets a registry-held entity's id.
    pub fn unregister(&mut self, id: EntityId) {
        if matches!(
            self.kinds.get(&id),
            Some(EntityKind::Group | EntityKind::Material)
        ) {
            self.kinds.remove(&id);
        }
    }

    // ---- Build factories (explicit id, restore path) --------------------

    /// Restore-path vertex build with an exact id.
    pub fn build_vertex_with_id(
        &mut self,
        id: EntityId,
        point: Option<usize>,
    ) -> Result<EntityId, ModelError> {
        self.claim_id(id)?;
        self.kinds.insert(id, EntityKind::Vertex);
        self.vertices.insert(
            id,
            Vertex {
                point,
                ..Vertex::default()
            },
        );
        Ok(id)
    }

    /// Restore-path raw record insertion with an exact id.
    ///
    /// The record's references may name ids not inserted yet; the restore
    /// walk validates all references once every record is in place.
    pub(crate) fn insert_raw(
        &mut self,
        id: EntityId,
        record: RawRecord,
    ) -> Result<(), ModelError> {
        self.claim_id(id)?;
        let kind = record.kind();
        self.kinds.insert(id, kind);
        match record {
            RawRecord::Vertex(r) => {
                self.vertices.insert(id, r);
            }
            RawRecord::Edge(r) => {
                self.edges.insert(id, r);
            }
            RawRecord::Face(r) => {
                self.faces.insert(id, r);
            }
            RawRecord::Region(r) => {
                self.regions.insert(id, r);
            }
            RawRecord::EdgeUse(r) => {
                self.edge_uses.insert(id, r);
            }
            RawRecord::LoopUse(r) => {
                self.loop_uses.insert(id, r);
            }
            RawRecord::FaceUse(r) => {
                self.face_uses.insert(id, r);
            }
            RawRecord::ShellUse(r) => {
                self.shell_uses.insert(id, r);
            }
        }
        Ok(())
    }

    /// Checks that every id referenced by any record resolves. Used after the
    /// restore ingest, when forward references have all been inserted.
    pub(crate) fn validate_references(&self) -> Result<(), ModelError> {
        let check = |id: EntityId| -> Result<(), ModelError> {
            if self.kinds.contains_key(&id) {
                Ok(())
            } else {
                Err(ModelError::UnresolvedReference(id.get()))
            }
        };
        for v in self.vertices.values() {
            for u in &v.uses {
                check(u.edge)?;
            }
        }
        for e in self.edges.values() {
            for v in e.vertices.into_iter().flatten() {
                check(v)?;
            }
            for u in e.uses {
                check(u)?;
            }
        }
        for eu in self.edge_uses.values() {
            check(eu.edge)?;
            if let Some(l) = eu.loop_use {
                check(l)?;
            }
        }
        for l in self.loop_uses.values() {
            check(l.face_use)?;
            for &u in &l.edge_uses {
                check(u)?;
            }
        }
        for f in self.faces.values() {
            for u in f.uses {
                check(u)?;
            }
        }
        for fu in self.face_uses.values() {
            check(fu.face)?;
            if let Some(s) = fu.shell_use {
                check(s)?;
            }
            for &l in &fu.loop_uses {
                check(l)?;
            }
        }
        for s in self.shell_uses.values() {
            check(s.region)?;
            for &u in &s.face_uses {
                check(u)?;
            }
        }
        for r in self.regions.values() {
            for &s in &r.shell_uses {
                check(s)?;
            }
        }
        Ok(())
    }

    // ---- Relinking ------------------------------------------------------

    /// Repoints one endpoint slot of an edge at a different vertex, fixing the
    /// vertex-use records on both vertices.
    pub fn relink_edge_endpoint(
        &mut self,
        edge: EntityId,
        slot: usize,
        vertex: EntityId,
    ) -> Result<(), ModelError> {
        self.vertex(vertex)?;
        let old = self.edge(edge)?.vertices[slot];
        if let Some(old) = old {
            self.vertex_mut(old)?
                .uses
                .retain(|u| !(u.edge == edge && usize::from(u.end) == slot));
        }
        self.edge_mut(edge)?.vertices[slot] = Some(vertex);
        let record = self.vertex_mut(vertex)?;
        let vertex_use = VertexUse {
            edge,
            end: slot as u8,
        };
        if !record.uses.contains(&vertex_use) {
            record.uses.push(vertex_use);
        }
        Ok(())
    }

    /// Splices `new_use` into the loop next to `anchor_use`, after it when the
    /// anchor runs forward and before it otherwise, and claims it for the
    /// loop.
    pub fn splice_into_loop(
        &mut self,
        loop_id: EntityId,
        anchor_use: EntityId,
        new_use: EntityId,
    ) -> Result<(), ModelError> {
        let after = self.edge_use(anchor_use)?.forward;
        let record = self.loop_use_mut(loop_id)?;
        let at = record
            .edge_uses
            .iter()
            .position(|&u| u == anchor_use)
            .ok_or(ModelError::EntityNotFound(anchor_use))?;
        let insert_at = if after { at + 1 } else { at };
        record.edge_uses.insert(insert_at, new_use);
        self.edge_use_mut(new_use)?.loop_use = Some(loop_id);
        Ok(())
    }

    // ---- Destruction ----------------------------------------------------

    /// True when `id` holds no live topological references from other
    /// entities. Owned uses, loops, and shells do not count; they are cleaned
    /// up by [`EntityGraph::destroy`]. Use objects themselves are only
    /// destroyed through their owners.
    pub fn is_destroyable(&self, id: EntityId) -> bool {
        match self.kinds.get(&id) {
            Some(EntityKind::Vertex) => self
                .vertices
                .get(&id)
                .is_some_and(|v| v.uses.is_empty()),
            Some(EntityKind::Edge) => self.edges.get(&id).is_some_and(|e| {
                e.uses
                    .iter()
                    .all(|u| self.edge_uses[u].loop_use.is_none())
            }),
            Some(EntityKind::Face) => self.faces.get(&id).is_some_and(|f| {
                f.uses
                    .iter()
                    .all(|u| self.face_uses[u].shell_use.is_none())
            }),
            Some(EntityKind::Region) => self.regions.get(&id).is_some_and(|r| {
                r.shell_uses
                    .iter()
                    .all(|s| self.shell_uses[s].face_uses.is_empty())
            }),
            _ => false,
        }
    }

    /// Removes the entity and its owned uses/loops/shells. Returns `false`
    /// with no mutation when [`EntityGraph::is_destroyable`] is false.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        if !self.is_destroyable(id) {
            return false;
        }
        match self.kinds[&id] {
            EntityKind::Vertex => {
                self.vertices.remove(&id);
            }
            EntityKind::Edge => {
                let edge = self.edges.remove(&id).expect("kind map is in sync");
                for (end, v) in edge.vertices.into_iter().enumerate() {
                    if let Some(v) = v {
                        if let Some(vertex) = self.vertices.get_mut(&v) {
                            vertex
                                .uses
                                .retain(|u| !(u.edge == id && usize::from(u.end) == end));
                        }
                    }
                }
                for use_id in edge.uses {
                    self.edge_uses.remove(&use_id);
                    self.kinds.remove(&use_id);
                }
            }
            EntityKind::Face => {
                let face = self.faces.remove(&id).expect("kind map is in sync");
                for use_id in face.uses {
                    let fu = self.face_uses.remove(&use_id).expect("kind map is in sync");
                    for loop_id in fu.loop_uses {
                        let lu = self.loop_uses.remove(&loop_id).expect("kind map is in sync");
                        for eu in lu.edge_uses {
                            if let Some(eu) = self.edge_uses.get_mut(&eu) {
                                eu.loop_use = None;
                            }
                        }
                        self.kinds.remove(&loop_id);
                    }
                    self.kinds.remove(&use_id);
                }
            }
            EntityKind::Region => {
                let region = self.regions.remove(&id).expect("kind map is in sync");
                for shell in region.shell_uses {
                    self.shell_uses.remove(&shell);
                    self.kinds.remove(&shell);
                }
            }
            _ => unreachable!("use objects are never directly destroyable"),
        }
        self.kinds.remove(&id);
        true
    }
}

/// Fully-formed record handed to [`EntityGraph::insert_raw`] on restore.
#[derive(Debug)]
pub(crate) enum RawRecord {
    Vertex(Vertex),
    Edge(Edge),
    Face(Face),
    Region(Region),
    EdgeUse(EdgeUse),
    LoopUse(LoopUse),
    FaceUse(FaceUse),
    ShellUse(ShellUse),
}

impl RawRecord {
    fn kind(&self) -> EntityKind {
        match self {
            RawRecord::Vertex(_) => EntityKind::Vertex,
            RawRecord::Edge(_) => EntityKind::Edge,
            RawRecord::Face(_) => EntityKind::Face,
            RawRecord::Region(_) => EntityKind::Region,
            RawRecord::EdgeUse(_) => EntityKind::EdgeUse,
            RawRecord::LoopUse(_) => EntityKind::LoopUse,
            RawRecord::FaceUse(_) => EntityKind::FaceUse,
            RawRecord::ShellUse(_) => EntityKind::ShellUse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotone_and_unique() {
        let mut graph = EntityGraph::new();
        let v0 = graph.build_vertex(Some(0));
        let v1 = graph.build_vertex(Some(1));
        assert!(v0 < v1);
        assert_eq!(graph.entity_kind(v0), Some(EntityKind::Vertex));
        assert_eq!(graph.count(EntityKind::Vertex), 2);
    }

    #[test]
    fn edge_with_one_vertex_is_rejected() {
        let mut graph = EntityGraph::new();
        let v = graph.build_vertex(None);
        assert!(graph.build_edge(Some(v), None).is_err());
    }

    #[test]
    fn edge_build_registers_vertex_uses() {
        let mut graph = EntityGraph::new();
        let v0 = graph.build_vertex(Some(0));
        let v1 = graph.build_vertex(Some(1));
        let e = graph.build_edge(Some(v0), Some(v1)).unwrap();
        assert_eq!(
            graph.vertex(v0).unwrap().uses,
            vec![VertexUse { edge: e, end: 0 }]
        );
        assert_eq!(
            graph.vertex(v1).unwrap().uses,
            vec![VertexUse { edge: e, end: 1 }]
        );
        let uses = graph.edge(e).unwrap().uses;
        assert!(graph.edge_use(uses[0]).unwrap().forward);
        assert!(!graph.edge_use(uses[1]).unwrap().forward);
    }

    #[test]
    fn face_build_links_region_shells() {
        let mut graph = EntityGraph::new();
        let r0 = graph.build_region();
        let r1 = graph.build_region();
        let f = graph.build_face([Some(r0), Some(r1)]).unwrap();
        let uses = graph.face(f).unwrap().uses;
        let s0 = graph.face_use(uses[0]).unwrap().shell_use.unwrap();
        let s1 = graph.face_use(uses[1]).unwrap().shell_use.unwrap();
        assert_eq!(graph.shell_use(s0).unwrap().region, r0);
        assert_eq!(graph.shell_use(s1).unwrap().region, r1);
    }

    #[test]
    fn vertex_referenced_by_edge_is_not_destroyable() {
        let mut graph = EntityGraph::new();
        let v0 = graph.build_vertex(Some(0));
        let v1 = graph.build_vertex(Some(1));
        let e = graph.build_edge(Some(v0), Some(v1)).unwrap();
        assert!(!graph.is_destroyable(v0));
        assert!(!graph.destroy(v0));
        assert!(graph.destroy(e));
        assert!(graph.is_destroyable(v0));
        assert!(graph.destroy(v0));
        assert_eq!(graph.entity_kind(v0), None);
    }

    #[test]
    fn edge_in_loop_is_not_destroyable() {
        let mut graph = EntityGraph::new();
        let v0 = graph.build_vertex(Some(0));
        let v1 = graph.build_vertex(Some(1));
        let a = graph.build_edge(Some(v0), Some(v1)).unwrap();
        let b = graph.build_edge(Some(v1), Some(v0)).unwrap();
        let f = graph.build_face([None, None]).unwrap();
        let fu = graph.face(f).unwrap().uses[0];
        graph
            .build_loop_use(fu, &[(a, true), (b, true)])
            .unwrap();
        assert!(!graph.is_destroyable(a));
        // Destroying the face releases the chained edge-uses.
        assert!(graph.destroy(f));
        assert!(graph.is_destroyable(a));
    }

    #[test]
    fn loop_chain_must_close() {
        let mut graph = EntityGraph::new();
        let v0 = graph.build_vertex(Some(0));
        let v1 = graph.build_vertex(Some(1));
        let v2 = graph.build_vertex(Some(2));
        let a = graph.build_edge(Some(v0), Some(v1)).unwrap();
        let b = graph.build_edge(Some(v1), Some(v2)).unwrap();
        let f = graph.build_face([None, None]).unwrap();
        let fu = graph.face(f).unwrap().uses[0];
        let err = graph.build_loop_use(fu, &[(a, true), (b, true)]).unwrap_err();
        assert!(matches!(err, ModelError::OpenLoop(_)));
    }

    #[test]
    fn explicit_ids_advance_the_counter() {
        let mut graph = EntityGraph::new();
        let id = EntityId::new(40).unwrap();
        graph.build_vertex_with_id(id, Some(0)).unwrap();
        let next = graph.build_vertex(None);
        assert_eq!(next.get(), 41);
        assert!(graph.build_vertex_with_id(id, None).is_err());
    }

    #[test]
    fn iteration_is_ascending_and_kind_scoped() {
        let mut graph = EntityGraph::new();
        let v = graph.build_vertex(None);
        let r = graph.build_region();
        let v2 = graph.build_vertex(None);
        let vertices: Vec<_> = graph.iter(EntityKind::Vertex).collect();
        assert_eq!(vertices, vec![v, v2]);
        assert_eq!(graph.iter(EntityKind::Region).collect::<Vec<_>>(), vec![r]);
    }
}
