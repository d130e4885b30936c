//! Entity kind tags and per-kind capabilities.
//!
//! The kernel stores every entity behind one discriminated tag instead of a
//! class hierarchy; code that needs kind-specific behavior matches on
//! [`EntityKind`] exhaustively or asks the capability predicates below.

/// Discriminant for every record the entity graph can hold.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum EntityKind {
    /// 0D topological entity referencing a master-mesh point.
    Vertex,
    /// 1D topological entity owning classified curve cells.
    Edge,
    /// 2D topological entity owning classified polygon cells.
    Face,
    /// 3D topological entity bounded by shells of face-uses.
    Region,
    /// One traversal direction of an edge.
    EdgeUse,
    /// Ordered cyclic chain of edge-uses bounding one side of a face.
    LoopUse,
    /// One side of a face.
    FaceUse,
    /// Aggregation of face-uses bounding a region.
    ShellUse,
    /// Named single-kind set of entity references.
    Group,
    /// Exclusive-partition registry entry over faces/regions.
    Material,
}

impl EntityKind {
    /// Kinds that own classified master-mesh cells.
    pub fn has_owned_geometry(self) -> bool {
        matches!(self, EntityKind::Edge | EntityKind::Face)
    }

    /// Kinds that may belong to a material.
    pub fn has_material(self) -> bool {
        matches!(self, EntityKind::Face | EntityKind::Region)
    }

    /// Kinds that may be tagged by entity groups.
    pub fn has_groups(self) -> bool {
        matches!(self, EntityKind::Edge | EntityKind::Face | EntityKind::Region)
    }

    /// Kinds the merge operator accepts.
    pub fn is_mergeable(self) -> bool {
        matches!(self, EntityKind::Edge | EntityKind::Face | EntityKind::Region)
    }

    /// Top-level model entities (everything that is not a use object).
    pub fn is_model_entity(self) -> bool {
        matches!(
            self,
            EntityKind::Vertex
                | EntityKind::Edge
                | EntityKind::Face
                | EntityKind::Region
                | EntityKind::Group
                | EntityKind::Material
        )
    }
}
