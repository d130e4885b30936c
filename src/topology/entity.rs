//! Entity records and their oriented use objects.
//!
//! These are plain data records; all ownership and linkage bookkeeping lives
//! in [`EntityGraph`](crate::topology::graph::EntityGraph). References between
//! records are always by [`EntityId`], never by pointer, so the graph can be
//! mutated and archived freely.

use crate::topology::entity_id::EntityId;

/// Display/appearance record carried by every model entity.
///
/// Appearance is not part of the portable association graph; the archive
/// stores and re-applies it separately.
#[derive(Clone, Debug, PartialEq)]
pub struct Appearance {
    /// RGBA color in `[0, 1]`.
    pub color: [f64; 4],
    /// Whether the entity is shown.
    pub visible: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            visible: true,
        }
    }
}

/// One edge-end participation of a vertex.
///
/// Vertex-uses are one-to-one with edge endpoint slots, so they are stored
/// inline on the vertex rather than as graph-level records of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexUse {
    /// The edge whose endpoint this use marks.
    pub edge: EntityId,
    /// Endpoint slot on that edge (0 or 1).
    pub end: u8,
}

/// A single point reference into the master mesh's point set.
#[derive(Clone, Debug, Default)]
pub struct Vertex {
    /// Master-mesh point index, when materialized.
    pub point: Option<usize>,
    /// One record per edge-end this vertex participates in.
    pub uses: Vec<VertexUse>,
    pub appearance: Appearance,
}

/// A 1D entity spanning 0 or 2 vertices.
///
/// Zero adjacent vertices marks a loop edge (closed curve with no marked
/// endpoint); exactly one adjacent vertex is invalid and never constructed.
#[derive(Clone, Debug)]
pub struct Edge {
    /// Adjacent vertices by endpoint slot.
    pub vertices: [Option<EntityId>; 2],
    /// The two traversal directions, always present.
    pub uses: [EntityId; 2],
    pub appearance: Appearance,
}

/// One traversal direction of an edge.
#[derive(Clone, Debug)]
pub struct EdgeUse {
    pub edge: EntityId,
    /// `true` runs slot 0 to slot 1.
    pub forward: bool,
    /// The loop-use this direction is chained into, if any.
    pub loop_use: Option<EntityId>,
}

/// Ordered cyclic chain of edge-uses bounding one side of a face.
#[derive(Clone, Debug)]
pub struct LoopUse {
    pub face_use: EntityId,
    /// Cyclic order; endpoint vertices connect head-to-tail.
    pub edge_uses: Vec<EntityId>,
}

/// A 2D entity owning classified polygon cells.
#[derive(Clone, Debug)]
pub struct Face {
    /// The two sides, always present.
    pub uses: [EntityId; 2],
    pub appearance: Appearance,
}

/// One side of a face.
#[derive(Clone, Debug)]
pub struct FaceUse {
    pub face: EntityId,
    /// `true` is the side whose normal agrees with the cell normals.
    pub orientation: bool,
    /// The shell-use this side is aggregated into, if any.
    pub shell_use: Option<EntityId>,
    /// Ordered outer-then-inner loops bounding this side.
    pub loop_uses: Vec<EntityId>,
}

/// Aggregation of face-uses bounding one region.
#[derive(Clone, Debug)]
pub struct ShellUse {
    pub region: EntityId,
    pub face_uses: Vec<EntityId>,
}

/// A 3D entity bounded by one or more shells.
#[derive(Clone, Debug, Default)]
pub struct Region {
    pub shell_uses: Vec<EntityId>,
    pub appearance: Appearance,
}
