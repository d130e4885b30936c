//! # mesh-brep
//!
//! mesh-brep is a discrete boundary-representation topology kernel for
//! simulation preprocessing. It maintains a B-Rep of a model built from
//! polygon-mesh surfaces — vertices, edges, faces, and regions together with
//! their oriented use objects — tracks which master-mesh cells each boundary
//! piece owns, and supports interactive splitting and merging of those
//! pieces under topological invariants.
//!
//! ## Features
//! - Entity graph with id-indexed lookup and kind-scoped iteration
//! - Cell-to-entity classification index with atomic bulk reclassification
//! - Edge-split, face-split, and merge operators under a uniform
//!   precondition/operate/succeeded contract
//! - Named entity groups and exclusive material ownership
//! - Whole-model save/restore through a flat, id-referencing archive
//!
//! ## Determinism
//!
//! Entity stores are ordered maps and every derived list (adjacency,
//! reverse classification, connected components) is emitted sorted, so the
//! same inputs always produce the same ids, the same iteration order, and
//! the same archives.
//!
//! ## Usage
//! Add `mesh-brep` as a dependency in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mesh-brep = "0.1"
//! ```

pub mod classification;
pub mod collab;
pub mod groups;
pub mod io;
pub mod materials;
pub mod mesh;
pub mod model;
pub mod model_error;
pub mod ops;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::classification::ClassificationIndex;
    pub use crate::collab::query::MeshQuery;
    pub use crate::collab::triangulate::{PlanarTriangulator, TriangulationOutput};
    pub use crate::groups::{EntityGroup, GroupRegistry};
    pub use crate::io::archive::{Archive, PropertyBag, Record};
    pub use crate::io::state::{StateSerializer, restore_state, save_state};
    pub use crate::materials::{Material, MaterialRegistry};
    pub use crate::mesh::cell_type::CellType;
    pub use crate::mesh::{MasterMesh, MeshCell};
    pub use crate::model::Model;
    pub use crate::model_error::ModelError;
    pub use crate::ops::merge::MergeOperator;
    pub use crate::ops::operator::ModelOperator;
    pub use crate::ops::split_edge::EdgeSplitOperator;
    pub use crate::ops::split_face::FaceSplitOperator;
    pub use crate::topology::entity_id::EntityId;
    pub use crate::topology::events::{EventBus, ModelEvent};
    pub use crate::topology::graph::EntityGraph;
    pub use crate::topology::kind::EntityKind;
}
