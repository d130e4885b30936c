//! Consumed collaborator interfaces.
//!
//! The kernel delegates two concerns to external engines: planar
//! triangulation of boundary outlines ([`triangulate`]) and range queries
//! over an external mesh database during import ([`query`]). Only the
//! traits live here; backends are supplied by the embedding application.

pub mod query;
pub mod triangulate;

pub use query::{EntityHandle, MeshQuery, intersect_sorted, subtract_sorted, union_sorted};
pub use triangulate::{PlanarTriangulator, TriangulationOutput};
