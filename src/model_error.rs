//! ModelError: unified error type for mesh-brep public APIs.
//!
//! Every fallible operation in the kernel reports through this enum so that
//! callers get robust, non-panicking error handling. Mutating operators
//! translate these errors into their boolean `succeeded` contract and log the
//! reason instead of propagating.

use crate::topology::entity_id::EntityId;
use crate::topology::kind::EntityKind;
use thiserror::Error;

/// Unified error type for mesh-brep operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Attempted to construct an [`EntityId`] with a zero value (invalid).
    #[error("EntityId must be non-zero (0 is reserved as invalid/sentinel)")]
    InvalidEntityId,
    /// No entity with the given id exists in the graph.
    #[error("entity `{0}` not found")]
    EntityNotFound(EntityId),
    /// An entity resolved to a different kind than the caller required.
    #[error("entity `{id}` is a {found:?}, expected {expected:?}")]
    KindMismatch {
        id: EntityId,
        expected: EntityKind,
        found: EntityKind,
    },
    /// An explicit-id build collided with an id already present in the graph.
    #[error("entity id `{0}` is already in use")]
    DuplicateEntityId(EntityId),
    /// A loop-use chain does not close head-to-tail.
    #[error("loop-use `{0}` is not a closed head-to-tail chain")]
    OpenLoop(EntityId),
    /// A master-mesh point index is out of range.
    #[error("point index {point} out of range (mesh has {count} points)")]
    PointOutOfRange { point: usize, count: usize },
    /// A master-mesh cell index is out of range.
    #[error("cell index {cell} out of range (mesh has {count} cells)")]
    CellOutOfRange { cell: usize, count: usize },
    /// A group only accepts members of its declared kind.
    #[error("group `{group}` holds {expected:?} entities, got {found:?}")]
    GroupKindMismatch {
        group: EntityId,
        expected: EntityKind,
        found: EntityKind,
    },
    /// Restore was asked to ingest an archive with no records.
    #[error("archive is empty; nothing to restore")]
    EmptyArchive,
    /// An archive association names an id with no matching record.
    #[error("archive references unknown entity id `{0}`")]
    UnresolvedReference(u64),
    /// An archive record is missing an expected property or association.
    #[error("malformed archive record `{id}`: {reason}")]
    MalformedRecord { id: u64, reason: String },
    /// A geometric input or collaborator result is degenerate.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}
