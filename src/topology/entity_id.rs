//! `EntityId`: a strong, zero-cost handle for model entities.
//!
//! Every entity in the topology graph (vertex, edge, face, region, use
//! object, group, material) is identified by a persistent, process-wide
//! unique integer. `EntityId` wraps a nonzero `u64` so 0 stays reserved as an
//! invalid/sentinel value, and ids survive archive round-trips bit-for-bit.

use crate::model_error::ModelError;
use std::{fmt, num::NonZeroU64};

/// Persistent identifier of a model entity.
///
/// `repr(transparent)` guarantees the same layout as a `u64`, so ids can be
/// stored and exchanged as plain integers (the archive does exactly that).
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct EntityId(NonZeroU64);

impl EntityId {
    /// Creates an `EntityId` from a raw `u64`.
    ///
    /// Returns [`ModelError::InvalidEntityId`] when `raw == 0`.
    #[inline]
    pub fn new(raw: u64) -> Result<Self, ModelError> {
        NonZeroU64::new(raw)
            .map(EntityId)
            .ok_or(ModelError::InvalidEntityId)
    }

    /// Returns the raw `u64` value of this id.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityId").field(&self.get()).finish()
    }
}

/// Prints only the raw integer, without wrapper text.
impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}
