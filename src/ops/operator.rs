//! Uniform contract for mutating operators.
//!
//! Every operator first answers "can this be done?" read-only, logging the
//! reason for any violation, and only then mutates. `operate` assumes the
//! precondition check already passed and records a `succeeded` flag the
//! caller consumes; all failures are return-value signals, never panics.

use crate::model::Model;

/// A mutating operation over a [`Model`].
pub trait ModelOperator {
    /// Read-only precondition check. Logs a reason and returns `false` on any
    /// violation; performs no mutation.
    fn able_to_operate(&self, model: &Model) -> bool;

    /// Performs the mutation, assuming [`ModelOperator::able_to_operate`]
    /// passed. Returns the `succeeded` flag it also stores.
    fn operate(&mut self, model: &mut Model) -> bool;

    /// Whether the last [`ModelOperator::operate`] call succeeded.
    fn succeeded(&self) -> bool;
}
