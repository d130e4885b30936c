//! Mutating operators over a model.
//!
//! All operators share the [`operator::ModelOperator`] contract: a read-only
//! `able_to_operate` gate, then a mutate-to-completion `operate` that records
//! a `succeeded` flag.

pub mod merge;
pub mod operator;
pub mod split_edge;
pub mod split_face;

pub use merge::MergeOperator;
pub use operator::ModelOperator;
pub use split_edge::EdgeSplitOperator;
pub use split_face::FaceSplitOperator;
