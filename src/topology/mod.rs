//! Top-level module for the boundary-representation topology.
//!
//! This module provides the core types of the B-Rep kernel:
//! - Strong entity ids and the kind tag
//! - Entity records and their oriented use objects
//! - The entity graph that owns them all
//! - The structural-change event bus
//!
//! Most users will interact with [`graph::EntityGraph`] through
//! [`Model`](crate::model::Model), which couples it to the classification
//! index and the registries.

pub mod entity;
pub mod entity_id;
pub mod events;
pub mod graph;
pub mod kind;

pub use entity::{
    Appearance, Edge, EdgeUse, Face, FaceUse, LoopUse, Region, ShellUse, Vertex, VertexUse,
};
pub use entity_id::EntityId;
pub use events::{EventBus, ModelEvent};
pub use graph::EntityGraph;
pub use kind::EntityKind;
