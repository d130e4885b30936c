//! Model persistence.
//!
//! This module provides the flat archive representation of a model
//! ([`archive`]) and the save/restore walks that move a live [`Model`]
//! in and out of it ([`state`]).
//!
//! [`Model`]: crate::model::Model

pub mod archive;
pub mod state;

pub use archive::{Archive, PropertyBag, Record};
pub use state::{SerializerMode, StateSerializer, restore_state, save_state};
