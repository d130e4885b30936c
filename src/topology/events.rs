//! Structural-change notification.
//!
//! Mutating operations publish a small closed set of typed events on a
//! synchronous, in-process bus. Events are pure notifications: listeners run
//! in registration order on the caller's thread and cannot veto the change.

use crate::topology::entity_id::EntityId;

/// Structural change to the entity graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelEvent {
    /// A new entity was created.
    Created(EntityId),
    /// An entity passed its destroyability check and is about to be removed.
    AboutToDestroy(EntityId),
    /// An entity's boundary shape changed (reclassification or relinking).
    BoundaryModified(EntityId),
    /// A split produced new entities from `source`.
    Split {
        source: EntityId,
        created_vertex: EntityId,
        /// The new edge or face, absent for loop-edge splits.
        created_entity: Option<EntityId>,
    },
}

/// Synchronous listener registry.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn FnMut(&ModelEvent)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener; it stays subscribed for the life of the bus.
    pub fn subscribe(&mut self, listener: impl FnMut(&ModelEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Delivers `event` to every listener, in registration order.
    pub fn publish(&mut self, event: &ModelEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn id(raw: u64) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |event| {
                if let ModelEvent::Created(e) = event {
                    seen.borrow_mut().push((tag, *e));
                }
            });
        }
        bus.publish(&ModelEvent::Created(id(5)));
        assert_eq!(
            *seen.borrow(),
            vec![("first", id(5)), ("second", id(5))]
        );
    }

    #[test]
    fn split_event_carries_optional_entity() {
        let event = ModelEvent::Split {
            source: id(1),
            created_vertex: id(2),
            created_entity: None,
        };
        match event {
            ModelEvent::Split { created_entity, .. } => assert!(created_entity.is_none()),
            _ => unreachable!(),
        }
    }
}
