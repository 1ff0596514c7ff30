//! Per-element handler registration
//!
//! Each element carries one callback slot per event type. Registering again
//! for the same type silently replaces the previous callback.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::element::{ElementId, ElementTree, TreeError, TreeResult};
use crate::events::{Event, EventResult, EventType};

/// Registered event callback.
///
/// Handlers receive the tree mutably so they can restructure it; whatever
/// context they need is captured by the closure.
pub type Handler = Arc<dyn Fn(&mut ElementTree, ElementId, &Event) -> EventResult + Send + Sync>;

/// Event type to handler mapping stored on every element
#[derive(Clone, Default)]
pub struct HandlerMap {
    entries: HashMap<EventType, Handler>,
}

impl HandlerMap {
    /// Store `handler` for `ty`, returning the one it replaces
    pub fn insert(&mut self, ty: EventType, handler: Handler) -> Option<Handler> {
        self.entries.insert(ty, handler)
    }

    /// Drop the handler for `ty`
    pub fn remove(&mut self, ty: EventType) -> Option<Handler> {
        self.entries.remove(&ty)
    }

    /// Handler registered for `ty`, if any
    pub fn get(&self, ty: EventType) -> Option<&Handler> {
        self.entries.get(&ty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered types in ascending order
    pub fn types(&self) -> Vec<EventType> {
        let mut types: Vec<_> = self.entries.keys().copied().collect();
        types.sort();
        types
    }
}

impl fmt::Debug for HandlerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMap")
            .field("types", &self.types())
            .finish()
    }
}

impl ElementTree {
    /// Register `handler` for events of type `ty` on `element`.
    ///
    /// Replaces any handler previously registered for the same pair.
    pub fn register_handler<F>(&mut self, element: ElementId, ty: EventType, handler: F) -> TreeResult<()>
    where
        F: Fn(&mut ElementTree, ElementId, &Event) -> EventResult + Send + Sync + 'static,
    {
        let target = self
            .get_mut(element)
            .ok_or(TreeError::ElementNotFound(element))?;

        if target.handlers.insert(ty, Arc::new(handler)).is_some() {
            log::trace!("replaced {} handler on {}", ty, element);
        }

        Ok(())
    }

    /// Remove the handler for `ty` on `element`; a no-op if there is none
    pub fn unregister_handler(&mut self, element: ElementId, ty: EventType) {
        if let Some(target) = self.get_mut(element) {
            target.handlers.remove(ty);
        }
    }

    /// The handler registered for `ty` on exactly `element`
    pub fn lookup_handler(&self, element: ElementId, ty: EventType) -> Option<Handler> {
        self.get(element)
            .and_then(|e| e.handlers.get(ty))
            .cloned()
    }

    pub fn has_handler(&self, element: ElementId, ty: EventType) -> bool {
        self.get(element)
            .map(|e| e.handlers.get(ty).is_some())
            .unwrap_or(false)
    }
}
