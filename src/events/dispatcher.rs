//! Tree routing of events
//!
//! [`ElementTree::handle`] runs the handler of exactly one element.
//! [`ElementTree::dispatch_raw`] walks a path through the tree in one of two
//! directions and stops at the first element whose handler consumes the
//! event.

use crate::element::{ElementId, ElementTree};
use crate::events::{Event, EventType};

/// What a handler did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Seen but not consumed; directional dispatch keeps walking
    Ignored,
    /// Consumed; directional dispatch stops here
    Consumed,
}

impl EventResult {
    /// Whether directional dispatch should stop here
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

impl From<bool> for EventResult {
    fn from(consumed: bool) -> Self {
        if consumed {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }
}

/// Traversal direction for [`ElementTree::dispatch_raw`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// From the root down to the target (capture / broadcast)
    Leafward,
    /// From the target up to the root (bubbling)
    Rootward,
}

impl ElementTree {
    /// Invoke the handler registered on `target` for the event's type.
    ///
    /// Returns `None` when `target` has no such handler.
    pub fn handle(&mut self, target: ElementId, event: &Event) -> Option<EventResult> {
        // Clone the handler out so it can borrow the tree mutably
        let handler = self.lookup_handler(target, event.ty)?;
        let result = handler(self, target, event);

        log::trace!("{} handled {} -> {:?}", target, event.ty, result);
        Some(result)
    }

    /// Route `event` along `direction` and return the element that consumed it.
    pub fn dispatch_raw(
        &mut self,
        target: ElementId,
        event: &Event,
        direction: Direction,
    ) -> Option<ElementId> {
        match direction {
            Direction::Rootward => self.dispatch_rootward(target, event),
            Direction::Leafward => self.dispatch_leafward(target, event),
        }
    }

    /// Rootward dispatch of a payload-free event of type `ty`
    pub fn dispatch_simple(&mut self, target: ElementId, ty: EventType) -> Option<ElementId> {
        self.dispatch_raw(target, &Event::new(ty), Direction::Rootward)
    }

    fn dispatch_rootward(&mut self, target: ElementId, event: &Event) -> Option<ElementId> {
        let mut current = self.contains(target).then_some(target);

        while let Some(id) = current {
            if self.handle(id, event).is_some_and(EventResult::is_consumed) {
                return Some(id);
            }

            if !self.contains(id) {
                log::warn!("{} removed itself while handling {}", id, event.ty);
                return None;
            }
            current = self.parent(id);
        }

        None
    }

    fn dispatch_leafward(&mut self, target: ElementId, event: &Event) -> Option<ElementId> {
        // The path is fixed up front; elements destroyed by an earlier
        // handler are skipped.
        for id in self.path_from_root(target) {
            if !self.contains(id) {
                continue;
            }
            if self.handle(id, event).is_some_and(EventResult::is_consumed) {
                return Some(id);
            }
        }

        None
    }
}
