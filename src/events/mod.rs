//! Event system for the Orbit input core
//!
//! The event system provides:
//! - A tagged event record with reserved system types and application types
//! - Per-element handler registration, one callback per event type
//! - Direct handling and directional (rootward / leafward) dispatch
//! - The hit testing seam used to find the element under the pointer

pub mod dispatcher;
pub mod event;
pub mod hit_testing;
pub mod registry;

pub use dispatcher::{Direction, EventResult};
pub use event::{
    DragEvent, Event, EventSource, EventType, KeyEvent, MouseButton, MouseEvent, Payload,
    WindowEvent,
};
pub use hit_testing::{BoundsHitTester, HitTest};
pub use registry::{Handler, HandlerMap};
