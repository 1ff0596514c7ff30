//! Event record and the event type space

use std::fmt;

use crate::element::ElementId;
use crate::geometry::Point;
use crate::keyboard::KeyCode;

/// Numeric event type tag.
///
/// The most significant bit marks types reserved by the core. Applications
/// define their own types with [`EventType::custom`], which can never collide
/// with a reserved one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(u32);

impl EventType {
    /// Bit that distinguishes system types from application types
    pub const SYSTEM_MASK: u32 = 1 << (u32::BITS - 1);

    /// Dispatched when the window should close. A consuming handler keeps it open.
    pub const WINDOW_SHOULD_CLOSE: EventType = EventType::system(0);
    /// Dispatched once closing is decided; handlers cannot veto it.
    pub const WINDOW_WILL_CLOSE: EventType = EventType::system(1);
    /// Dispatched while the window tears down.
    pub const WINDOW_CLOSING: EventType = EventType::system(2);
    /// Dispatched before any drawing happens in a frame.
    pub const FRAME_START: EventType = EventType::system(3);
    /// Dispatched after all drawing in a frame has occurred.
    pub const FRAME_END: EventType = EventType::system(4);
    pub const FOCUS: EventType = EventType::system(5);
    pub const UNFOCUS: EventType = EventType::system(6);
    pub const KEY_PRESS: EventType = EventType::system(7);
    pub const KEY_RELEASE: EventType = EventType::system(8);
    pub const MOUSE_ENTER: EventType = EventType::system(9);
    pub const MOUSE_LEAVE: EventType = EventType::system(10);
    pub const MOUSE_DOWN: EventType = EventType::system(11);
    pub const MOUSE_UP: EventType = EventType::system(12);
    pub const MOUSE_CLICK: EventType = EventType::system(13);
    pub const MOUSE_WHEEL: EventType = EventType::system(14);
    pub const DRAG_START: EventType = EventType::system(15);
    pub const DRAG_MOTION: EventType = EventType::system(16);
    pub const DRAG_ENTER: EventType = EventType::system(17);
    pub const DRAG_LEAVE: EventType = EventType::system(18);
    pub const DRAG_DROP: EventType = EventType::system(19);

    const fn system(n: u32) -> EventType {
        EventType(n | Self::SYSTEM_MASK)
    }

    /// An application-defined event type. The system bit is cleared.
    pub const fn custom(n: u32) -> EventType {
        EventType(n & !Self::SYSTEM_MASK)
    }

    /// Build a type from its raw value, system bit included
    pub const fn from_raw(raw: u32) -> EventType {
        EventType(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_system(self) -> bool {
        self.0 & Self::SYSTEM_MASK != 0
    }

    /// Human readable name, used in log output
    pub fn name(self) -> &'static str {
        if !self.is_system() {
            return "custom";
        }

        match self.0 & !Self::SYSTEM_MASK {
            0 => "window-should-close",
            1 => "window-will-close",
            2 => "window-closing",
            3 => "frame-start",
            4 => "frame-end",
            5 => "focus",
            6 => "unfocus",
            7 => "key-press",
            8 => "key-release",
            9 => "mouse-enter",
            10 => "mouse-leave",
            11 => "mouse-down",
            12 => "mouse-up",
            13 => "mouse-click",
            14 => "mouse-wheel",
            15 => "drag-start",
            16 => "drag-motion",
            17 => "drag-enter",
            18 => "drag-leave",
            19 => "drag-drop",
            _ => "system-unknown",
        }
    }
}

impl fmt::Debug for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_system() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "custom({})", self.0)
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Where an event came from.
///
/// A click produced by a real button release is `Genuine`. A click promoted
/// from a key press on a focused button would be `Synthetic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventSource {
    #[default]
    Genuine,
    Synthetic,
}

/// Pointer buttons tracked by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Button1 = 0,
    Button2 = 1,
    Button3 = 2,
}

impl MouseButton {
    pub const ALL: [MouseButton; 3] = [
        MouseButton::Button1,
        MouseButton::Button2,
        MouseButton::Button3,
    ];

    /// Map a platform button number (1-based) to a tracked button
    pub fn from_platform(number: u32) -> Option<MouseButton> {
        match number {
            1 => Some(MouseButton::Button1),
            2 => Some(MouseButton::Button2),
            3 => Some(MouseButton::Button3),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

/// Payload of mouse events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    /// Root element of the window the event belongs to
    pub window: ElementId,
    /// Element the event was aimed at before any bubbling
    pub target: ElementId,
    pub cursor: Point,
    /// `None` for enter/leave, which are not tied to a button
    pub button: Option<MouseButton>,
}

/// Payload of drag events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent {
    pub mouse: MouseEvent,
    /// Where the button went down
    pub start: Point,
    /// Motion since the previous drag sample
    pub delta: Point,
}

/// Payload of key events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub window: ElementId,
    pub code: KeyCode,
    /// Decoded character, if the key produces one
    pub character: Option<char>,
}

/// Window-level notifications
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Close { window: ElementId },
}

/// Type specific payload carried by an [`Event`]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    #[default]
    None,
    Mouse(MouseEvent),
    Drag(DragEvent),
    Key(KeyEvent),
    Window(WindowEvent),
}

/// An event instance.
///
/// Events are built by the core (or by application code) right before a
/// dispatch and only live for that call. Element ids in the payload may be
/// stale once a handler has mutated the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub ty: EventType,
    pub source: EventSource,
    pub payload: Payload,
}

impl Event {
    /// A genuine event of the given type with no payload
    pub fn new(ty: EventType) -> Self {
        Self {
            ty,
            source: EventSource::Genuine,
            payload: Payload::None,
        }
    }

    pub fn with_payload(ty: EventType, payload: Payload) -> Self {
        Self {
            ty,
            source: EventSource::Genuine,
            payload,
        }
    }

    pub fn synthetic(mut self) -> Self {
        self.source = EventSource::Synthetic;
        self
    }

    /// Mouse fields, for both mouse and drag payloads
    pub fn mouse(&self) -> Option<&MouseEvent> {
        match &self.payload {
            Payload::Mouse(mouse) => Some(mouse),
            Payload::Drag(drag) => Some(&drag.mouse),
            _ => None,
        }
    }

    pub fn drag(&self) -> Option<&DragEvent> {
        match &self.payload {
            Payload::Drag(drag) => Some(drag),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&KeyEvent> {
        match &self.payload {
            Payload::Key(key) => Some(key),
            _ => None,
        }
    }

    pub fn window(&self) -> Option<&WindowEvent> {
        match &self.payload {
            Payload::Window(window) => Some(window),
            _ => None,
        }
    }
}
