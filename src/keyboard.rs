//! Key codes and decoding of raw key samples

use crate::events::EventType;

/// Keys the core distinguishes.
///
/// Keys that produce text are reported as `Normal` together with their
/// character. Platform bindings map their native key symbols onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyCode {
    #[default]
    Unknown,
    /// A key that produced a character
    Normal,

    LeftShift,
    LeftCtrl,
    LeftSuper,
    LeftAlt,
    RightShift,
    RightCtrl,
    RightSuper,
    RightAlt,

    Menu,
    Escape,
    Backspace,
    Return,
    Tab,
    CapsLock,

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    PrintScreen,
    ScrollLock,
    Pause,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    Up,
    Left,
    Down,
    Right,

    NumLock,
    /// Numpad key that produced a character (operators, digits)
    Numpad,
    NumpadEnter,
}

impl KeyCode {
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            KeyCode::LeftShift
                | KeyCode::LeftCtrl
                | KeyCode::LeftSuper
                | KeyCode::LeftAlt
                | KeyCode::RightShift
                | KeyCode::RightCtrl
                | KeyCode::RightSuper
                | KeyCode::RightAlt
        )
    }
}

/// Direction of a key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

impl KeyState {
    pub fn event_type(self) -> EventType {
        match self {
            KeyState::Pressed => EventType::KEY_PRESS,
            KeyState::Released => EventType::KEY_RELEASE,
        }
    }
}

/// Normalise a raw key sample.
///
/// An unknown code that still produced a character is a `Normal` key.
/// A sample with neither is dropped.
pub fn decode(code: KeyCode, character: Option<char>) -> Option<(KeyCode, Option<char>)> {
    match (code, character) {
        (KeyCode::Unknown, None) | (KeyCode::Unknown, Some('\0')) => None,
        (KeyCode::Unknown, Some(c)) => Some((KeyCode::Normal, Some(c))),
        (code, character) => Some((code, character)),
    }
}
