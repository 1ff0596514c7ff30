//! Translation of winit window events into raw input

use winit::event::{ElementState, MouseButton as WinitButton, WindowEvent};
use winit::keyboard::{Key, KeyLocation, NamedKey};

use crate::geometry::Point;
use crate::keyboard::{KeyCode, KeyState};
use crate::platform::RawInput;
use crate::window::Visibility;

/// Stateful translator; winit reports button transitions without a position
#[derive(Debug, Default)]
pub struct WinitTranslator {
    cursor: Point,
}

impl WinitTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<RawInput> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point::new(position.x as f32, position.y as f32);
                Some(RawInput::MouseMotion { position: self.cursor })
            }
            WindowEvent::CursorEntered { .. } => Some(RawInput::MouseEnter { position: self.cursor }),
            WindowEvent::CursorLeft { .. } => Some(RawInput::MouseLeave { position: self.cursor }),
            WindowEvent::MouseInput { state, button, .. } => {
                let button = button_number(*button)?;
                Some(match state {
                    ElementState::Pressed => RawInput::MousePress { button, position: self.cursor },
                    ElementState::Released => RawInput::MouseRelease { button, position: self.cursor },
                })
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let state = match event.state {
                    ElementState::Pressed => KeyState::Pressed,
                    ElementState::Released => KeyState::Released,
                };
                let character = event.text.as_ref().and_then(|text| text.chars().next());
                let code = match &event.logical_key {
                    Key::Named(named) => named_key(*named, event.location),
                    _ => KeyCode::Unknown,
                };
                Some(RawInput::Key { state, code, character })
            }
            WindowEvent::Resized(size) => Some(RawInput::Resize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::Occluded(true) => Some(RawInput::Visibility(Visibility::FullyObscured)),
            WindowEvent::Occluded(false) => Some(RawInput::Visibility(Visibility::Unobscured)),
            WindowEvent::CloseRequested => Some(RawInput::CloseRequested),
            WindowEvent::Destroyed => Some(RawInput::Destroyed),
            _ => None,
        }
    }
}

/// Platform number of a tracked button; extra buttons are not tracked
fn button_number(button: WinitButton) -> Option<u32> {
    match button {
        WinitButton::Left => Some(1),
        WinitButton::Middle => Some(2),
        WinitButton::Right => Some(3),
        _ => None,
    }
}

fn named_key(key: NamedKey, location: KeyLocation) -> KeyCode {
    let right = location == KeyLocation::Right;

    match key {
        NamedKey::Shift if right => KeyCode::RightShift,
        NamedKey::Shift => KeyCode::LeftShift,
        NamedKey::Control if right => KeyCode::RightCtrl,
        NamedKey::Control => KeyCode::LeftCtrl,
        NamedKey::Super if right => KeyCode::RightSuper,
        NamedKey::Super => KeyCode::LeftSuper,
        NamedKey::Alt if right => KeyCode::RightAlt,
        NamedKey::Alt => KeyCode::LeftAlt,

        NamedKey::ContextMenu => KeyCode::Menu,
        NamedKey::Escape => KeyCode::Escape,
        NamedKey::Backspace => KeyCode::Backspace,
        NamedKey::Enter if location == KeyLocation::Numpad => KeyCode::NumpadEnter,
        NamedKey::Enter => KeyCode::Return,
        NamedKey::Tab => KeyCode::Tab,
        NamedKey::CapsLock => KeyCode::CapsLock,

        NamedKey::F1 => KeyCode::F1,
        NamedKey::F2 => KeyCode::F2,
        NamedKey::F3 => KeyCode::F3,
        NamedKey::F4 => KeyCode::F4,
        NamedKey::F5 => KeyCode::F5,
        NamedKey::F6 => KeyCode::F6,
        NamedKey::F7 => KeyCode::F7,
        NamedKey::F8 => KeyCode::F8,
        NamedKey::F9 => KeyCode::F9,
        NamedKey::F10 => KeyCode::F10,
        NamedKey::F11 => KeyCode::F11,
        NamedKey::F12 => KeyCode::F12,

        NamedKey::PrintScreen => KeyCode::PrintScreen,
        NamedKey::ScrollLock => KeyCode::ScrollLock,
        NamedKey::Pause => KeyCode::Pause,

        NamedKey::Insert => KeyCode::Insert,
        NamedKey::Delete => KeyCode::Delete,
        NamedKey::Home => KeyCode::Home,
        NamedKey::End => KeyCode::End,
        NamedKey::PageUp => KeyCode::PageUp,
        NamedKey::PageDown => KeyCode::PageDown,

        NamedKey::ArrowUp => KeyCode::Up,
        NamedKey::ArrowLeft => KeyCode::Left,
        NamedKey::ArrowDown => KeyCode::Down,
        NamedKey::ArrowRight => KeyCode::Right,

        NamedKey::NumLock => KeyCode::NumLock,

        _ => KeyCode::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_window_events() {
        let mut translator = WinitTranslator::new();

        assert_eq!(
            translator.translate(&WindowEvent::Resized(PhysicalSize::new(640, 480))),
            Some(RawInput::Resize { width: 640, height: 480 })
        );
        assert_eq!(
            translator.translate(&WindowEvent::Occluded(true)),
            Some(RawInput::Visibility(Visibility::FullyObscured))
        );
        assert_eq!(
            translator.translate(&WindowEvent::CloseRequested),
            Some(RawInput::CloseRequested)
        );
        assert_eq!(translator.translate(&WindowEvent::Focused(true)), None);
    }

    #[test]
    fn test_button_numbers() {
        assert_eq!(button_number(WinitButton::Left), Some(1));
        assert_eq!(button_number(WinitButton::Middle), Some(2));
        assert_eq!(button_number(WinitButton::Right), Some(3));
        assert_eq!(button_number(WinitButton::Back), None);
        // Extra button codes never alias the tracked buttons
        for n in 0..=3 {
            assert_eq!(button_number(WinitButton::Other(n)), None);
        }
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(named_key(NamedKey::Shift, KeyLocation::Right), KeyCode::RightShift);
        assert_eq!(named_key(NamedKey::Enter, KeyLocation::Numpad), KeyCode::NumpadEnter);
        assert_eq!(named_key(NamedKey::Enter, KeyLocation::Standard), KeyCode::Return);
        assert_eq!(named_key(NamedKey::Space, KeyLocation::Standard), KeyCode::Unknown);
    }
}
