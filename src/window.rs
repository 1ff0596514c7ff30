//! Windows: the root of an element tree and the entry point for raw input
//!
//! The platform binding calls one of the `mouse_*`, [`Window::key`],
//! [`Window::resize`], [`Window::set_visibility`] or
//! [`Window::request_close`] entry points per decoded sample, or hands the
//! sample to [`Window::inject`]. Everything those calls dispatch has been
//! fully handled by the time they return.

use std::fmt;

use crate::config::Config;
use crate::element::{ElementId, ElementTree, TreeError, TreeResult};
use crate::events::{
    BoundsHitTester, Direction, Event, EventType, HitTest, KeyEvent, MouseButton, Payload,
    WindowEvent,
};
use crate::geometry::{Point, Rect};
use crate::keyboard::{self, KeyCode, KeyState};
use crate::platform::RawInput;
use crate::pointer::{Pointer, Scene};
use crate::renderer::Renderer;

/// How much of the window is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Unobscured,
    PartiallyObscured,
    FullyObscured,
}

/// Outcome of feeding one raw sample to a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drain {
    /// Keep draining
    Continue,
    /// The window agreed to close
    Closed,
    /// The native window disappeared
    Destroyed,
}

impl Drain {
    pub fn is_fatal(self) -> bool {
        self != Drain::Continue
    }
}

/// A top-level window and its element tree
pub struct Window {
    title: String,
    tree: ElementTree,
    root: ElementId,
    pointer: Pointer,
    hit_tester: Box<dyn HitTest + Send>,
    focus: Option<ElementId>,
    visibility: Visibility,
    width: u32,
    height: u32,
    need_reconfigure: bool,
    closed: bool,
}

impl Window {
    /// Create a window with the default configuration
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self::with_config(title, width, height, &Config::default())
    }

    pub fn with_config(title: impl Into<String>, width: u32, height: u32, config: &Config) -> Self {
        let mut tree = ElementTree::new();
        let root = tree.create_with_bounds("window", Rect::new(0.0, 0.0, width as f32, height as f32));

        Self {
            title: title.into(),
            tree,
            root,
            pointer: Pointer::new(&config.pointer),
            hit_tester: Box::new(BoundsHitTester::new()),
            focus: None,
            visibility: Visibility::default(),
            width,
            height,
            need_reconfigure: false,
            closed: false,
        }
    }

    /// Replace the hit tester used for enter/leave and press targets
    pub fn set_hit_tester(&mut self, hit_tester: impl HitTest + Send + 'static) {
        self.hit_tester = Box::new(hit_tester);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Root element; handlers on it see every bubbling event
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn focus(&self) -> Option<ElementId> {
        self.focus
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Whether drawing would be seen at all
    pub fn is_visible(&self) -> bool {
        self.visibility != Visibility::FullyObscured
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Create an element and append it under `parent`
    pub fn add_element(&mut self, parent: ElementId, kind: &str, bounds: Rect) -> TreeResult<ElementId> {
        if !self.tree.contains(parent) {
            return Err(TreeError::ElementNotFound(parent));
        }

        let id = self.tree.create_with_bounds(kind, bounds);
        self.tree.add_child(parent, id)?;
        Ok(id)
    }

    /// Destroy an element and its subtree, dropping any pointer or focus
    /// reference into it
    pub fn remove_element(&mut self, id: ElementId) -> TreeResult<()> {
        if id == self.root {
            return Err(TreeError::InvalidRelationship(
                "the window root is only removed by teardown".to_string(),
            ));
        }
        if !self.tree.contains(id) {
            return Err(TreeError::ElementNotFound(id));
        }

        self.pointer.forget(&self.tree, id);
        if self.focus.is_some_and(|f| self.tree.is_ancestor(id, f)) {
            self.focus = None;
        }

        self.tree.remove(id)
    }

    fn with_pointer<R>(&mut self, f: impl FnOnce(&mut Pointer, &mut Scene<'_>) -> R) -> R {
        let Window {
            tree,
            root,
            pointer,
            hit_tester,
            ..
        } = self;

        let mut scene = Scene {
            tree,
            window: *root,
            hit_tester: &mut **hit_tester,
        };
        f(pointer, &mut scene)
    }

    pub fn mouse_enter(&mut self, position: Point) {
        self.with_pointer(|pointer, scene| pointer.enter_window(scene, position));
    }

    pub fn mouse_leave(&mut self, position: Point) {
        self.with_pointer(|pointer, scene| pointer.leave_window(scene, position));
    }

    /// Button press; `button` is the platform's 1-based number.
    /// Buttons beyond the three tracked ones are ignored.
    pub fn mouse_press(&mut self, button: u32, position: Point) {
        match MouseButton::from_platform(button) {
            Some(button) => self.with_pointer(|pointer, scene| pointer.press(scene, button, position)),
            None => log::trace!("ignoring press of untracked button {}", button),
        }
    }

    pub fn mouse_release(&mut self, button: u32, position: Point) {
        match MouseButton::from_platform(button) {
            Some(button) => self.with_pointer(|pointer, scene| pointer.release(scene, button, position)),
            None => log::trace!("ignoring release of untracked button {}", button),
        }
    }

    pub fn mouse_motion(&mut self, position: Point) {
        self.with_pointer(|pointer, scene| pointer.motion(scene, position));
    }

    /// Key transition, delivered rootward from the focused element
    pub fn key(&mut self, state: KeyState, code: KeyCode, character: Option<char>) {
        let Some((code, character)) = keyboard::decode(code, character) else {
            log::trace!("ignoring undecodable key sample");
            return;
        };

        let target = self
            .focus
            .filter(|f| self.tree.contains(*f))
            .unwrap_or(self.root);

        let event = Event::with_payload(
            state.event_type(),
            Payload::Key(KeyEvent {
                window: self.root,
                code,
                character,
            }),
        );
        self.tree.dispatch_raw(target, &event, Direction::Rootward);
    }

    /// Move keyboard focus, notifying the old and new element
    pub fn set_focus(&mut self, element: Option<ElementId>) {
        let element = element.filter(|e| self.tree.contains(*e));
        if element == self.focus {
            return;
        }

        let previous = std::mem::replace(&mut self.focus, element);
        log::debug!("focus moved from {:?} to {:?}", previous, element);

        if let Some(old) = previous {
            self.tree.dispatch_simple(old, EventType::UNFOCUS);
        }
        if let Some(new) = element {
            self.tree.dispatch_simple(new, EventType::FOCUS);
        }
    }

    /// Record a new window size; the root is resized by [`Window::reconfigure`]
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.need_reconfigure = true;
        }
    }

    /// Apply a pending resize. Returns whether anything changed.
    pub fn reconfigure(&mut self) -> bool {
        if !self.need_reconfigure {
            return false;
        }
        self.need_reconfigure = false;

        log::debug!("reconfiguring '{}' to {}x{}", self.title, self.width, self.height);

        let bounds = Rect::new(0.0, 0.0, self.width as f32, self.height as f32);
        if let Err(e) = self.tree.set_bounds(self.root, bounds) {
            log::warn!("cannot resize window root: {}", e);
        }
        true
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    /// Ask the window to close.
    ///
    /// A handler consuming `WINDOW_SHOULD_CLOSE` keeps the window open.
    /// Returns whether the window is now closed.
    pub fn request_close(&mut self) -> bool {
        if self.closed {
            return true;
        }

        let payload = Payload::Window(WindowEvent::Close { window: self.root });
        let should_close = Event::with_payload(EventType::WINDOW_SHOULD_CLOSE, payload.clone());
        if self
            .tree
            .dispatch_raw(self.root, &should_close, Direction::Rootward)
            .is_some()
        {
            log::debug!("close of '{}' vetoed", self.title);
            return false;
        }

        let will_close = Event::with_payload(EventType::WINDOW_WILL_CLOSE, payload);
        self.tree.dispatch_raw(self.root, &will_close, Direction::Rootward);
        self.closed = true;
        true
    }

    /// Feed one raw sample through the input pipeline
    pub fn inject(&mut self, input: RawInput) -> Drain {
        match input {
            RawInput::MouseEnter { position } => self.mouse_enter(position),
            RawInput::MouseLeave { position } => self.mouse_leave(position),
            RawInput::MousePress { button, position } => self.mouse_press(button, position),
            RawInput::MouseRelease { button, position } => self.mouse_release(button, position),
            RawInput::MouseMotion { position } => self.mouse_motion(position),
            RawInput::Key {
                state,
                code,
                character,
            } => self.key(state, code, character),
            RawInput::Resize { width, height } => self.resize(width, height),
            RawInput::Visibility(visibility) => self.set_visibility(visibility),
            RawInput::CloseRequested => {
                self.request_close();
            }
            RawInput::Destroyed => return Drain::Destroyed,
        }

        if self.closed {
            Drain::Closed
        } else {
            Drain::Continue
        }
    }

    /// Draw one frame, bracketed by frame-start and frame-end notifications
    pub fn draw(&mut self, renderer: &mut dyn Renderer) -> Result<(), crate::Error> {
        self.tree
            .dispatch_raw(self.root, &Event::new(EventType::FRAME_START), Direction::Leafward);

        let result = renderer.draw(self);

        self.tree
            .dispatch_raw(self.root, &Event::new(EventType::FRAME_END), Direction::Leafward);

        result
    }

    /// Tear the window down: dispatch `WINDOW_CLOSING`, then destroy the tree
    pub fn teardown(&mut self) {
        if !self.tree.contains(self.root) {
            return;
        }

        log::info!("tearing down window '{}'", self.title);

        self.tree.dispatch_simple(self.root, EventType::WINDOW_CLOSING);

        self.pointer.forget(&self.tree, self.root);
        self.focus = None;
        self.closed = true;

        if let Err(e) = self.tree.remove(self.root) {
            log::warn!("window root vanished during teardown: {}", e);
        }
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.title)
            .field("root", &self.root)
            .field("size", &(self.width, self.height))
            .field("visibility", &self.visibility)
            .field("focus", &self.focus)
            .field("closed", &self.closed)
            .field("elements", &self.tree.len())
            .finish()
    }
}
