//! Pointer state machine
//!
//! Turns raw button and motion samples into mouse and drag events. Each of
//! the three tracked buttons runs its own `Up -> Down -> Drag -> Up` machine.
//! While any button is held the pointer is implicitly captured: hit testing
//! is suspended and every event for that button goes to the element that was
//! under the cursor when it went down.

use crate::config::PointerConfig;
use crate::element::{ElementId, ElementTree};
use crate::events::{
    Direction, DragEvent, Event, EventType, HitTest, MouseButton, MouseEvent, Payload,
};
use crate::geometry::Point;

/// Distance in pixels the pointer must travel with a button down before a
/// press turns into a drag
pub const DRAG_THRESHOLD: f32 = 4.0;

/// State of a single button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Up,
    Down,
    Drag,
}

/// Per-button bookkeeping
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonSlot {
    /// Element under the cursor when the button went down
    pub target: Option<ElementId>,
    /// Press origin
    pub drag_start: Point,
    /// Position of the previous drag sample
    pub drag_last: Point,
    pub state: ButtonState,
}

/// Everything the state machine needs to resolve and deliver events
pub struct Scene<'a> {
    pub tree: &'a mut ElementTree,
    /// Root element of the window
    pub window: ElementId,
    pub hit_tester: &'a mut dyn HitTest,
}

impl Scene<'_> {
    fn hit_test(&mut self, point: Point) -> Option<ElementId> {
        self.hit_tester.hit_test(self.tree, self.window, point)
    }

    fn mouse_event(&self, target: ElementId, cursor: Point, button: Option<MouseButton>) -> MouseEvent {
        MouseEvent {
            window: self.window,
            target,
            cursor,
            button,
        }
    }

    fn send(&mut self, target: ElementId, event: Event) {
        self.tree.dispatch_raw(target, &event, Direction::Rootward);
    }
}

/// Pointer state for one window
#[derive(Debug, Clone)]
pub struct Pointer {
    cursor: Point,
    underneath: Option<ElementId>,
    in_window: bool,
    buttons: [ButtonSlot; 3],
    drag_threshold: f32,
}

impl Default for Pointer {
    fn default() -> Self {
        Self::new(&PointerConfig::default())
    }
}

impl Pointer {
    pub fn new(config: &PointerConfig) -> Self {
        Self {
            cursor: Point::zero(),
            underneath: None,
            in_window: false,
            buttons: [ButtonSlot::default(); 3],
            drag_threshold: config.drag_threshold,
        }
    }

    /// Last reported cursor position
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Element the cursor was last found over
    pub fn underneath(&self) -> Option<ElementId> {
        self.underneath
    }

    /// Whether the cursor is inside the window
    pub fn in_window(&self) -> bool {
        self.in_window
    }

    /// Bookkeeping for one button
    pub fn button(&self, button: MouseButton) -> &ButtonSlot {
        &self.buttons[button.index()]
    }

    /// Bitmask of held buttons, see [`MouseButton::mask`]
    pub fn buttons_down(&self) -> u8 {
        MouseButton::ALL
            .iter()
            .filter(|b| self.button(**b).state != ButtonState::Up)
            .fold(0, |mask, b| mask | b.mask())
    }

    pub fn any_button_held(&self) -> bool {
        self.buttons_down() != 0
    }

    /// Forget an element that is about to disappear from the tree
    pub fn forget(&mut self, tree: &ElementTree, removed: ElementId) {
        if self
            .underneath
            .is_some_and(|id| tree.is_ancestor(removed, id))
        {
            self.underneath = None;
        }
        for slot in &mut self.buttons {
            if slot.target.is_some_and(|id| tree.is_ancestor(removed, id)) {
                slot.target = None;
            }
        }
    }

    /// The cursor entered the window
    pub fn enter_window(&mut self, scene: &mut Scene<'_>, position: Point) {
        self.in_window = true;
        self.motion(scene, position);
    }

    /// The cursor left the window
    pub fn leave_window(&mut self, scene: &mut Scene<'_>, position: Point) {
        self.cursor = position;
        self.in_window = false;

        if !self.any_button_held() {
            self.set_underneath(scene, None);
        }
    }

    /// A button went down
    pub fn press(&mut self, scene: &mut Scene<'_>, button: MouseButton, position: Point) {
        self.cursor = position;
        self.in_window = true;

        if self.button(button).state != ButtonState::Up {
            return;
        }

        if !self.any_button_held() {
            let hit = scene.hit_test(position);
            self.set_underneath(scene, hit);
        }

        let target = self.underneath.unwrap_or(scene.window);
        self.buttons[button.index()] = ButtonSlot {
            target: Some(target),
            drag_start: position,
            drag_last: position,
            state: ButtonState::Down,
        };

        log::debug!("{:?} down on {} at {:?}", button, target, position);

        let mouse = scene.mouse_event(target, position, Some(button));
        scene.send(target, Event::with_payload(EventType::MOUSE_DOWN, Payload::Mouse(mouse)));
    }

    /// The cursor moved
    pub fn motion(&mut self, scene: &mut Scene<'_>, position: Point) {
        self.cursor = position;

        if !self.any_button_held() {
            // Unheld motion is only reported while inside the window
            self.in_window = true;
            let hit = scene.hit_test(position);
            self.set_underneath(scene, hit);
            return;
        }

        for button in MouseButton::ALL {
            match self.button(button).state {
                ButtonState::Up => {}
                ButtonState::Down => {
                    let slot = self.buttons[button.index()];
                    if position.distance(slot.drag_start) > self.drag_threshold {
                        self.start_drag(scene, button);
                        // Delta runs from the previous sample, not the press origin
                        self.drag_motion(scene, button, position);
                    } else {
                        self.buttons[button.index()].drag_last = position;
                    }
                }
                ButtonState::Drag => self.drag_motion(scene, button, position),
            }
        }
    }

    /// A button went up
    pub fn release(&mut self, scene: &mut Scene<'_>, button: MouseButton, position: Point) {
        self.cursor = position;

        let slot = self.buttons[button.index()];
        self.buttons[button.index()] = ButtonSlot::default();

        let target = match (slot.state, slot.target) {
            (ButtonState::Up, _) => return,
            (_, Some(target)) => target,
            // Target was destroyed while the button was held
            (_, None) => {
                log::debug!("{:?} released with no live target", button);
                self.rehover(scene);
                return;
            }
        };

        let mouse = scene.mouse_event(target, position, Some(button));
        scene.send(target, Event::with_payload(EventType::MOUSE_UP, Payload::Mouse(mouse)));

        match slot.state {
            ButtonState::Down => {
                log::debug!("{:?} click on {}", button, target);
                scene.send(target, Event::with_payload(EventType::MOUSE_CLICK, Payload::Mouse(mouse)));
            }
            ButtonState::Drag => {
                log::debug!("{:?} drag dropped from {}", button, target);
                let drag = DragEvent {
                    mouse,
                    start: slot.drag_start,
                    delta: position - slot.drag_last,
                };
                scene.send(target, Event::with_payload(EventType::DRAG_DROP, Payload::Drag(drag)));
            }
            ButtonState::Up => {}
        }

        self.rehover(scene);
    }

    fn rehover(&mut self, scene: &mut Scene<'_>) {
        if self.any_button_held() {
            return;
        }

        if self.in_window {
            let hit = scene.hit_test(self.cursor);
            self.set_underneath(scene, hit);
        } else {
            self.set_underneath(scene, None);
        }
    }

    fn start_drag(&mut self, scene: &mut Scene<'_>, button: MouseButton) {
        let slot = &mut self.buttons[button.index()];
        slot.state = ButtonState::Drag;

        let Some(target) = slot.target else {
            return;
        };
        let start = slot.drag_start;

        log::debug!("{:?} drag start on {} from {:?}", button, target, start);

        let drag = DragEvent {
            mouse: scene.mouse_event(target, start, Some(button)),
            start,
            delta: Point::zero(),
        };
        scene.send(
            target,
            Event::with_payload(EventType::DRAG_START, Payload::Drag(drag)).synthetic(),
        );
    }

    fn drag_motion(&mut self, scene: &mut Scene<'_>, button: MouseButton, position: Point) {
        let slot = &mut self.buttons[button.index()];
        let delta = position - slot.drag_last;
        slot.drag_last = position;

        let Some(target) = slot.target else {
            return;
        };
        let start = slot.drag_start;

        let drag = DragEvent {
            mouse: scene.mouse_event(target, position, Some(button)),
            start,
            delta,
        };
        scene.send(target, Event::with_payload(EventType::DRAG_MOTION, Payload::Drag(drag)));
    }

    fn set_underneath(&mut self, scene: &mut Scene<'_>, element: Option<ElementId>) {
        if element == self.underneath {
            return;
        }

        let previous = std::mem::replace(&mut self.underneath, element);
        log::debug!("pointer moved from {:?} to {:?}", previous, element);

        if let Some(old) = previous {
            let mouse = scene.mouse_event(old, self.cursor, None);
            scene.send(old, Event::with_payload(EventType::MOUSE_LEAVE, Payload::Mouse(mouse)));
        }
        if let Some(new) = element {
            let mouse = scene.mouse_event(new, self.cursor, None);
            scene.send(new, Event::with_payload(EventType::MOUSE_ENTER, Payload::Mouse(mouse)));
        }
    }
}
