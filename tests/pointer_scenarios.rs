// Pointer gestures driven through a window

use std::sync::{Arc, Mutex};

use orbit_input::events::DragEvent;
use orbit_input::pointer::ButtonState;
use orbit_input::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Seen {
    ty: EventType,
    element: ElementId,
    source: EventSource,
    drag: Option<DragEvent>,
}

type Log = Arc<Mutex<Vec<Seen>>>;

const POINTER_TYPES: [EventType; 8] = [
    EventType::MOUSE_ENTER,
    EventType::MOUSE_LEAVE,
    EventType::MOUSE_DOWN,
    EventType::MOUSE_UP,
    EventType::MOUSE_CLICK,
    EventType::DRAG_START,
    EventType::DRAG_MOTION,
    EventType::DRAG_DROP,
];

/// A 200x100 window split into two 100x100 halves
struct Scenario {
    window: Window,
    a: ElementId,
    b: ElementId,
    log: Log,
}

impl Scenario {
    fn new() -> Self {
        let mut window = Window::new("scenario", 200, 100);
        let root = window.root();
        let a = window
            .add_element(root, "a", Rect::new(0.0, 0.0, 100.0, 100.0))
            .unwrap();
        let b = window
            .add_element(root, "b", Rect::new(100.0, 0.0, 100.0, 100.0))
            .unwrap();

        let log: Log = Arc::default();
        for id in [a, b] {
            for ty in POINTER_TYPES {
                let log = log.clone();
                window
                    .tree_mut()
                    .register_handler(id, ty, move |_, me, event| {
                        log.lock().unwrap().push(Seen {
                            ty: event.ty,
                            element: me,
                            source: event.source,
                            drag: event.drag().copied(),
                        });
                        EventResult::Consumed
                    })
                    .unwrap();
            }
        }

        Self { window, a, b, log }
    }

    fn take(&self) -> Vec<Seen> {
        std::mem::take(&mut *self.log.lock().unwrap())
    }

    fn types(&self) -> Vec<(EventType, ElementId)> {
        self.take().into_iter().map(|s| (s.ty, s.element)).collect()
    }
}

#[test]
fn press_move_release_becomes_drag() {
    let mut s = Scenario::new();

    s.window.mouse_press(1, Point::new(10.0, 10.0));
    s.take();

    // Below the threshold
    s.window.mouse_motion(Point::new(11.0, 10.0));
    assert!(s.take().is_empty());

    s.window.mouse_motion(Point::new(20.0, 10.0));
    let events = s.take();
    assert_eq!(events.len(), 2);

    let start = &events[0];
    assert_eq!(start.ty, EventType::DRAG_START);
    assert_eq!(start.element, s.a);
    assert_eq!(start.source, EventSource::Synthetic);
    let drag = start.drag.unwrap();
    assert_eq!(drag.start, Point::new(10.0, 10.0));
    assert_eq!(drag.delta, Point::zero());

    let motion = &events[1];
    assert_eq!(motion.ty, EventType::DRAG_MOTION);
    assert_eq!(motion.source, EventSource::Genuine);
    let drag = motion.drag.unwrap();
    assert_eq!(drag.start, Point::new(10.0, 10.0));
    assert_eq!(drag.delta, Point::new(9.0, 0.0));
    assert_eq!(drag.mouse.cursor, Point::new(20.0, 10.0));

    s.window.mouse_release(1, Point::new(20.0, 10.0));
    assert_eq!(
        s.types(),
        vec![(EventType::MOUSE_UP, s.a), (EventType::DRAG_DROP, s.a)]
    );
    assert_eq!(
        s.window.pointer().button(MouseButton::Button1).state,
        ButtonState::Up
    );
}

#[test]
fn press_release_in_place_is_click() {
    let mut s = Scenario::new();

    s.window.mouse_press(1, Point::new(5.0, 5.0));
    s.window.mouse_release(1, Point::new(5.0, 5.0));

    assert_eq!(
        s.types(),
        vec![
            (EventType::MOUSE_ENTER, s.a),
            (EventType::MOUSE_DOWN, s.a),
            (EventType::MOUSE_UP, s.a),
            (EventType::MOUSE_CLICK, s.a),
        ]
    );
}

#[test]
fn click_within_threshold_is_still_click() {
    let mut s = Scenario::new();

    s.window.mouse_press(1, Point::new(50.0, 50.0));
    // Exactly on the threshold does not start a drag
    s.window.mouse_motion(Point::new(54.0, 50.0));
    s.window.mouse_release(1, Point::new(54.0, 50.0));

    let types: Vec<_> = s.types().into_iter().map(|(ty, _)| ty).collect();
    assert!(types.contains(&EventType::MOUSE_CLICK));
    assert!(!types.contains(&EventType::DRAG_START));
}

#[test]
fn hover_moves_between_elements() {
    let mut s = Scenario::new();

    s.window.mouse_motion(Point::new(50.0, 50.0));
    s.take();

    s.window.mouse_motion(Point::new(150.0, 50.0));
    assert_eq!(
        s.types(),
        vec![(EventType::MOUSE_LEAVE, s.a), (EventType::MOUSE_ENTER, s.b)]
    );
    assert_eq!(s.window.pointer().underneath(), Some(s.b));
}

#[test]
fn hover_is_suspended_while_held() {
    let mut s = Scenario::new();

    s.window.mouse_motion(Point::new(50.0, 50.0));
    s.window.mouse_press(3, Point::new(50.0, 50.0));
    s.take();

    s.window.mouse_motion(Point::new(150.0, 50.0));
    s.window.mouse_motion(Point::new(160.0, 60.0));

    let events = s.types();
    assert!(!events.is_empty());
    assert!(events
        .iter()
        .all(|(ty, id)| *id == s.a && *ty != EventType::MOUSE_ENTER && *ty != EventType::MOUSE_LEAVE));
}

#[test]
fn leaving_window_leaves_element() {
    let mut s = Scenario::new();

    s.window.mouse_enter(Point::new(150.0, 50.0));
    s.window.mouse_leave(Point::new(250.0, 50.0));

    assert_eq!(
        s.types(),
        vec![(EventType::MOUSE_ENTER, s.b), (EventType::MOUSE_LEAVE, s.b)]
    );
    assert!(!s.window.pointer().in_window());
}

#[test]
fn untracked_buttons_are_ignored() {
    let mut s = Scenario::new();

    s.window.mouse_press(5, Point::new(10.0, 10.0));
    s.window.mouse_release(5, Point::new(10.0, 10.0));

    assert!(s.take().is_empty());
    assert_eq!(s.window.pointer().buttons_down(), 0);
}

#[test]
fn removing_drag_target_mid_drag() {
    let mut s = Scenario::new();

    s.window.mouse_press(1, Point::new(10.0, 10.0));
    s.window.mouse_motion(Point::new(30.0, 10.0));
    s.window.remove_element(s.a).unwrap();
    s.take();

    // Nothing is delivered to the removed element
    s.window.mouse_motion(Point::new(40.0, 10.0));
    s.window.mouse_release(1, Point::new(40.0, 10.0));

    assert!(s.take().iter().all(|seen| seen.element != s.a));
    assert_eq!(s.window.pointer().buttons_down(), 0);
}

#[test]
fn raw_input_drives_the_same_machine() {
    let mut s = Scenario::new();

    for input in [
        RawInput::MouseEnter { position: Point::new(5.0, 5.0) },
        RawInput::MousePress { button: 1, position: Point::new(5.0, 5.0) },
        RawInput::MouseRelease { button: 1, position: Point::new(5.0, 5.0) },
    ] {
        s.window.inject(input);
    }

    assert_eq!(
        s.types(),
        vec![
            (EventType::MOUSE_ENTER, s.a),
            (EventType::MOUSE_DOWN, s.a),
            (EventType::MOUSE_UP, s.a),
            (EventType::MOUSE_CLICK, s.a),
        ]
    );
}
