// Frame pacing and loop control

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use orbit_input::config::FrameConfig;
use orbit_input::frame_loop::FrameClock;
use orbit_input::prelude::*;
use orbit_input::renderer::NullRenderer;

/// Renderer whose frames take a fixed amount of time
struct SlowRenderer {
    cost: Duration,
    frames: Arc<AtomicUsize>,
}

impl Renderer for SlowRenderer {
    fn draw(&mut self, _window: &Window) -> Result<(), orbit_input::Error> {
        thread::sleep(self.cost);
        self.frames.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Renderer that always fails
struct BrokenRenderer {
    attempts: Arc<AtomicUsize>,
}

impl Renderer for BrokenRenderer {
    fn draw(&mut self, _window: &Window) -> Result<(), orbit_input::Error> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(orbit_input::Error::Render("no surface".to_string()))
    }
}

/// Replay draws against a virtual clock, returning the start of every draw
fn simulate(clock: &mut FrameClock, start: Instant, costs: &[Duration]) -> Vec<Instant> {
    let mut now = start;
    let mut draws = Vec::new();

    for cost in costs {
        if !clock.is_due(now) {
            now = clock.deadline();
        }
        draws.push(now);
        now += *cost;
        clock.advance(now);
    }

    draws
}

#[test]
fn slow_frame_moves_deadline_by_one_interval() {
    let start = Instant::now();
    let mut clock = FrameClock::new(&FrameConfig::default(), start);
    let interval = clock.interval();
    let first = clock.deadline();

    // Tick N overruns by half an interval
    clock.advance(start + interval + interval / 2);

    assert_eq!(clock.deadline(), first + interval);
}

#[test]
fn steady_draws_keep_a_fixed_cadence() {
    let start = Instant::now();
    let mut clock = FrameClock::new(&FrameConfig::default(), start);
    let interval = clock.interval();
    let first = clock.deadline();

    let draws = simulate(&mut clock, start, &[interval / 10; 5]);

    for (n, draw) in draws.iter().enumerate().skip(1) {
        assert_eq!(*draw, first + interval * n as u32);
    }
}

#[test]
fn stall_does_not_burst() {
    let start = Instant::now();
    let mut clock = FrameClock::new(&FrameConfig::default(), start);
    let interval = clock.interval();
    let fast = interval / 10;

    // One frame stalls for three intervals
    let draws = simulate(&mut clock, start, &[interval * 3, fast, fast, fast]);

    let resumed = draws[0] + interval * 3;
    assert_eq!(draws[1], resumed + interval);
    assert_eq!(draws[2], resumed + interval * 2);
    assert_eq!(draws[3], resumed + interval * 3);
}

#[test]
fn one_draw_per_interval_after_obscured() {
    let start = Instant::now();
    let mut clock = FrameClock::new(&FrameConfig::default(), start);
    let interval = clock.interval();

    // Deadline stayed frozen while the window was fully obscured
    let visible_again = start + interval * 5;
    assert!(clock.is_due(visible_again));

    let finished = visible_again + interval / 100;
    clock.advance(finished);

    assert!(!clock.is_due(finished));
    assert_eq!(clock.deadline(), finished + interval);
}

#[test]
fn wait_never_exceeds_interval() {
    let start = Instant::now();
    let mut clock = FrameClock::new(&FrameConfig { fps: 30, min_wait_ms: 2 }, start);
    clock.advance(start);

    for offset in [0u32, 5, 20, 33, 100] {
        let timeout = clock.timeout(start + Duration::from_millis(offset as u64));
        assert!(timeout <= clock.interval());
        assert!(timeout >= Duration::from_millis(2));
    }
}

#[test]
fn queued_close_exits_before_drawing() {
    let (source, tx) = ChannelSource::new();
    let clicks = Arc::new(AtomicUsize::new(0));

    let mut window = Window::new("pacing", 100, 100);
    let root = window.root();
    let counter = clicks.clone();
    window
        .tree_mut()
        .register_handler(root, EventType::MOUSE_CLICK, move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            EventResult::Consumed
        })
        .unwrap();

    tx.send(RawInput::MousePress { button: 1, position: Point::new(5.0, 5.0) })
        .unwrap();
    tx.send(RawInput::MouseRelease { button: 1, position: Point::new(5.0, 5.0) })
        .unwrap();
    tx.send(RawInput::CloseRequested).unwrap();

    let mut event_loop = EventLoop::new(window, source, NullRenderer::default());

    assert_eq!(event_loop.run().unwrap(), LoopExit::Closed);
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
    assert_eq!(event_loop.renderer().frames, 0);
}

#[test]
fn vetoed_close_keeps_the_loop_alive() {
    let (source, tx) = ChannelSource::new();
    let mut event_loop = EventLoop::new(Window::new("pacing", 100, 100), source, NullRenderer::default());
    let handle = event_loop.handle();
    let vetoes = Arc::new(AtomicUsize::new(0));

    {
        let window = event_loop.window();
        let mut window = window.lock().unwrap();
        let root = window.root();
        let counter = vetoes.clone();
        window
            .tree_mut()
            .register_handler(root, EventType::WINDOW_SHOULD_CLOSE, move |_, _, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                handle.stop();
                EventResult::Consumed
            })
            .unwrap();
    }

    tx.send(RawInput::CloseRequested).unwrap();

    assert_eq!(event_loop.run().unwrap(), LoopExit::Stopped);
    assert_eq!(vetoes.load(Ordering::SeqCst), 1);
    assert!(!event_loop.window().lock().unwrap().is_closed());
}

#[test]
fn stop_from_another_thread() {
    let (source, _tx) = ChannelSource::new();
    let frames = Arc::new(AtomicUsize::new(0));
    let renderer = SlowRenderer {
        cost: Duration::from_millis(1),
        frames: frames.clone(),
    };

    let mut event_loop = EventLoop::new(Window::new("pacing", 100, 100), source, renderer);
    let handle = event_loop.handle();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        handle.stop();
    });

    assert_eq!(event_loop.run().unwrap(), LoopExit::Stopped);
    stopper.join().unwrap();

    // 60 fps for 200ms is 12 frames; never a burst beyond the cadence
    let drawn = frames.load(Ordering::SeqCst);
    assert!(drawn >= 1, "drew {} frames", drawn);
    assert!(drawn <= 15, "drew {} frames", drawn);
}

#[test]
fn renderer_errors_do_not_stop_the_loop() {
    let (source, tx) = ChannelSource::new();
    let attempts = Arc::new(AtomicUsize::new(0));
    let renderer = BrokenRenderer {
        attempts: attempts.clone(),
    };

    let mut event_loop = EventLoop::new(Window::new("pacing", 100, 100), source, renderer);
    event_loop.start().unwrap();

    assert_eq!(event_loop.step().unwrap(), None);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    tx.send(RawInput::Destroyed).unwrap();
    let exit = loop {
        if let Some(exit) = event_loop.step().unwrap() {
            break exit;
        }
    };
    assert_eq!(exit, LoopExit::Destroyed);
}

#[test]
fn sender_dropped_means_destroyed() {
    let (source, tx) = ChannelSource::new();
    drop(tx);

    let mut event_loop = EventLoop::new(Window::new("pacing", 100, 100), source, NullRenderer::default());

    assert_eq!(event_loop.run().unwrap(), LoopExit::Destroyed);
}
