//! Frame-paced main loop
//!
//! Each iteration waits on the input source until input arrives or the next
//! frame deadline is near, drains every pending sample through the window,
//! and redraws at most once. All of that happens with the window locked, so
//! another thread holding a [`LoopHandle`] never sees the tree mid-dispatch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::config::FrameConfig;
use crate::platform::InputSource;
use crate::renderer::Renderer;
use crate::window::{Drain, Window};

/// Deadline bookkeeping for the next redraw.
///
/// The deadline moves forward by a fixed interval after each redraw rather
/// than being reset to "now + interval", so short stalls do not accumulate
/// drift. A loop more than one interval behind counts the late redraw as the
/// current tick and schedules the next one a full interval later, so it
/// never draws a burst of catch-up frames.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    min_wait: Duration,
    deadline: Instant,
}

impl FrameClock {
    pub fn new(config: &FrameConfig, now: Instant) -> Self {
        Self {
            interval: config.interval(),
            min_wait: config.min_wait(),
            // The first frame is due immediately
            deadline: now.checked_sub(Duration::from_micros(1)).unwrap_or(now),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// How long the input wait may block.
    ///
    /// Never longer than one interval and never shorter than the minimum
    /// wait, so the loop cannot spin.
    pub fn timeout(&self, now: Instant) -> Duration {
        match self.deadline.checked_duration_since(now) {
            Some(remaining) if !remaining.is_zero() => {
                remaining.min(self.interval).max(self.min_wait)
            }
            _ => self.min_wait,
        }
    }

    /// Whether a redraw is eligible at `now`
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    /// Schedule the frame after a redraw that finished at `now`
    pub fn advance(&mut self, now: Instant) {
        let mut next = self.deadline + self.interval;
        if now >= next + self.interval {
            log::debug!("frame loop fell behind by {:?}, rescheduling", now - next);
            next = now + self.interval;
        }
        self.deadline = next;
    }
}

/// Why [`EventLoop::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// [`LoopHandle::stop`] or [`EventLoop::stop`] was called
    Stopped,
    /// The window agreed to close
    Closed,
    /// The platform destroyed the window
    Destroyed,
}

/// Control surface for other threads
#[derive(Debug, Clone)]
pub struct LoopHandle {
    running: Arc<AtomicBool>,
    window: Arc<Mutex<Window>>,
}

impl LoopHandle {
    /// Ask the loop to exit after its current iteration
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run the window close protocol between iterations.
    ///
    /// Returns whether the window is now closed.
    pub fn request_close(&self) -> Result<bool, crate::Error> {
        let mut window = lock(&self.window)?;
        Ok(window.request_close())
    }
}

fn lock(window: &Mutex<Window>) -> Result<MutexGuard<'_, Window>, crate::Error> {
    window
        .lock()
        .map_err(|e| crate::Error::Lock(format!("window lock poisoned: {}", e)))
}

/// Feed every pending sample to the window, stopping at the first fatal one
fn drain(source: &mut dyn InputSource, window: &mut Window) -> Drain {
    while let Some(input) = source.poll() {
        log::trace!("input: {:?}", input);

        let result = window.inject(input);
        if result.is_fatal() {
            return result;
        }
    }

    Drain::Continue
}

/// Single-window main loop
pub struct EventLoop<S: InputSource, R: Renderer> {
    window: Arc<Mutex<Window>>,
    source: S,
    renderer: R,
    frame: FrameConfig,
    clock: FrameClock,
    running: Arc<AtomicBool>,
}

impl<S: InputSource, R: Renderer> EventLoop<S, R> {
    pub fn new(window: Window, source: S, renderer: R) -> Self {
        Self::with_frame_config(window, source, renderer, &FrameConfig::default())
    }

    pub fn with_frame_config(window: Window, source: S, renderer: R, config: &FrameConfig) -> Self {
        Self {
            window: Arc::new(Mutex::new(window)),
            source,
            renderer,
            frame: config.clone(),
            clock: FrameClock::new(config, Instant::now()),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The shared window
    pub fn window(&self) -> Arc<Mutex<Window>> {
        self.window.clone()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            running: self.running.clone(),
            window: self.window.clone(),
        }
    }

    /// Initialize the renderer and arm the loop
    pub fn start(&mut self) -> Result<(), crate::Error> {
        self.renderer.init()?;
        self.clock = FrameClock::new(&self.frame, Instant::now());
        self.running.store(true, Ordering::SeqCst);

        log::info!("frame loop started, interval {:?}", self.clock.interval());
        Ok(())
    }

    /// Start the loop and block until it exits
    pub fn run(&mut self) -> Result<LoopExit, crate::Error> {
        self.start()?;

        let exit = loop {
            if let Some(exit) = self.step()? {
                break exit;
            }
        };

        self.running.store(false, Ordering::SeqCst);
        log::info!("frame loop exited: {:?}", exit);
        Ok(exit)
    }

    /// One iteration: wait, drain, maybe redraw
    pub fn step(&mut self) -> Result<Option<LoopExit>, crate::Error> {
        if !self.running.load(Ordering::SeqCst) {
            return Ok(Some(LoopExit::Stopped));
        }

        self.source.wait(self.clock.timeout(Instant::now()));

        let mut window = lock(&self.window)?;

        match drain(&mut self.source, &mut window) {
            Drain::Continue => {}
            Drain::Closed => return Ok(Some(LoopExit::Closed)),
            Drain::Destroyed => return Ok(Some(LoopExit::Destroyed)),
        }
        // Closed from another thread between iterations
        if window.is_closed() {
            return Ok(Some(LoopExit::Closed));
        }

        window.reconfigure();

        if window.is_visible() && self.clock.is_due(Instant::now()) {
            if let Err(e) = window.draw(&mut self.renderer) {
                log::error!("draw failed: {}", e);
            }
            self.clock.advance(Instant::now());
        }

        Ok(None)
    }

    /// Ask the loop to exit after its current iteration
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Tear down the window and release the renderer
    pub fn teardown(&mut self) -> Result<(), crate::Error> {
        self.running.store(false, Ordering::SeqCst);

        lock(&self.window)?.teardown();
        self.renderer.cleanup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ChannelSource, RawInput};
    use crate::renderer::NullRenderer;

    const INTERVAL: Duration = Duration::from_micros(16_666);

    fn clock_at(now: Instant) -> FrameClock {
        FrameClock::new(&FrameConfig::default(), now)
    }

    #[test]
    fn test_first_frame_is_due() {
        let now = Instant::now();
        let clock = clock_at(now);

        assert_eq!(clock.interval(), INTERVAL);
        assert!(clock.is_due(now));
        assert_eq!(clock.timeout(now), Duration::from_millis(1));
    }

    #[test]
    fn test_slow_draw_advances_one_interval() {
        let start = Instant::now();
        let mut clock = clock_at(start);
        let first = clock.deadline();

        // Draw took one and a half intervals
        clock.advance(start + INTERVAL + INTERVAL / 2);

        assert_eq!(clock.deadline(), first + INTERVAL);
    }

    #[test]
    fn test_far_behind_waits_a_full_interval() {
        let start = Instant::now();
        let mut clock = clock_at(start);
        let late = start + INTERVAL * 5;

        clock.advance(late);

        assert_eq!(clock.deadline(), late + INTERVAL);
        assert!(!clock.is_due(late + INTERVAL / 100));
    }

    #[test]
    fn test_timeout_is_clamped() {
        let start = Instant::now();
        let mut clock = clock_at(start);
        clock.advance(start);
        let deadline = clock.deadline();

        // Far from the deadline: capped at one interval
        assert!(clock.timeout(start) <= INTERVAL);
        // Just short of the deadline: floored at the minimum wait
        assert_eq!(
            clock.timeout(deadline - Duration::from_micros(10)),
            Duration::from_millis(1)
        );
        // Past it
        assert_eq!(clock.timeout(deadline + INTERVAL), Duration::from_millis(1));
    }

    #[test]
    fn test_stop_before_start() {
        let (source, _tx) = ChannelSource::new();
        let mut event_loop = EventLoop::new(Window::new("test", 10, 10), source, NullRenderer::default());

        assert_eq!(event_loop.step().unwrap(), Some(LoopExit::Stopped));
    }

    #[test]
    fn test_destroyed_exits_without_drawing() {
        let (source, tx) = ChannelSource::new();
        tx.send(RawInput::Destroyed).unwrap();

        let mut event_loop = EventLoop::new(Window::new("test", 10, 10), source, NullRenderer::default());

        assert_eq!(event_loop.run().unwrap(), LoopExit::Destroyed);
        assert_eq!(event_loop.renderer().frames, 0);
        assert!(!event_loop.handle().is_running());
    }

    #[test]
    fn test_first_iteration_draws() {
        let (source, _tx) = ChannelSource::new();
        let mut event_loop = EventLoop::new(Window::new("test", 10, 10), source, NullRenderer::default());

        event_loop.start().unwrap();
        assert_eq!(event_loop.step().unwrap(), None);
        assert_eq!(event_loop.renderer().frames, 1);
    }

    #[test]
    fn test_fully_obscured_skips_draw() {
        let (source, tx) = ChannelSource::new();
        tx.send(RawInput::Visibility(crate::window::Visibility::FullyObscured))
            .unwrap();

        let mut event_loop = EventLoop::new(Window::new("test", 10, 10), source, NullRenderer::default());
        event_loop.start().unwrap();
        event_loop.step().unwrap();

        assert_eq!(event_loop.renderer().frames, 0);
    }

    #[test]
    fn test_handle_request_close() {
        let (source, _tx) = ChannelSource::new();
        let mut event_loop = EventLoop::new(Window::new("test", 10, 10), source, NullRenderer::default());
        let handle = event_loop.handle();

        event_loop.start().unwrap();
        assert!(handle.request_close().unwrap());
        assert_eq!(event_loop.step().unwrap(), Some(LoopExit::Closed));
    }

    #[test]
    fn test_teardown_empties_tree() {
        let (source, _tx) = ChannelSource::new();
        let mut event_loop = EventLoop::new(Window::new("test", 10, 10), source, NullRenderer::default());

        event_loop.teardown().unwrap();

        let window = event_loop.window();
        assert!(window.lock().unwrap().tree().is_empty());
    }
}
