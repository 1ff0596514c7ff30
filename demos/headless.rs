// Headless run of the input core: scripted input on one thread, the frame
// loop on another, a draggable box and a window that refuses to close once.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use orbit_input::prelude::*;

/// Renderer that logs the frame and the box position
struct LogRenderer {
    item: ElementId,
    frames: u64,
}

impl Renderer for LogRenderer {
    fn draw(&mut self, window: &Window) -> Result<(), orbit_input::Error> {
        self.frames += 1;
        if let Some(bounds) = window.tree().bounds(self.item) {
            log::debug!("frame {}: box at ({}, {})", self.frames, bounds.x(), bounds.y());
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    orbit_input::init()?;

    let config = Config::from_json(r#"{ "frame": { "fps": 30 } }"#)?;
    let mut window = Window::with_config("headless", 320, 240, &config);
    let root = window.root();
    let item = window.add_element(root, "box", Rect::new(20.0, 20.0, 40.0, 40.0))?;

    // Drag moves the box
    window.tree_mut().register_handler(item, EventType::DRAG_MOTION, |tree, me, event| {
        let Some(drag) = event.drag() else {
            return EventResult::Ignored;
        };
        if let Some(bounds) = tree.bounds(me) {
            let moved = Rect::new(
                bounds.x() + drag.delta.x,
                bounds.y() + drag.delta.y,
                bounds.size.width,
                bounds.size.height,
            );
            if let Err(e) = tree.set_bounds(me, moved) {
                log::warn!("cannot move {}: {}", me, e);
            }
        }
        EventResult::Consumed
    })?;

    window.tree_mut().register_handler(item, EventType::DRAG_DROP, |_, me, event| {
        if let Some(drag) = event.drag() {
            log::info!("{} dropped at {:?}", me, drag.mouse.cursor);
        }
        EventResult::Consumed
    })?;

    // First close request is refused
    let refused = Arc::new(AtomicBool::new(false));
    let seen = refused.clone();
    window
        .tree_mut()
        .register_handler(root, EventType::WINDOW_SHOULD_CLOSE, move |_, _, _| {
            if seen.swap(true, Ordering::SeqCst) {
                EventResult::Ignored
            } else {
                log::info!("refusing the first close request");
                EventResult::Consumed
            }
        })?;

    let (source, tx) = ChannelSource::new();
    let renderer = LogRenderer { item, frames: 0 };
    let mut event_loop = EventLoop::with_frame_config(window, source, renderer, &config.frame);

    let script = thread::spawn(move || -> Result<(), orbit_input::Error> {
        let pause = Duration::from_millis(40);

        tx.send(RawInput::MouseEnter { position: Point::new(30.0, 30.0) })?;
        tx.send(RawInput::MousePress { button: 1, position: Point::new(30.0, 30.0) })?;
        for step in 1..=5 {
            thread::sleep(pause);
            let offset = step as f32 * 10.0;
            tx.send(RawInput::MouseMotion { position: Point::new(30.0 + offset, 30.0 + offset / 2.0) })?;
        }
        tx.send(RawInput::MouseRelease { button: 1, position: Point::new(80.0, 55.0) })?;

        thread::sleep(pause);
        tx.send(RawInput::Resize { width: 640, height: 480 })?;
        tx.send(RawInput::CloseRequested)?;
        thread::sleep(pause);
        tx.send(RawInput::CloseRequested)?;
        Ok(())
    });

    let exit = event_loop.run()?;
    script
        .join()
        .map_err(|_| anyhow::anyhow!("input script panicked"))?
        .context("input script failed")?;

    let window = event_loop.window();
    let window = window
        .lock()
        .map_err(|_| anyhow::anyhow!("window lock poisoned"))?;
    log::info!(
        "loop exited with {:?} after {} frames; box at {:?}, window {:?}",
        exit,
        event_loop.renderer().frames,
        window.tree().bounds(item),
        window.size(),
    );
    drop(window);

    event_loop.teardown()?;
    Ok(())
}
