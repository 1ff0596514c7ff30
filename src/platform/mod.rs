//! Platform boundary
//!
//! Platform bindings decode their native events into [`RawInput`] samples
//! and hand them over through an [`InputSource`]. This is the only way input
//! enters the core.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use crate::geometry::Point;
use crate::keyboard::{KeyCode, KeyState};
use crate::window::Visibility;

#[cfg(feature = "winit")]
pub mod winit;

/// One decoded sample from the platform
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    /// The cursor entered the window
    MouseEnter { position: Point },
    /// The cursor left the window
    MouseLeave { position: Point },
    /// A button went down; `button` is the platform's 1-based button number
    MousePress { button: u32, position: Point },
    MouseRelease { button: u32, position: Point },
    MouseMotion { position: Point },
    Key {
        state: KeyState,
        code: KeyCode,
        character: Option<char>,
    },
    Resize { width: u32, height: u32 },
    Visibility(Visibility),
    /// The user asked the window manager to close the window
    CloseRequested,
    /// The native window is gone
    Destroyed,
}

/// Source of raw input driven by the frame loop
pub trait InputSource {
    /// Block until input may be available or `timeout` elapses
    fn wait(&mut self, timeout: Duration);

    /// Next pending sample, without blocking
    fn poll(&mut self) -> Option<RawInput>;
}

/// Sending half of a [`ChannelSource`]
#[derive(Debug, Clone)]
pub struct InputSender {
    tx: Sender<RawInput>,
}

impl InputSender {
    pub fn send(&self, input: RawInput) -> Result<(), crate::Error> {
        self.tx
            .send(input)
            .map_err(|_| crate::Error::Platform("input source has been dropped".to_string()))
    }
}

/// Channel backed input source.
///
/// The sender side can live on another thread. Once every sender is gone
/// the source reports [`RawInput::Destroyed`].
#[derive(Debug)]
pub struct ChannelSource {
    rx: Receiver<RawInput>,
    pending: VecDeque<RawInput>,
    disconnected: bool,
}

impl ChannelSource {
    pub fn new() -> (Self, InputSender) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                rx,
                pending: VecDeque::new(),
                disconnected: false,
            },
            InputSender { tx },
        )
    }
}

impl InputSource for ChannelSource {
    fn wait(&mut self, timeout: Duration) {
        if !self.pending.is_empty() || self.disconnected {
            return;
        }

        match self.rx.recv_timeout(timeout) {
            Ok(input) => self.pending.push_back(input),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => self.disconnected = true,
        }
    }

    fn poll(&mut self) -> Option<RawInput> {
        if let Some(input) = self.pending.pop_front() {
            return Some(input);
        }

        match self.rx.try_recv() {
            Ok(input) => Some(input),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.disconnected = true;
                Some(RawInput::Destroyed)
            }
        }
    }
}
