// Input core of the Orbit UI Framework
pub mod config;
pub mod element;
pub mod events;
pub mod frame_loop;
pub mod geometry;
pub mod keyboard;
pub mod platform;
pub mod pointer;
pub mod renderer;
pub mod window;

/// Version of the Orbit input core
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export of common types for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::element::{ElementId, ElementTree, TreeError};
    pub use crate::events::{
        Direction, Event, EventResult, EventSource, EventType, HitTest, MouseButton, Payload,
    };
    pub use crate::frame_loop::{EventLoop, LoopExit, LoopHandle};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::keyboard::{KeyCode, KeyState};
    pub use crate::platform::{ChannelSource, InputSource, RawInput};
    pub use crate::renderer::Renderer;
    pub use crate::window::{Visibility, Window};
}

/// Initialize the input core with default settings
pub fn init() -> Result<(), Error> {
    log::debug!("orbit-input {} initialized", VERSION);
    Ok(())
}

/// Errors that can occur in the Orbit input core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Element tree error: {0}")]
    Tree(#[from] element::TreeError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Window lock error: {0}")]
    Lock(String),

    #[error("Rendering error: {0}")]
    Render(String),

    #[error("Platform error: {0}")]
    Platform(String),
}
