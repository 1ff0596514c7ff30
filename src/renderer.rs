//! Rendering collaborator seam
//!
//! The core never draws anything itself. Once per eligible frame it hands
//! the window to a [`Renderer`].

use crate::window::Window;

/// Draws a window's element tree
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> Result<(), crate::Error> {
        Ok(()) // Default implementation does nothing
    }

    /// Draw one frame
    fn draw(&mut self, window: &Window) -> Result<(), crate::Error>;

    /// Clean up resources
    fn cleanup(&mut self) -> Result<(), crate::Error> {
        Ok(())
    }
}

/// Renderer that draws nothing; handy for headless runs
#[derive(Debug, Default)]
pub struct NullRenderer {
    /// Number of frames "drawn"
    pub frames: u64,
}

impl Renderer for NullRenderer {
    fn draw(&mut self, _window: &Window) -> Result<(), crate::Error> {
        self.frames += 1;
        Ok(())
    }
}
