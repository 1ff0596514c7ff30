//! Runtime configuration
//!
//! All sections fall back to their defaults when missing, so an empty JSON
//! object is a valid configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pointer::DRAG_THRESHOLD;

/// Frame pacing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Target frames per second
    pub fps: u32,
    /// Shortest wait on the input source, in milliseconds
    pub min_wait_ms: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            min_wait_ms: 1,
        }
    }
}

impl FrameConfig {
    /// Length of one frame
    pub fn interval(&self) -> Duration {
        Duration::from_micros(999_999 / u64::from(self.fps.max(1)))
    }

    pub fn min_wait(&self) -> Duration {
        Duration::from_millis(self.min_wait_ms.max(1))
    }
}

/// Pointer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Distance a held button must travel before the press becomes a drag
    pub drag_threshold: f32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD,
        }
    }
}

/// Top level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub frame: FrameConfig,
    pub pointer: PointerConfig,
}

impl Config {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, crate::Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
