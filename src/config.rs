//! Run-time configuration.

use crate::scene::SceneKind;
use std::path::PathBuf;

/// Window, context and scene settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Window title.
    pub title: String,

    /// Initial framebuffer width in pixels.
    pub width: u32,

    /// Initial framebuffer height in pixels.
    pub height: u32,

    /// Synchronize buffer swaps with the display refresh.
    pub vsync: bool,

    /// Multisample count, zero to disable.
    pub samples: u16,

    /// Requested OpenGL core profile version.
    pub gl_version: (u8, u8),

    /// Directory holding `shader/` and `image/`.
    pub assets: PathBuf,

    /// The scene to run.
    pub scene: SceneKind,

    /// Use the software driver instead of opening a window.
    pub headless: bool,

    /// Stop after this many frames.
    pub max_frames: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "gl-primer".to_string(),
            width: 960,
            height: 540,
            vsync: true,
            samples: 0,
            gl_version: (3, 3),
            assets: PathBuf::from("."),
            scene: SceneKind::default(),
            headless: false,
            max_frames: None,
        }
    }
}
