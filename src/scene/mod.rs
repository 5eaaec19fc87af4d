//! Demo scenes.
//!
//! Each scene is an independent program: it builds its resources in
//! [`Scene::init`], draws one frame per [`Scene::render`] and reacts to input
//! through the remaining callbacks. Scenes with tunable values lay them out
//! in [`Scene::ui`], which the windowed loop draws as an egui overlay.
//! Scenes are driven by an [`App`].
//!
//! [`Scene::init`]: trait.Scene.html#tymethod.init
//! [`Scene::render`]: trait.Scene.html#tymethod.render
//! [`Scene::ui`]: trait.Scene.html#method.ui
//! [`App`]: ../app/struct.App.html

use crate::driver::Driver;
use crate::error::Result;
use crate::factory::Factory;
use crate::input::{Action, Key, KeyState, Modifiers, MouseButton};
use crate::util::Assets;
use std::{fmt, str};

mod clear;
mod lit_cubes;
mod mesh;
mod point;
mod rectangle;
mod textured_cube;
mod triangle;

pub use self::clear::Clear;
pub use self::lit_cubes::{LitCubes, Light};
pub use self::mesh::{Mesh, Vertex};
pub use self::point::Point;
pub use self::rectangle::Rectangle;
pub use self::textured_cube::TexturedCube;
pub use self::triangle::Triangle;

/// Timing and framebuffer size for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Seconds since the first frame.
    pub time: f32,

    /// Seconds since the previous frame.
    pub dt: f32,

    /// Framebuffer width in pixels.
    pub width: u32,

    /// Framebuffer height in pixels.
    pub height: u32,
}

impl Frame {
    /// Width over height, `1.0` for a degenerate framebuffer.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// The callbacks a demo implements.
pub trait Scene: Sized {
    /// Name used on the command line and in logs.
    const NAME: &'static str;

    /// Builds every resource the scene needs.
    ///
    /// A failure drops (and releases) whatever was already built.
    fn init<D: Driver>(factory: &Factory<D>, assets: &Assets) -> Result<Self>;

    /// Draws one frame.
    fn render<D: Driver>(&mut self, factory: &mut Factory<D>, frame: &Frame);

    /// Polls held keys once per frame, before rendering.
    fn process_input(&mut self, _keys: &KeyState, _frame: &Frame) {}

    /// A key changed state.
    fn key(&mut self, _key: Key, _action: Action, _modifiers: Modifiers) {}

    /// The cursor moved.
    fn mouse_move(&mut self, _x: f64, _y: f64) {}

    /// A mouse button changed state.
    fn mouse_button(&mut self, _button: MouseButton, _action: Action, _x: f64, _y: f64) {}

    /// The scroll wheel moved, in lines.
    fn scroll(&mut self, _dx: f32, _dy: f32) {}

    /// Lays out the scene's debug window, once per frame after rendering.
    fn ui(&mut self, _ctx: &egui::Context) {}

    /// The framebuffer was resized. The viewport is already updated.
    fn reshape(&mut self, _width: u32, _height: u32) {}
}

/// The available scenes.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SceneKind {
    Clear,
    Point,
    Triangle,
    Rectangle,
    TexturedCube,
    #[default]
    LitCubes,
}

impl SceneKind {
    /// Every scene, in lesson order.
    pub const ALL: [SceneKind; 6] = [
        SceneKind::Clear,
        SceneKind::Point,
        SceneKind::Triangle,
        SceneKind::Rectangle,
        SceneKind::TexturedCube,
        SceneKind::LitCubes,
    ];

    /// The scene's command line name.
    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Clear => Clear::NAME,
            SceneKind::Point => Point::NAME,
            SceneKind::Triangle => Triangle::NAME,
            SceneKind::Rectangle => Rectangle::NAME,
            SceneKind::TexturedCube => TexturedCube::NAME,
            SceneKind::LitCubes => LitCubes::NAME,
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl str::FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
        SceneKind::ALL
            .iter()
            .cloned()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown scene \"{}\"", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_names_round_trip() {
        for kind in SceneKind::ALL.iter() {
            assert_eq!(kind.name().parse::<SceneKind>(), Ok(*kind));
        }
        assert!("teapot".parse::<SceneKind>().is_err());
    }

    #[test]
    fn degenerate_frames_have_unit_aspect() {
        let frame = Frame { time: 0.0, dt: 0.0, width: 640, height: 0 };
        assert_eq!(frame.aspect(), 1.0);
    }
}
