//! Fixed-function pipeline state and the scoped program pass.

use crate::draw_call::{DrawCall, Kind};
use crate::driver::Driver;
use crate::factory::Factory;
use crate::gl;
use crate::program::{Program, Uniform};
use crate::texture::Texture;
use crate::util;
use crate::vertex_array::VertexLayout;

/// Specifies the polygon rasterization method.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum PolygonMode {
    /// Vertices marked as the start of a boundary edge are drawn as points.
    Point,

    /// Boundary edges of the polygon are drawn as line segments.
    Line,

    /// The interior of the polygon is filled.
    #[default]
    Fill,
}

impl PolygonMode {
    pub(crate) fn as_gl_enum(&self) -> u32 {
        match *self {
            PolygonMode::Point => gl::POINT,
            PolygonMode::Line => gl::LINE,
            PolygonMode::Fill => gl::FILL,
        }
    }
}

/// Specifies depth buffer testing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DepthTest {
    /// Depth testing is disabled.
    #[default]
    Off,

    /// Depth test passes if the incoming depth value is less than
    /// the stored depth value.
    LessThan,

    /// Depth test passes if the incoming depth value is less than or equal
    /// to the stored depth value.
    LessThanOrEqual,

    /// Depth test always passes.
    Always,
}

impl DepthTest {
    pub(crate) fn as_gl_enum_if_enabled(&self) -> Option<u32> {
        match *self {
            DepthTest::Off => None,
            DepthTest::LessThan => Some(gl::LESS),
            DepthTest::LessThanOrEqual => Some(gl::LEQUAL),
            DepthTest::Always => Some(gl::ALWAYS),
        }
    }
}

/// Hardware culling mode.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Culling {
    /// Disable culling.
    #[default]
    None,

    /// Cull the front-facing triangles.
    Front,

    /// Cull the back-facing triangles.
    Back,
}

impl Culling {
    pub(crate) fn as_gl_enum_if_enabled(&self) -> Option<u32> {
        match *self {
            Culling::None => None,
            Culling::Front => Some(gl::FRONT),
            Culling::Back => Some(gl::BACK),
        }
    }
}

/// Viewport region to render to.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Viewport {
    /// X offset.
    pub x: u32,

    /// Y offset.
    pub y: u32,

    /// Width.
    pub w: u32,

    /// Height.
    pub h: u32,
}

impl Viewport {
    /// The whole framebuffer.
    pub fn full(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }
}

/// Fixed-function state parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct State {
    /// Hardware face culling mode.
    pub culling: Culling,

    /// Hardware depth testing mode.
    pub depth_test: DepthTest,

    /// Specifies the polygon rasterization method.
    pub polygon_mode: PolygonMode,

    /// Rasterized diameter of points, in pixels.
    pub point_size: f32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            culling: Culling::None,
            depth_test: DepthTest::Off,
            polygon_mode: PolygonMode::Fill,
            point_size: 1.0,
        }
    }
}

/// Color buffer clear operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClearColor {
    /// Clear the color buffer to the given value.
    Yes {
        /// Red.
        r: f32,
        /// Green.
        g: f32,
        /// Blue.
        b: f32,
        /// Alpha.
        a: f32,
    },

    /// Leave the color buffer alone.
    No,
}

/// Depth buffer clear operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClearDepth {
    /// Clear the depth buffer to the given value.
    Yes {
        /// Depth.
        z: f64,
    },

    /// Leave the depth buffer alone.
    No,
}

/// Which buffers a clear writes to, and with what.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearOp {
    /// Color buffer operation.
    pub color: ClearColor,

    /// Depth buffer operation.
    pub depth: ClearDepth,
}

impl ClearOp {
    /// Clear the color buffer only.
    pub fn color(rgba: [f32; 4]) -> Self {
        let [r, g, b, a] = rgba;
        Self {
            color: ClearColor::Yes { r, g, b, a },
            depth: ClearDepth::No,
        }
    }

    /// Clear the color buffer and reset depth to the far plane.
    pub fn color_and_depth(rgba: [f32; 4]) -> Self {
        Self {
            depth: ClearDepth::Yes { z: 1.0 },
            ..Self::color(rgba)
        }
    }
}

/// A program in use.
///
/// Created by [`Factory::use_program`]. The pass borrows the factory
/// mutably, so no other program can be made current while it lives;
/// dropping it restores the "no program" state.
///
/// [`Factory::use_program`]: ../factory/struct.Factory.html#method.use_program
pub struct Pass<'a, D: Driver> {
    factory: &'a mut Factory<D>,
    program: &'a Program,
}

impl<'a, D: Driver> Pass<'a, D> {
    /// Constructor.
    pub(crate) fn new(factory: &'a mut Factory<D>, program: &'a Program) -> Self {
        factory.driver().use_program(program.id());
        Self { factory, program }
    }

    /// Returns the program in use.
    pub fn program(&self) -> &Program {
        self.program
    }

    /// Resolves a uniform name, returning `-1` when the program has no
    /// active uniform by that name.
    pub fn uniform_location(&self, name: &str) -> i32 {
        match util::cstring(name) {
            Some(name) => {
                self.factory.driver().get_uniform_location(self.program().id(), &name)
            }
            None => -1,
        }
    }

    /// Uploads a value to a named uniform.
    ///
    /// Unknown names are ignored.
    pub fn set_uniform<U: Into<Uniform>>(&self, name: &str, value: U) {
        let location = self.uniform_location(name);
        if location == -1 {
            return;
        }
        value.into().upload(self.factory.driver(), location);
    }

    /// Binds a texture to texture unit `unit`.
    pub fn bind_texture(&self, unit: u32, texture: &Texture) {
        let driver = self.factory.driver();
        driver.active_texture(gl::TEXTURE0 + unit);
        driver.bind_texture(gl::TEXTURE_2D, texture.id());
    }

    /// Draws from a vertex layout with the program in use.
    ///
    /// Indexed draws need an index buffer attached to the layout; without
    /// one the call is skipped.
    pub fn draw(&self, layout: &VertexLayout, draw_call: DrawCall) {
        let driver = self.factory.driver();
        let mode = draw_call.primitive.as_gl_enum();
        match draw_call.kind {
            Kind::Arrays => {
                driver.bind_vertex_array(layout.id());
                driver.draw_arrays(mode, draw_call.offset, draw_call.count);
            }
            Kind::Elements => {
                let format = match layout.index_format() {
                    Some(format) => format,
                    None => {
                        error!("indexed draw from vertex layout {} without indices", layout.id());
                        return;
                    }
                };
                let offset = draw_call.offset * format.component_bytes();
                driver.bind_vertex_array(layout.id());
                driver.draw_elements(mode, draw_call.count, format.gl_data_type(), offset);
            }
        }
    }
}

impl<'a, D: Driver> Drop for Pass<'a, D> {
    fn drop(&mut self) {
        let driver = self.factory.driver();
        driver.use_program(0);
        driver.bind_vertex_array(0);
    }
}
