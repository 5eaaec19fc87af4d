use super::{Frame, Scene};
use crate::buffer::{self, Attribute, Buffer, Format};
use crate::draw_call::{DrawCall, Primitive};
use crate::driver::Driver;
use crate::error::Result;
use crate::factory::Factory;
use crate::pipeline::ClearOp;
use crate::program::Program;
use crate::util::Assets;
use crate::vertex_array::VertexLayout;
use glam::Vec4;

/// A triangle whose uniform color cycles over time.
pub struct Triangle {
    program: Program,
    layout: VertexLayout,
    _vertices: Buffer,
}

const VERTICES: [f32; 9] = [
    -0.5, -0.5, 0.0,
    0.5, -0.5, 0.0,
    0.0, 0.5, 0.0,
];

/// Blends red, green and blue by `t` in `[0, 1]`.
pub(crate) fn cycle_color(t: f32) -> Vec4 {
    Vec4::new(t * t, 2.0 * t * (1.0 - t), (1.0 - t) * (1.0 - t), 1.0)
}

impl Scene for Triangle {
    const NAME: &'static str = "triangle";

    fn init<D: Driver>(factory: &Factory<D>, assets: &Assets) -> Result<Self> {
        let program = factory.program_from_files(
            assets.shader("simple.vs"),
            assets.shader("uniform_color.fs"),
        )?;
        let mut layout = factory.vertex_layout()?;
        let vertices = factory.buffer_with_data(
            buffer::Kind::Array,
            buffer::Usage::StaticDraw,
            &VERTICES,
        )?;
        factory.set_attrib(&mut layout, &vertices, 0, Attribute::new(Format::F32(3), 0, 12))?;
        Ok(Self { program, layout, _vertices: vertices })
    }

    fn render<D: Driver>(&mut self, factory: &mut Factory<D>, frame: &Frame) {
        factory.clear(ClearOp::color([0.0, 0.1, 0.2, 0.0]));
        let t = frame.time.sin() * 0.5 + 0.5;
        let pass = factory.use_program(&self.program);
        pass.set_uniform("color", cycle_color(t));
        pass.draw(&self.layout, DrawCall::arrays(Primitive::Triangles, 0, 3));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_runs_from_blue_to_red() {
        assert_eq!(cycle_color(0.0), Vec4::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(cycle_color(0.5), Vec4::new(0.25, 0.5, 0.25, 1.0));
        assert_eq!(cycle_color(1.0), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }
}
