use super::{Frame, Scene};
use crate::buffer::{self, Attribute, Buffer, Format};
use crate::draw_call::{DrawCall, Primitive};
use crate::driver::Driver;
use crate::error::Result;
use crate::factory::Factory;
use crate::pipeline::{ClearOp, State};
use crate::program::Program;
use crate::util::Assets;
use crate::vertex_array::VertexLayout;

/// One point in the middle of the window, drawn with a program that has no
/// uniforms.
pub struct Point {
    program: Program,
    layout: VertexLayout,
    _vertices: Buffer,
}

const POINT_SIZE: f32 = 10.0;

impl Scene for Point {
    const NAME: &'static str = "point";

    fn init<D: Driver>(factory: &Factory<D>, assets: &Assets) -> Result<Self> {
        let program = factory.program_from_files(
            assets.shader("point.vs"),
            assets.shader("point.fs"),
        )?;
        info!("program id: {}", program.id());

        let mut layout = factory.vertex_layout()?;
        let vertices = factory.buffer_with_data(
            buffer::Kind::Array,
            buffer::Usage::StaticDraw,
            &[0.0f32, 0.0, 0.0],
        )?;
        factory.set_attrib(&mut layout, &vertices, 0, Attribute::new(Format::F32(3), 0, 12))?;

        Ok(Self { program, layout, _vertices: vertices })
    }

    fn render<D: Driver>(&mut self, factory: &mut Factory<D>, _frame: &Frame) {
        factory.clear(ClearOp::color([0.1, 0.2, 0.3, 0.0]));
        factory.set_state(&State { point_size: POINT_SIZE, ..State::default() });
        let pass = factory.use_program(&self.program);
        pass.draw(&self.layout, DrawCall::arrays(Primitive::Points, 0, 1));
    }
}
