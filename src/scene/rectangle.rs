use super::{Frame, Scene};
use crate::buffer::{self, Attribute, Buffer, Format};
use crate::draw_call::{DrawCall, Primitive};
use crate::driver::Driver;
use crate::error::Result;
use crate::factory::Factory;
use crate::pipeline::ClearOp;
use crate::program::Program;
use crate::shader::Stage;
use crate::util::Assets;
use crate::vertex_array::VertexLayout;
use std::mem;

/// An indexed quad with a color per corner.
pub struct Rectangle {
    program: Program,
    layout: VertexLayout,
    _vertices: Buffer,
    _indices: Buffer,
}

/// Position then color, per corner.
const VERTICES: [f32; 24] = [
    0.5, 0.5, 0.0, 1.0, 0.0, 0.0, // top right, red
    0.5, -0.5, 0.0, 0.0, 1.0, 0.0, // bottom right, green
    -0.5, -0.5, 0.0, 0.0, 0.0, 1.0, // bottom left, blue
    -0.5, 0.5, 0.0, 1.0, 1.0, 0.0, // top left, yellow
];

const INDICES: [u32; 6] = [
    0, 1, 3,
    1, 2, 3,
];

impl Scene for Rectangle {
    const NAME: &'static str = "rectangle";

    fn init<D: Driver>(factory: &Factory<D>, assets: &Assets) -> Result<Self> {
        let mut layout = factory.vertex_layout()?;
        let vertices = factory.buffer_with_data(
            buffer::Kind::Array,
            buffer::Usage::StaticDraw,
            &VERTICES,
        )?;
        let stride = 6 * mem::size_of::<f32>();
        factory.set_attrib(&mut layout, &vertices, 0, Attribute::new(Format::F32(3), 0, stride))?;
        factory.set_attrib(
            &mut layout,
            &vertices,
            1,
            Attribute::new(Format::F32(3), 3 * mem::size_of::<f32>(), stride),
        )?;
        let indices = factory.buffer_with_data(
            buffer::Kind::Index,
            buffer::Usage::StaticDraw,
            &INDICES,
        )?;
        factory.set_indices(&mut layout, &indices, Format::U32(1))?;

        let vs = factory.shader_from_file(Stage::Vertex, assets.shader("per_vertex_color.vs"))?;
        let fs = factory.shader_from_file(Stage::Fragment, assets.shader("per_vertex_color.fs"))?;
        info!("vertex shader id: {}", vs.id());
        info!("fragment shader id: {}", fs.id());

        let program = factory.program(&[fs, vs])?;
        info!("program id: {}", program.id());

        Ok(Self {
            program,
            layout,
            _vertices: vertices,
            _indices: indices,
        })
    }

    fn render<D: Driver>(&mut self, factory: &mut Factory<D>, _frame: &Frame) {
        factory.clear(ClearOp::color([0.0, 0.1, 0.2, 0.3]));
        let pass = factory.use_program(&self.program);
        pass.draw(&self.layout, DrawCall::elements(Primitive::Triangles, 0, INDICES.len()));
    }
}
