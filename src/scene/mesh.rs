//! Indexed triangle meshes shared by the cube scenes.

use crate::buffer::{self, Attribute, Buffer, Format};
use crate::draw_call::{DrawCall, Primitive};
use crate::driver::Driver;
use crate::error::Result;
use crate::factory::Factory;
use crate::pipeline::Pass;
use crate::vertex_array::VertexLayout;
use glam::Vec3;
use std::mem;

/// Interleaved vertex: position in slot 0, normal in slot 1, texture
/// co-ordinates in slot 2.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// GPU-resident vertices and indices with their layout.
pub struct Mesh {
    layout: VertexLayout,
    vertices: Buffer,
    indices: Buffer,
    count: usize,
}

impl Mesh {
    /// Uploads vertices and `u32` indices.
    pub fn new<D: Driver>(factory: &Factory<D>, vertices: &[Vertex], indices: &[u32]) -> Result<Self> {
        let mut layout = factory.vertex_layout()?;
        let vertex_buffer = factory.buffer_with_data(
            buffer::Kind::Array,
            buffer::Usage::StaticDraw,
            vertices,
        )?;
        let index_buffer = factory.buffer_with_data(
            buffer::Kind::Index,
            buffer::Usage::StaticDraw,
            indices,
        )?;

        let stride = mem::size_of::<Vertex>();
        let attributes = [
            Attribute::new(Format::F32(3), mem::offset_of!(Vertex, position), stride),
            Attribute::new(Format::F32(3), mem::offset_of!(Vertex, normal), stride),
            Attribute::new(Format::F32(2), mem::offset_of!(Vertex, tex_coord), stride),
        ];
        for (slot, attribute) in attributes.iter().enumerate() {
            factory.set_attrib(&mut layout, &vertex_buffer, slot as u32, *attribute)?;
        }
        factory.set_indices(&mut layout, &index_buffer, Format::U32(1))?;

        Ok(Self {
            layout,
            vertices: vertex_buffer,
            indices: index_buffer,
            count: indices.len(),
        })
    }

    /// Unit cube centred on the origin, four vertices per face so every
    /// face has its own normal and full texture.
    pub fn cube<D: Driver>(factory: &Factory<D>) -> Result<Self> {
        let (vertices, indices) = cube();
        Self::new(factory, &vertices, &indices)
    }

    /// Returns the vertex layout.
    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    /// Returns the vertex buffer.
    pub fn vertices(&self) -> &Buffer {
        &self.vertices
    }

    /// Returns the index buffer.
    pub fn indices(&self) -> &Buffer {
        &self.indices
    }

    /// Number of indices drawn.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Draws every triangle with the program of `pass`.
    pub fn draw<D: Driver>(&self, pass: &Pass<D>) {
        pass.draw(&self.layout, DrawCall::elements(Primitive::Triangles, 0, self.count));
    }
}

/// Builds the cube vertices and indices, counter-clockwise from outside.
fn cube() -> (Vec<Vertex>, Vec<u32>) {
    // (normal, u axis, v axis) with u cross v == normal.
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in faces.iter() {
        let base = vertices.len() as u32;
        for (a, b) in corners.iter() {
            let position = (*normal + *u * *a + *v * *b) * 0.5;
            vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
                tex_coord: [(a + 1.0) * 0.5, (b + 1.0) * 0.5],
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_faces_wind_outwards() {
        let (vertices, indices) = cube();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for triangle in indices.chunks(3) {
            let p = |i: u32| Vec3::from(vertices[i as usize].position);
            let normal = Vec3::from(vertices[triangle[0] as usize].normal);
            let face = (p(triangle[1]) - p(triangle[0])).cross(p(triangle[2]) - p(triangle[0]));
            assert!(face.dot(normal) > 0.0);
        }
    }

    #[test]
    fn cube_mesh_uploads_interleaved_vertices() {
        let factory = Factory::new(crate::headless::Driver::new());
        let mesh = Mesh::cube(&factory).unwrap();
        assert_eq!(mesh.vertices().size(), 24 * mem::size_of::<Vertex>());
        assert_eq!(mesh.indices().size(), 36 * mem::size_of::<u32>());
        assert_eq!(mesh.count(), 36);
        assert_eq!(mesh.layout().slots().collect::<Vec<_>>(), [0, 1, 2]);
        assert_eq!(mesh.layout().index_format(), Some(Format::U32(1)));
        assert_eq!(factory.driver().element_buffer(mesh.layout().id()), mesh.indices().id());
        for slot in mesh.layout().slots() {
            let attrib = factory.driver().attribute(mesh.layout().id(), slot).unwrap();
            assert_eq!(attrib.buffer, mesh.vertices().id());
            assert_eq!(attrib.stride, 32);
        }
    }

    #[test]
    fn vertices_are_tightly_packed() {
        assert_eq!(mem::size_of::<Vertex>(), 32);
        assert_eq!(mem::offset_of!(Vertex, tex_coord), 24);
    }
}
