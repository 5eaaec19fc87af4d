//! Draw call dispatch.

use crate::gl;

/// Primitive topology.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Primitive {
    /// List of points.
    Points,

    /// List of line segments.
    Lines,

    /// List of triangle points.
    Triangles,
}

impl Primitive {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Primitive::Points => gl::POINTS,
            Primitive::Lines => gl::LINES,
            Primitive::Triangles => gl::TRIANGLES,
        }
    }
}

/// Draw call kind.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Draw consecutive vertices.
    Arrays,

    /// Draw through the index buffer of the vertex layout.
    Elements,
}

/// A draw call command.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DrawCall {
    /// Where the vertices/elements begin, counted in vertices or indices.
    pub offset: usize,

    /// Number of vertices/elements to draw.
    pub count: usize,

    /// The primitive topology.
    pub primitive: Primitive,

    /// Draw call kind.
    pub kind: Kind,
}

impl DrawCall {
    /// Draw `count` vertices starting at vertex `offset`.
    pub fn arrays(primitive: Primitive, offset: usize, count: usize) -> Self {
        Self { offset, count, primitive, kind: Kind::Arrays }
    }

    /// Draw `count` indices starting at index `offset`.
    pub fn elements(primitive: Primitive, offset: usize, count: usize) -> Self {
        Self { offset, count, primitive, kind: Kind::Elements }
    }
}
