//! GPU buffer management.

use crate::gl;
use crate::handle::{kind, Handle, Id};
use std::{cmp, fmt, hash};

#[doc(inline)]
pub use self::format::Format;

/// Determines what the buffer may be used for.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Kind {
    /// Vertex data, corresponds to `GL_ARRAY_BUFFER`.
    Array,

    /// Index data, corresponds to `GL_ELEMENT_ARRAY_BUFFER`.
    Index,
}

impl Kind {
    /// Returns the equivalent OpenGL target enumeration constant.
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Kind::Array => gl::ARRAY_BUFFER,
            Kind::Index => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// A buffer data usage hint.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Usage {
    /// Corresponds to `GL_STATIC_DRAW`.
    StaticDraw,

    /// Corresponds to `GL_DYNAMIC_DRAW`.
    DynamicDraw,

    /// Corresponds to `GL_STREAM_DRAW`.
    StreamDraw,
}

impl Usage {
    /// Returns the equivalent OpenGL usage enumeration constant.
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Usage::StaticDraw => gl::STATIC_DRAW,
            Usage::DynamicDraw => gl::DYNAMIC_DRAW,
            Usage::StreamDraw => gl::STREAM_DRAW,
        }
    }
}

/// A contiguous region of GPU memory.
pub struct Buffer {
    /// The OpenGL buffer object.
    handle: Handle<kind::Buffer>,

    /// The type of buffer, e.g. a vertex buffer.
    kind: Kind,

    /// The number of bytes held by the buffer.
    size: usize,

    /// Data usage hint.
    usage: Usage,
}

impl Buffer {
    /// Constructor.
    pub(crate) fn new(
        handle: Handle<kind::Buffer>,
        kind: Kind,
        usage: Usage,
    ) -> Self {
        Self {
            handle,
            kind,
            size: 0,
            usage,
        }
    }

    /// Returns the OpenGL buffer ID.
    pub fn id(&self) -> Id {
        self.handle.id()
    }

    /// Sets the buffer size.
    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    /// Returns the buffer kind.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the number of bytes this buffer contains.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the buffer data usage hint.
    pub fn usage(&self) -> Usage {
        self.usage
    }
}

impl cmp::PartialEq<Self> for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl cmp::Eq for Buffer {}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("id", &self.id())
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("usage", &self.usage)
            .finish()
    }
}

impl hash::Hash for Buffer {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

/// How one vertex attribute is read out of a vertex buffer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Attribute {
    /// The element type, component count and normalization.
    pub format: Format,

    /// The number of bytes into the buffer the first element starts at.
    pub offset: usize,

    /// The number of bytes between consecutive elements.
    pub stride: usize,
}

impl Attribute {
    /// Constructor.
    pub fn new(format: Format, offset: usize, stride: usize) -> Self {
        Self { format, offset, stride }
    }
}

/// Buffer format descriptors.
pub mod format {
    use crate::gl;

    /// Describes the data format of an individual item in a buffer. The
    /// value is the component count.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub enum Format {
        /// 32-bit floating point number.
        F32(u8),

        /// Signed 32-bit integer.
        I32(u8),

        /// Unsigned 8-bit integer.
        U8(u8),

        /// Unsigned normalized 8-bit rational.
        U8Norm(u8),

        /// Unsigned 16-bit integer.
        U16(u8),

        /// Unsigned 32-bit integer.
        U32(u8),
    }

    impl Format {
        /// Returns the corresponding GL data type enumeration constant.
        pub(crate) fn gl_data_type(self) -> u32 {
            match self {
                Format::F32(_) => gl::FLOAT,
                Format::I32(_) => gl::INT,
                Format::U8(_) | Format::U8Norm(_) => gl::UNSIGNED_BYTE,
                Format::U16(_) => gl::UNSIGNED_SHORT,
                Format::U32(_) => gl::UNSIGNED_INT,
            }
        }

        /// Returns true if this is a normalized type.
        pub fn norm(self) -> bool {
            matches!(self, Format::U8Norm(_))
        }

        /// Returns the number of components, or `None` outside `1..=4`.
        pub fn size(self) -> Option<usize> {
            let size = match self {
                Format::F32(size) => size,
                Format::I32(size) => size,
                Format::U8(size) => size,
                Format::U8Norm(size) => size,
                Format::U16(size) => size,
                Format::U32(size) => size,
            };
            match size {
                1 ..= 4 => Some(size as usize),
                _ => None,
            }
        }

        /// Returns the number of bytes of one component.
        pub fn component_bytes(self) -> usize {
            match self {
                Format::U8(_) | Format::U8Norm(_) => 1,
                Format::U16(_) => 2,
                Format::F32(_) | Format::I32(_) | Format::U32(_) => 4,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_sizes() {
        assert_eq!(Format::F32(3).size(), Some(3));
        assert_eq!(Format::F32(5).size(), None);
        assert_eq!(Format::U16(1).component_bytes(), 2);
        assert!(Format::U8Norm(4).norm());
        assert!(!Format::U8(4).norm());
    }
}
