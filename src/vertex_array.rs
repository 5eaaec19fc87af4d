//! Vertex array objects.

use crate::buffer::{self, Format};
use crate::handle::{kind, Handle, Id};
use std::{cmp, fmt, hash};
use vec_map::VecMap;

/// The maximum number of vertex attributes permitted by the crate.
pub const MAX_ATTRIBUTES: u32 = 8;

/// A recorded attribute: the description plus the buffer it reads from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Binding {
    /// The vertex buffer bound when the attribute was described.
    pub buffer: Id,

    /// How the attribute is read out of the buffer.
    pub attribute: buffer::Attribute,
}

/// Corresponds to an OpenGL vertex array object.
///
/// Attribute descriptions and the index buffer are recorded through
/// [`Factory::set_attrib`] and [`Factory::set_indices`], which issue the
/// bind calls in the order the driver requires.
///
/// [`Factory::set_attrib`]: ../factory/struct.Factory.html#method.set_attrib
/// [`Factory::set_indices`]: ../factory/struct.Factory.html#method.set_indices
pub struct VertexLayout {
    /// The OpenGL vertex array object.
    handle: Handle<kind::VertexArray>,

    /// Attribute slot to description.
    attributes: VecMap<Binding>,

    /// Index buffer and element type.
    indices: Option<(Id, Format)>,
}

impl VertexLayout {
    /// Constructor.
    pub(crate) fn new(handle: Handle<kind::VertexArray>) -> Self {
        Self {
            handle,
            attributes: VecMap::new(),
            indices: None,
        }
    }

    /// Returns the OpenGL VAO ID.
    pub fn id(&self) -> Id {
        self.handle.id()
    }

    pub(crate) fn record_attribute(&mut self, slot: u32, binding: Binding) {
        self.attributes.insert(slot as usize, binding);
    }

    pub(crate) fn record_indices(&mut self, buffer: Id, format: Format) {
        self.indices = Some((buffer, format));
    }

    /// Returns the attribute recorded for a slot.
    pub fn attribute(&self, slot: u32) -> Option<&Binding> {
        self.attributes.get(slot as usize)
    }

    /// Returns the recorded attribute slots in ascending order.
    pub fn slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.attributes.keys().map(|slot| slot as u32)
    }

    /// Returns the index element type, if an index buffer is attached.
    pub fn index_format(&self) -> Option<Format> {
        self.indices.map(|(_, format)| format)
    }
}

impl cmp::Eq for VertexLayout {}

impl cmp::PartialEq<Self> for VertexLayout {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for VertexLayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("VertexLayout")
            .field("id", &self.id())
            .field("indices", &self.indices)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl hash::Hash for VertexLayout {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}
