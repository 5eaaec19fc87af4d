//! Compiled GLSL shader stages.

use crate::gl;
use crate::handle::{kind, Handle, Id};
use std::{cmp, fmt, hash};

/// The pipeline stage a shader object compiles for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Stage {
    /// Corresponds to `GL_VERTEX_SHADER`.
    Vertex,

    /// Corresponds to `GL_FRAGMENT_SHADER`.
    Fragment,
}

impl Stage {
    /// Returns the equivalent OpenGL shader type constant.
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Stage::Vertex => gl::VERTEX_SHADER,
            Stage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

/// A successfully compiled shader object.
///
/// Immutable once built; compile new source into a new `Shader` instead.
/// Programs hold shaders through `Rc` so one stage can be linked into many
/// programs.
pub struct Shader {
    /// The OpenGL shader object.
    handle: Handle<kind::Shader>,

    /// The stage this shader was compiled for.
    stage: Stage,

    /// Where the source came from, for diagnostics.
    name: String,
}

impl Shader {
    /// Constructor.
    pub(crate) fn new(handle: Handle<kind::Shader>, stage: Stage, name: String) -> Self {
        Self { handle, stage, name }
    }

    /// Returns the OpenGL shader ID.
    pub fn id(&self) -> Id {
        self.handle.id()
    }

    /// Returns the compiled stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Returns the name the shader was created with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl cmp::Eq for Shader {}

impl cmp::PartialEq<Self> for Shader {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Shader")
            .field("id", &self.id())
            .field("stage", &self.stage)
            .field("name", &self.name)
            .finish()
    }
}

impl hash::Hash for Shader {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}
