//! Error types.

use crate::{buffer, handle};
use std::{io, path};

/// Everything that can go wrong while bringing up a window, a context or a
/// GPU resource.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The windowing library has no usable backend.
    #[error("failed to initialize windowing library: {0}")]
    LibraryInit(String),

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    WindowCreation(String),

    /// The OpenGL context could not be created or made current.
    #[error("failed to create OpenGL context: {0}")]
    ContextCreation(String),

    /// A required OpenGL entry point is missing from the function table.
    #[error("failed to load OpenGL function table: missing `{0}`")]
    FunctionTable(&'static str),

    /// A file could not be read.
    #[error("failed to read \"{}\": {source}", .path.display())]
    File {
        /// The path that was requested.
        path: path::PathBuf,

        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The driver compiler rejected a shader.
    #[error("failed to compile shader \"{name}\": {log}")]
    ShaderCompile {
        /// Shader name, usually the file it was loaded from.
        name: String,

        /// Compiler diagnostic log.
        log: String,
    },

    /// The driver linker rejected a program.
    #[error("failed to link program: {log}")]
    ProgramLink {
        /// Linker diagnostic log.
        log: String,
    },

    /// An image file could not be decoded.
    #[error("failed to decode image \"{}\": {source}", .path.display())]
    ImageDecode {
        /// The path of the image.
        path: path::PathBuf,

        /// The decoder error.
        #[source]
        source: ::image::ImageError,
    },

    /// Texture creation from an image with an unsupported channel count.
    #[error("unsupported image channel count: {0}")]
    UnsupportedChannels(u8),

    /// Pixel data whose length does not match the image dimensions.
    #[error("image data holds {actual} bytes, expected {expected}")]
    ImageSize {
        /// `width * height * channels`.
        expected: usize,

        /// The length of the data supplied.
        actual: usize,
    },

    /// The driver returned the zero handle from an allocation call.
    #[error("driver failed to allocate a {0:?} object")]
    Allocation(handle::Kind),

    /// A vertex attribute slot outside of the supported range.
    #[error("vertex attribute slot {0} out of range")]
    AttributeSlot(u32),

    /// A vertex or index format the driver cannot read.
    #[error("invalid vertex data format {0:?}")]
    AttributeFormat(buffer::Format),
}

impl Error {
    /// Process exit code for a fatal error.
    pub fn exit_code(&self) -> i32 {
        -1
    }
}

/// Crate result type.
pub type Result<T> = ::std::result::Result<T, Error>;
