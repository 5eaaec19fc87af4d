//! GPU-visible pixel container.

use crate::error::{Error, Result};
use crate::gl;
use crate::handle::{kind, Handle, Id};
use crate::sampler::Sampler;
use std::{cmp, fmt, hash};

/// Internal format of texture data.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// Corresponds to `GL_R8`.
    R8,

    /// Corresponds to `GL_RGB8`.
    Rgb8,

    /// Corresponds to `GL_RGBA8`.
    Rgba8,
}

impl Format {
    /// Picks the internal format for an image with `channels` channels.
    ///
    /// One channel is stored red-only, three as RGB and four as RGBA; any
    /// other count is rejected.
    pub fn from_channels(channels: u8) -> Result<Self> {
        match channels {
            1 => Ok(Format::R8),
            3 => Ok(Format::Rgb8),
            4 => Ok(Format::Rgba8),
            n => Err(Error::UnsupportedChannels(n)),
        }
    }

    pub(crate) fn as_gl_enum(&self) -> u32 {
        match *self {
            Format::R8 => gl::R8,
            Format::Rgb8 => gl::RGB8,
            Format::Rgba8 => gl::RGBA8,
        }
    }

    /// Returns the number of channels the format stores.
    pub fn channels(&self) -> u8 {
        match *self {
            Format::R8 => 1,
            Format::Rgb8 => 3,
            Format::Rgba8 => 4,
        }
    }
}

/// GPU-visible 2D texture.
pub struct Texture {
    /// The OpenGL texture object.
    handle: Handle<kind::Texture>,

    width: u32,
    height: u32,
    format: Format,
    mipmap: bool,
    sampler: Sampler,
}

impl Texture {
    pub(crate) fn new(
        handle: Handle<kind::Texture>,
        width: u32,
        height: u32,
        mipmap: bool,
        format: Format,
        sampler: Sampler,
    ) -> Self {
        Texture {
            handle,
            width,
            height,
            mipmap,
            format,
            sampler,
        }
    }

    /// Returns the OpenGL texture ID.
    pub fn id(&self) -> Id {
        self.handle.id()
    }

    /// Returns the internal pixel format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the number of channels the texture stores.
    pub fn channels(&self) -> u8 {
        self.format.channels()
    }

    /// Returns the width of the texture in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `true` if this texture has mipmaps.
    pub fn mipmap(&self) -> bool {
        self.mipmap
    }

    /// Returns the sampling parameters last applied.
    pub fn sampler(&self) -> Sampler {
        self.sampler
    }

    pub(crate) fn set_sampler(&mut self, sampler: Sampler) {
        self.sampler = sampler;
    }
}

impl cmp::Eq for Texture {}

impl cmp::PartialEq<Self> for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish()
    }
}

impl hash::Hash for Texture {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_counts_select_formats() {
        assert_eq!(Format::from_channels(1).unwrap(), Format::R8);
        assert_eq!(Format::from_channels(3).unwrap(), Format::Rgb8);
        assert_eq!(Format::from_channels(4).unwrap(), Format::Rgba8);
        match Format::from_channels(2) {
            Err(Error::UnsupportedChannels(2)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
