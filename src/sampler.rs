//! Texture sampling properties.

use crate::gl;

/// Texture filtering mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Filter {
    /// Nearest texel.
    Nearest,

    /// Linear filter.
    Linear,

    /// Nearest texel of the nearest mip level.
    NearestMipmapNearest,

    /// Linear filter between the two nearest mip levels.
    LinearMipmapLinear,
}

impl Filter {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Filter::Nearest => gl::NEAREST,
            Filter::Linear => gl::LINEAR,
            Filter::NearestMipmapNearest => gl::NEAREST_MIPMAP_NEAREST,
            Filter::LinearMipmapLinear => gl::LINEAR_MIPMAP_LINEAR,
        }
    }

    /// Returns `true` if the filter reads mip levels.
    pub fn uses_mipmaps(self) -> bool {
        matches!(self, Filter::NearestMipmapNearest | Filter::LinearMipmapLinear)
    }
}

/// Texture co-ordinate wrapping mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
    /// Repeat.
    Repeat,

    /// Repeat, mirroring every other tile.
    MirroredRepeat,

    /// Clamp to the edge texels.
    ClampToEdge,
}

impl Wrap {
    pub(crate) fn as_gl_enum(self) -> u32 {
        match self {
            Wrap::Repeat => gl::REPEAT,
            Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
            Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
        }
    }
}

/// Sampling properties for a 2D texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Sampler {
    /// Specifies the magnification filter.
    ///
    /// Default: `Linear`.
    pub mag_filter: Filter,

    /// Specifies the minification filter.
    ///
    /// Default: `LinearMipmapLinear`.
    pub min_filter: Filter,

    /// Specifies the wrapping mode for the S axis.
    ///
    /// Default: `ClampToEdge`.
    pub wrap_s: Wrap,

    /// Specifies the wrapping mode for the T axis.
    ///
    /// Default: `ClampToEdge`.
    pub wrap_t: Wrap,
}

impl Sampler {
    /// Same filter on both axes.
    pub fn filter(min_filter: Filter, mag_filter: Filter) -> Self {
        Self {
            min_filter,
            mag_filter,
            ..Self::default()
        }
    }

    /// Replaces both wrap modes.
    pub fn with_wrap(self, wrap_s: Wrap, wrap_t: Wrap) -> Self {
        Self { wrap_s, wrap_t, ..self }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            mag_filter: Filter::Linear,
            min_filter: Filter::LinearMipmapLinear,
            wrap_s: Wrap::ClampToEdge,
            wrap_t: Wrap::ClampToEdge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mipmap_filters_read_mip_levels() {
        assert!(Filter::LinearMipmapLinear.uses_mipmaps());
        assert!(Filter::NearestMipmapNearest.uses_mipmaps());
        assert!(!Filter::Linear.uses_mipmaps());
        assert!(!Filter::Nearest.uses_mipmaps());
    }
}
