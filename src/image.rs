//! CPU-visible pixel container.

use crate::error::{Error, Result};
use crate::gl;
use std::fmt;
use std::path::Path;

/// Client-side pixel layout, every channel an unsigned 8-bit integer.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// `[R; R; R; R; R, ...]`
    R,

    /// `[R, G; R, G; R, ...]`
    Rg,

    /// `[R, G, B; R, G, ...]`
    Rgb,

    /// `[R, G, B, A; R, ...]`
    Rgba,
}

impl Format {
    /// Returns the pixel layout for a channel count in `1..=4`.
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(Format::R),
            2 => Some(Format::Rg),
            3 => Some(Format::Rgb),
            4 => Some(Format::Rgba),
            _ => None,
        }
    }

    /// Returns `(type, format)` as passed to `glTexImage2D`.
    pub(crate) fn as_gl_enums(&self) -> (u32, u32) {
        match *self {
            Format::R => (gl::UNSIGNED_BYTE, gl::RED),
            Format::Rg => (gl::UNSIGNED_BYTE, gl::RG),
            Format::Rgb => (gl::UNSIGNED_BYTE, gl::RGB),
            Format::Rgba => (gl::UNSIGNED_BYTE, gl::RGBA),
        }
    }
}

/// Decoded pixel data.
///
/// Row zero is the bottom row, which is what `glTexImage2D` expects.
#[derive(Clone, Eq, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Image {
    /// Decodes an image file, flipping it so the first row is the bottom.
    ///
    /// 16-bit and floating point images are converted to 8 bits per
    /// channel, keeping the channel count of the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let decoded = ::image::open(path).map_err(|source| {
            error!("failed to load image: \"{}\"", path.display());
            match source {
                ::image::ImageError::IoError(source) => Error::File {
                    path: path.to_owned(),
                    source,
                },
                source => Error::ImageDecode {
                    path: path.to_owned(),
                    source,
                },
            }
        })?;
        let decoded = decoded.flipv();
        let channels = decoded.color().channel_count();
        let (width, height, data) = match channels {
            1 => {
                let buffer = decoded.into_luma8();
                (buffer.width(), buffer.height(), buffer.into_raw())
            }
            2 => {
                let buffer = decoded.into_luma_alpha8();
                (buffer.width(), buffer.height(), buffer.into_raw())
            }
            3 => {
                let buffer = decoded.into_rgb8();
                (buffer.width(), buffer.height(), buffer.into_raw())
            }
            _ => {
                let buffer = decoded.into_rgba8();
                (buffer.width(), buffer.height(), buffer.into_raw())
            }
        };
        let channels = channels.min(4);
        info!(
            "image: \"{}\" ({}x{}, {} channels)",
            path.display(),
            width,
            height,
            channels,
        );
        Ok(Self { width, height, channels, data })
    }

    /// Wraps raw pixel data, bottom row first.
    pub fn from_pixels(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if Format::from_channels(channels).is_none() {
            return Err(Error::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(Error::ImageSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, channels, data })
    }

    /// An image filled with one color. The channel count is `color.len()`.
    pub fn solid(width: u32, height: u32, color: &[u8]) -> Result<Self> {
        let pixels = width as usize * height as usize;
        let data = color.iter().cloned().cycle().take(pixels * color.len()).collect();
        Self::from_pixels(width, height, color.len() as u8, data)
    }

    /// An RGBA checkerboard with square cells of `cell` pixels, alternating
    /// between black and white.
    pub fn checker(width: u32, height: u32, cell: u32) -> Self {
        let cell = cell.max(1);
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0 .. height {
            for x in 0 .. width {
                let value = if (x / cell + y / cell) % 2 == 0 { 255 } else { 0 };
                data.extend_from_slice(&[value, value, value, 255]);
            }
        }
        Self {
            width,
            height,
            channels: 4,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of channels per pixel.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Client pixel layout.
    pub fn format(&self) -> Format {
        Format::from_channels(self.channels).unwrap_or(Format::Rgba)
    }

    /// Tightly packed pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_repeats_the_color() {
        let image = Image::solid(2, 2, &[255, 0, 0, 255]).unwrap();
        assert_eq!(image.channels(), 4);
        assert_eq!(image.data().len(), 16);
        assert!(image.data().chunks(4).all(|px| px == [255, 0, 0, 255]));
    }

    #[test]
    fn checker_alternates_cells() {
        let image = Image::checker(4, 4, 2);
        let at = |x: usize, y: usize| image.data()[(y * 4 + x) * 4];
        assert_eq!(at(0, 0), 255);
        assert_eq!(at(2, 0), 0);
        assert_eq!(at(0, 2), 0);
        assert_eq!(at(3, 3), 255);
    }

    #[test]
    fn pixel_data_must_match_dimensions() {
        match Image::from_pixels(2, 2, 3, vec![0; 11]) {
            Err(Error::ImageSize { expected: 12, actual: 11 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        match Image::from_pixels(1, 1, 5, vec![0; 5]) {
            Err(Error::UnsupportedChannels(5)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_a_file_error() {
        match Image::load("does/not/exist.png") {
            Err(Error::File { .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
