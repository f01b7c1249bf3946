//! Image data model, loading and saving.
//!
//! Source pixels live in row-major `ndarray` planes indexed `[row, column]`
//! (plus a trailing channel axis for RGB and RGBA), which keeps resampling a
//! matter of selecting rows and columns.

mod load;
mod save;

pub use load::load_image;
pub use save::save_png;

use std::fmt;

use image::{DynamicImage, RgbImage, RgbaImage};
use ndarray::{Array2, Array3};

use crate::error::{Error, Result};

/// Number of channels in RGB images.
pub const RGB_CHANNELS: usize = 3;

/// Number of channels in RGBA images.
pub const RGBA_CHANNELS: usize = 4;

/// Pixel layouts accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelMode {
    /// 8-bit grayscale.
    Grayscale8,
    /// High bit-depth grayscale (16-bit PNG data widened to 32 bits).
    Grayscale32,
    /// 8-bit palette indices.
    Palette,
    /// 8-bit RGB.
    Rgb,
    /// 8-bit RGB with alpha.
    Rgba,
}

impl PixelMode {
    /// Conventional short name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Grayscale8 => "L",
            Self::Grayscale32 => "I",
            Self::Palette => "P",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded pixel planes of a source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pixels {
    Gray8(Array2<u8>),
    Gray32(Array2<u32>),
    Palette {
        indices: Array2<u8>,
        palette: Vec<[u8; 3]>,
    },
    /// Shape `(height, width, 3)`.
    Rgb(Array3<u8>),
    /// Shape `(height, width, 4)`.
    Rgba(Array3<u8>),
}

impl Pixels {
    /// The mode these pixels are stored in.
    #[must_use]
    pub const fn mode(&self) -> PixelMode {
        match self {
            Self::Gray8(_) => PixelMode::Grayscale8,
            Self::Gray32(_) => PixelMode::Grayscale32,
            Self::Palette { .. } => PixelMode::Palette,
            Self::Rgb(_) => PixelMode::Rgb,
            Self::Rgba(_) => PixelMode::Rgba,
        }
    }

    /// `(rows, columns)` of the pixel grid.
    #[must_use]
    pub fn grid(&self) -> (usize, usize) {
        match self {
            Self::Gray8(a) | Self::Palette { indices: a, .. } => a.dim(),
            Self::Gray32(a) => a.dim(),
            Self::Rgb(a) | Self::Rgba(a) => {
                let (rows, cols, _) = a.dim();
                (rows, cols)
            }
        }
    }
}

/// A decoded input image. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pixels: Pixels,
}

impl SourceImage {
    /// Wrap already decoded pixel planes.
    #[must_use]
    pub const fn from_pixels(pixels: Pixels) -> Self {
        Self { pixels }
    }

    /// Convert an image decoded by the `image` crate.
    ///
    /// 16-bit grayscale is widened to [`PixelMode::Grayscale32`]; 16-bit RGB
    /// and RGBA are reduced to 8 bits per channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMode`] for any layout other than 8- or
    /// 16-bit gray, RGB or RGBA.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self> {
        let (width, height) = (img.width() as usize, img.height() as usize);
        let pixels = match img {
            DynamicImage::ImageLuma8(buf) => Pixels::Gray8(plane((height, width), buf.into_raw())?),
            DynamicImage::ImageLuma16(buf) => {
                let widened: Vec<u32> = buf.into_raw().into_iter().map(u32::from).collect();
                Pixels::Gray32(plane((height, width), widened)?)
            }
            DynamicImage::ImageRgb8(buf) => {
                Pixels::Rgb(cube((height, width, RGB_CHANNELS), buf.into_raw())?)
            }
            DynamicImage::ImageRgba8(buf) => {
                Pixels::Rgba(cube((height, width, RGBA_CHANNELS), buf.into_raw())?)
            }
            rgb16 @ DynamicImage::ImageRgb16(_) => {
                Pixels::Rgb(cube((height, width, RGB_CHANNELS), rgb16.to_rgb8().into_raw())?)
            }
            rgba16 @ DynamicImage::ImageRgba16(_) => {
                Pixels::Rgba(cube((height, width, RGBA_CHANNELS), rgba16.to_rgba8().into_raw())?)
            }
            other => {
                return Err(Error::UnsupportedMode {
                    mode: format!("{:?}", other.color()),
                })
            }
        };
        Ok(Self { pixels })
    }

    /// Pixel planes of the image.
    #[must_use]
    pub const fn pixels(&self) -> &Pixels {
        &self.pixels
    }

    /// Take ownership of the pixel planes.
    #[must_use]
    pub fn into_pixels(self) -> Pixels {
        self.pixels
    }

    #[must_use]
    pub const fn mode(&self) -> PixelMode {
        self.pixels.mode()
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u32 {
        // Safe: planes are only ever built from u32 dimensions
        self.pixels.grid().1 as u32
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u32 {
        self.pixels.grid().0 as u32
    }

    /// `(width, height)` in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// A normalized image ready to be written.
///
/// Only 8-bit RGB and RGBA exist here; palette and high bit-depth gray are
/// always converted before an `OutputImage` is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputImage {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl OutputImage {
    /// Build an RGB image from a `(height, width, 3)` array.
    ///
    /// # Errors
    ///
    /// Returns an error if the array does not have three channels.
    pub fn from_rgb(array: &Array3<u8>) -> Result<Self> {
        let (width, height) = channel_dims(array, RGB_CHANNELS)?;
        let raw = array.iter().copied().collect();
        RgbImage::from_raw(width, height, raw)
            .map(Self::Rgb)
            .ok_or_else(|| shape_mismatch(width, height, RGB_CHANNELS, array))
    }

    /// Build an RGBA image from a `(height, width, 4)` array.
    ///
    /// # Errors
    ///
    /// Returns an error if the array does not have four channels.
    pub fn from_rgba(array: &Array3<u8>) -> Result<Self> {
        let (width, height) = channel_dims(array, RGBA_CHANNELS)?;
        let raw = array.iter().copied().collect();
        RgbaImage::from_raw(width, height, raw)
            .map(Self::Rgba)
            .ok_or_else(|| shape_mismatch(width, height, RGBA_CHANNELS, array))
    }

    #[must_use]
    pub const fn mode(&self) -> PixelMode {
        match self {
            Self::Rgb(_) => PixelMode::Rgb,
            Self::Rgba(_) => PixelMode::Rgba,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        match self {
            Self::Rgb(img) => img.width(),
            Self::Rgba(img) => img.width(),
        }
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        match self {
            Self::Rgb(img) => img.height(),
            Self::Rgba(img) => img.height(),
        }
    }

    /// `(width, height)` in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    #[must_use]
    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Self::Rgb(img) => DynamicImage::ImageRgb8(img),
            Self::Rgba(img) => DynamicImage::ImageRgba8(img),
        }
    }
}

fn plane<T>(shape: (usize, usize), raw: Vec<T>) -> Result<Array2<T>> {
    let actual = raw.len();
    Array2::from_shape_vec(shape, raw).map_err(|_| Error::ShapeMismatch {
        expected: format!("{}x{} samples", shape.1, shape.0),
        actual: format!("{actual} samples"),
    })
}

fn cube(shape: (usize, usize, usize), raw: Vec<u8>) -> Result<Array3<u8>> {
    let actual = raw.len();
    Array3::from_shape_vec(shape, raw).map_err(|_| Error::ShapeMismatch {
        expected: format!("{}x{}x{} samples", shape.1, shape.0, shape.2),
        actual: format!("{actual} samples"),
    })
}

#[allow(clippy::cast_possible_truncation)]
fn channel_dims(array: &Array3<u8>, channels: usize) -> Result<(u32, u32)> {
    let (rows, cols, depth) = array.dim();
    if depth != channels {
        return Err(Error::ShapeMismatch {
            expected: format!("{channels} channels"),
            actual: format!("{depth} channels"),
        });
    }
    Ok((cols as u32, rows as u32))
}

fn shape_mismatch(width: u32, height: u32, channels: usize, array: &Array3<u8>) -> Error {
    Error::ShapeMismatch {
        expected: format!("{width}x{height}x{channels}"),
        actual: format!("{:?}", array.shape()),
    }
}
