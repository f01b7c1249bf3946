//! Resize and convert a source image into its canonical output form.

use ndarray::{Array2, Array3};

use crate::error::{Error, Result};
use crate::image::{OutputImage, Pixels, SourceImage, RGB_CHANNELS};

use super::resample::resize_nearest;
use super::size::TargetSpec;
use super::stretch::contrast_stretch;

/// Resize `source` and normalize its pixel mode.
///
/// The steps run in a fixed order:
/// 1. Pick the output size from `target`
/// 2. Resample with nearest-neighbor
/// 3. Contrast-stretch high bit-depth grayscale to 8 bits
/// 4. Expand grayscale and palette data to RGB
///
/// RGB and RGBA sources only go through the resize. A flat high bit-depth
/// image, which has no range to stretch, becomes an all-black RGB image.
///
/// # Errors
///
/// Returns an error if `target` is invalid, the source has no pixels, or the
/// resampled planes cannot be packed into an output image.
pub fn normalize_and_resize(source: &SourceImage, target: &TargetSpec) -> Result<OutputImage> {
    target.validate()?;

    let (src_width, src_height) = source.dimensions();
    if src_width == 0 || src_height == 0 {
        // Nothing to sample from, so the target size cannot be honoured
        return Err(Error::ShapeMismatch {
            expected: "at least one pixel".to_string(),
            actual: format!("{src_width}x{src_height}"),
        });
    }
    let (width, height) = target.resolve(src_width, src_height);
    tracing::debug!("Resizing {src_width}x{src_height} -> {width}x{height}");

    let resized = resize_nearest(source.pixels(), width, height);

    match resized {
        Pixels::Gray8(plane) => {
            tracing::debug!("Convert grayscale to RGB image");
            OutputImage::from_rgb(&gray_to_rgb(&plane))
        }
        Pixels::Gray32(plane) => {
            tracing::debug!("Convert 32-bit grayscale to 8-bit grayscale");
            let gray = match contrast_stretch(&plane) {
                Ok(gray) => gray,
                Err(Error::DegenerateRange { value }) => {
                    tracing::warn!("Flat grayscale image (every pixel is {value}), writing black");
                    Array2::zeros(plane.dim())
                }
                Err(err) => return Err(err),
            };
            tracing::debug!("Convert grayscale to RGB image");
            OutputImage::from_rgb(&gray_to_rgb(&gray))
        }
        Pixels::Palette { indices, palette } => {
            tracing::debug!("Convert palette image to RGB image");
            OutputImage::from_rgb(&palette_to_rgb(&indices, &palette))
        }
        Pixels::Rgb(cube) => OutputImage::from_rgb(&cube),
        Pixels::Rgba(cube) => OutputImage::from_rgba(&cube),
    }
}

/// Replicate a gray plane into three identical channels.
fn gray_to_rgb(plane: &Array2<u8>) -> Array3<u8> {
    let (rows, cols) = plane.dim();
    Array3::from_shape_fn((rows, cols, RGB_CHANNELS), |(y, x, _)| plane[[y, x]])
}

/// Look every index up in the palette. Indices past the end read as black.
fn palette_to_rgb(indices: &Array2<u8>, palette: &[[u8; 3]]) -> Array3<u8> {
    let (rows, cols) = indices.dim();
    Array3::from_shape_fn((rows, cols, RGB_CHANNELS), |(y, x, c)| {
        palette
            .get(usize::from(indices[[y, x]]))
            .map_or(0, |rgb| rgb[c])
    })
}
