//! Image saving utilities.

use std::path::Path;

use image::ImageFormat;

use crate::error::{Error, Result};

use super::OutputImage;

/// Save a normalized image as PNG.
///
/// The encoding is always PNG, whatever extension `path` carries, so a
/// converted `.jpg` keeps its name but holds lossless data.
///
/// # Errors
///
/// Returns an error if the image cannot be encoded or written.
pub fn save_png<P: AsRef<Path>>(output: &OutputImage, path: P) -> Result<()> {
    let path = path.as_ref();

    let saved = match output {
        OutputImage::Rgb(img) => img.save_with_format(path, ImageFormat::Png),
        OutputImage::Rgba(img) => img.save_with_format(path, ImageFormat::Png),
    };

    saved.map_err(|source| Error::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}
