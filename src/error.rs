//! Custom error types for terrain-prep.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the terrain-prep library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load an image file through the `image` crate.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to open an input file.
    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode a PNG file.
    #[error("failed to decode PNG {path}: {source}")]
    PngDecode {
        path: PathBuf,
        #[source]
        source: png::DecodingError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The source pixel layout is not one of L, I, P, RGB or RGBA.
    #[error("unsupported image mode: {mode}")]
    UnsupportedMode { mode: String },

    /// Contrast stretch over a plane whose minimum equals its maximum.
    #[error("cannot stretch a flat image (every pixel is {value})")]
    DegenerateRange { value: u32 },

    /// Failed to create an output directory.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to list a directory.
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pixel buffer does not match the declared dimensions.
    #[error("pixel buffer shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

impl Error {
    /// Whether the error only concerns the image being processed.
    ///
    /// Batch runs log recoverable errors and move on to the next file.
    /// Anything else points at a bad configuration and stops the run.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidParameter { .. })
    }
}

/// Result type alias for terrain-prep operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_file_errors_are_recoverable() {
        assert!(Error::UnsupportedMode { mode: "LA".to_string() }.is_recoverable());
        assert!(Error::DegenerateRange { value: 7 }.is_recoverable());
        assert!(Error::Io(std::io::Error::other("boom")).is_recoverable());
    }

    #[test]
    fn test_invalid_parameter_is_fatal() {
        let err = Error::InvalidParameter {
            name: "sizes".to_string(),
            reason: "must not be empty".to_string(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "invalid parameter sizes: must not be empty");
    }
}
