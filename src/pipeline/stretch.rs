//! Contrast stretch of high bit-depth grayscale down to 8 bits.

use ndarray::Array2;

use crate::error::{Error, Result};

/// Linearly map the plane's `[min, max]` range onto `[0, 255]`.
///
/// Each sample becomes `(v - min) / (max - min) * 255`, truncated toward
/// zero and clamped into 8 bits.
///
/// # Errors
///
/// Returns [`Error::DegenerateRange`] when every sample has the same value
/// (including an empty plane, reported with value 0), since the range is
/// then zero wide.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn contrast_stretch(plane: &Array2<u32>) -> Result<Array2<u8>> {
    let (min, max) = plane
        .iter()
        .fold(None, |acc: Option<(u32, u32)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0, 0));

    if min == max {
        return Err(Error::DegenerateRange { value: min });
    }

    let (min, range) = (f64::from(min), f64::from(max - min));
    // Safe: clamped to [0, 255] before casting
    Ok(plane.mapv(|v| ((f64::from(v) - min) / range * 255.0).clamp(0.0, 255.0) as u8))
}
