//! Nearest-neighbor resampling.
//!
//! Every destination pixel copies exactly one source pixel, so discrete
//! values in height and material maps never blend.

use ndarray::{Array, Axis, RemoveAxis};

use crate::image::Pixels;

/// Source index sampled by each of the `dst` destination positions.
///
/// Destination `i` maps to source `floor((i + 0.5) * src / dst)`, the centre
/// of the destination pixel projected onto the source axis.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sample_indices(src: usize, dst: usize) -> Vec<usize> {
    if src == 0 || dst == 0 {
        return Vec::new();
    }

    let (src64, dst64) = (src as u64, dst as u64);
    (0..dst64)
        // Safe: the quotient is below src, which came from a usize
        .map(|i| (((2 * i + 1) * src64 / (2 * dst64)) as usize).min(src - 1))
        .collect()
}

/// Resample the first two axes (rows, columns) of an array.
fn select_grid<A, D>(array: &Array<A, D>, rows: &[usize], cols: &[usize]) -> Array<A, D>
where
    A: Clone,
    D: RemoveAxis,
{
    array.select(Axis(0), rows).select(Axis(1), cols)
}

/// Resize pixel planes to `width` x `height` by nearest-neighbor sampling.
///
/// Palette images are resampled on their indices; the palette is kept.
#[must_use]
pub fn resize_nearest(pixels: &Pixels, width: u32, height: u32) -> Pixels {
    let (src_rows, src_cols) = pixels.grid();
    let (dst_rows, dst_cols) = (height as usize, width as usize);

    if (src_rows, src_cols) == (dst_rows, dst_cols) {
        return pixels.clone();
    }

    let rows = sample_indices(src_rows, dst_rows);
    let cols = sample_indices(src_cols, dst_cols);

    match pixels {
        Pixels::Gray8(a) => Pixels::Gray8(select_grid(a, &rows, &cols)),
        Pixels::Gray32(a) => Pixels::Gray32(select_grid(a, &rows, &cols)),
        Pixels::Palette { indices, palette } => Pixels::Palette {
            indices: select_grid(indices, &rows, &cols),
            palette: palette.clone(),
        },
        Pixels::Rgb(a) => Pixels::Rgb(select_grid(a, &rows, &cols)),
        Pixels::Rgba(a) => Pixels::Rgba(select_grid(a, &rows, &cols)),
    }
}
