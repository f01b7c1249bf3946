//! Image loading utilities.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use png::{BitDepth, ColorType, Transformations};

use crate::error::{Error, Result};

use super::{cube, plane, Pixels, SourceImage, RGBA_CHANNELS, RGB_CHANNELS};

/// Load an image from disk without altering its pixel mode.
///
/// PNG files are decoded with the `png` crate so that palette indices and
/// 16-bit grayscale samples reach the pipeline untouched. 2- and 4-bit
/// grayscale is widened to 8 bits and 16-bit RGB/RGBA keeps the high byte
/// of each sample. Every other format goes through the `image` crate.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded, or if its pixel
/// layout is not supported.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<SourceImage> {
    let path = path.as_ref();

    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));

    let source = if is_png {
        load_png(path)?
    } else {
        let img = image::open(path).map_err(|source| Error::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        SourceImage::from_dynamic(img)?
    };

    tracing::debug!(
        "Loaded {} ({}x{}, mode {})",
        path.display(),
        source.width(),
        source.height(),
        source.mode()
    );

    Ok(source)
}

fn load_png(path: &Path) -> Result<SourceImage> {
    let decode_error = |source| Error::PngDecode {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(Transformations::IDENTITY);
    let mut reader = decoder.read_info().map_err(decode_error)?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(decode_error)?;
    buf.truncate(frame.buffer_size());

    let (width, height) = (frame.width as usize, frame.height as usize);
    let rows = buf.chunks(frame.line_size);

    let pixels = match (frame.color_type, frame.bit_depth) {
        (ColorType::Grayscale, BitDepth::Eight) => {
            let raw: Vec<u8> = rows.flat_map(|row| &row[..width]).copied().collect();
            Pixels::Gray8(plane((height, width), raw)?)
        }
        (ColorType::Grayscale, depth @ (BitDepth::Two | BitDepth::Four)) => {
            let bits = depth as usize;
            let raw: Vec<u8> = rows
                .flat_map(|row| unpack_indices(row, width, bits))
                .map(|v| widen_gray(v, bits))
                .collect();
            Pixels::Gray8(plane((height, width), raw)?)
        }
        (ColorType::Grayscale, BitDepth::Sixteen) => {
            let raw: Vec<u32> = rows
                .flat_map(|row| row[..width * 2].chunks_exact(2))
                .map(|b| u32::from(u16::from_be_bytes([b[0], b[1]])))
                .collect();
            Pixels::Gray32(plane((height, width), raw)?)
        }
        (ColorType::Indexed, depth) if depth != BitDepth::Sixteen => {
            let bits = depth as usize;
            let raw: Vec<u8> = rows.flat_map(|row| unpack_indices(row, width, bits)).collect();
            let palette = reader
                .info()
                .palette
                .as_deref()
                .unwrap_or_default()
                .chunks_exact(3)
                .map(|rgb| [rgb[0], rgb[1], rgb[2]])
                .collect();
            Pixels::Palette {
                indices: plane((height, width), raw)?,
                palette,
            }
        }
        (ColorType::Rgb, BitDepth::Eight) => {
            let raw: Vec<u8> = rows.flat_map(|row| &row[..width * RGB_CHANNELS]).copied().collect();
            Pixels::Rgb(cube((height, width, RGB_CHANNELS), raw)?)
        }
        (ColorType::Rgba, BitDepth::Eight) => {
            let raw: Vec<u8> = rows.flat_map(|row| &row[..width * RGBA_CHANNELS]).copied().collect();
            Pixels::Rgba(cube((height, width, RGBA_CHANNELS), raw)?)
        }
        (ColorType::Rgb, BitDepth::Sixteen) => {
            let raw = high_bytes(rows, width * RGB_CHANNELS);
            Pixels::Rgb(cube((height, width, RGB_CHANNELS), raw)?)
        }
        (ColorType::Rgba, BitDepth::Sixteen) => {
            let raw = high_bytes(rows, width * RGBA_CHANNELS);
            Pixels::Rgba(cube((height, width, RGBA_CHANNELS), raw)?)
        }
        (color, depth) => {
            return Err(Error::UnsupportedMode {
                mode: format!("{color:?} at {} bits", depth as u8),
            })
        }
    };

    Ok(SourceImage::from_pixels(pixels))
}

/// Unpack `width` palette indices of `bits` each from a packed PNG row.
///
/// Samples are stored most significant bits first.
fn unpack_indices(row: &[u8], width: usize, bits: usize) -> impl Iterator<Item = u8> + '_ {
    let per_byte = 8 / bits;
    // Safe: bits is 1, 2, 4 or 8 so the mask fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let mask = ((1_u16 << bits) - 1) as u8;

    (0..width).map(move |x| {
        let shift = 8 - bits * (x % per_byte + 1);
        (row[x / per_byte] >> shift) & mask
    })
}

/// Scale a `bits`-wide gray sample up to the full 8-bit range.
fn widen_gray(value: u8, bits: usize) -> u8 {
    // Safe: bits is 2 or 4 so the maximum fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let max = ((1_u16 << bits) - 1) as u8;
    value * (u8::MAX / max)
}

/// Keep the most significant byte of each big-endian 16-bit sample.
fn high_bytes<'a>(rows: impl Iterator<Item = &'a [u8]>, samples_per_row: usize) -> Vec<u8> {
    rows.flat_map(|row| row[..samples_per_row * 2].chunks_exact(2))
        .map(|sample| sample[0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpack_two_bit_indices() {
        // 0b00_01_10_11, 0b11_00_00_00
        let row = [0x1B, 0xC0];
        let indices: Vec<u8> = unpack_indices(&row, 5, 2).collect();

        assert_eq!(indices, vec![0, 1, 2, 3, 3]);
    }

    #[test]
    fn test_unpack_eight_bit_indices() {
        let row = [7, 250, 3];
        let indices: Vec<u8> = unpack_indices(&row, 3, 8).collect();

        assert_eq!(indices, vec![7, 250, 3]);
    }

    #[test]
    fn test_unpack_one_bit_ignores_padding() {
        let row = [0b1010_0000];
        let indices: Vec<u8> = unpack_indices(&row, 3, 1).collect();

        assert_eq!(indices, vec![1, 0, 1]);
    }

    #[test]
    fn test_widen_gray_spans_full_range() {
        assert_eq!(widen_gray(0, 2), 0);
        assert_eq!(widen_gray(1, 2), 85);
        assert_eq!(widen_gray(3, 2), 255);
        assert_eq!(widen_gray(8, 4), 136);
        assert_eq!(widen_gray(15, 4), 255);
    }

    #[test]
    fn test_high_bytes_drops_low_byte() {
        let rows = [[0x12_u8, 0x34, 0xAB, 0xCD, 0xFF, 0xFF]];
        let raw = high_bytes(rows.iter().map(|r| &r[..]), 3);

        assert_eq!(raw, vec![0x12, 0xAB, 0xFF]);
    }

    #[test]
    fn test_missing_png_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.png");

        let err = load_image(&path).unwrap_err();
        assert!(matches!(&err, Error::FileOpen { path: p, .. } if *p == path));
        assert!(err.to_string().contains("absent.png"));
    }
}
