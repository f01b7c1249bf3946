use ndarray::{Array2, Array3};
use terrain_prep::image::{OutputImage, PixelMode, Pixels, SourceImage};
use terrain_prep::{normalize_and_resize, AllowedSizes, TargetSpec};

fn explicit(width: u32, height: u32) -> TargetSpec {
    TargetSpec::Explicit { width, height }
}

fn sample_sources() -> Vec<SourceImage> {
    vec![
        SourceImage::from_pixels(Pixels::Gray8(Array2::from_shape_fn((5, 7), |(y, x)| (y * 7 + x) as u8))),
        SourceImage::from_pixels(Pixels::Gray32(Array2::from_shape_fn((5, 7), |(y, x)| (y * 1000 + x) as u32))),
        SourceImage::from_pixels(Pixels::Palette {
            indices: Array2::from_shape_fn((5, 7), |(y, x)| ((y + x) % 3) as u8),
            palette: vec![[10, 20, 30], [40, 50, 60], [70, 80, 90]],
        }),
        SourceImage::from_pixels(Pixels::Rgb(Array3::from_elem((5, 7, 3), 9))),
        SourceImage::from_pixels(Pixels::Rgba(Array3::from_elem((5, 7, 4), 9))),
    ]
}

#[test]
fn output_mode_is_always_rgb_or_rgba() {
    for source in sample_sources() {
        let output = normalize_and_resize(&source, &explicit(11, 3)).unwrap();

        assert_eq!(output.dimensions(), (11, 3));
        let expected = if source.mode() == PixelMode::Rgba {
            PixelMode::Rgba
        } else {
            PixelMode::Rgb
        };
        assert_eq!(output.mode(), expected, "source mode {}", source.mode());
    }
}

#[test]
fn nearest_size_selection_examples() {
    let sizes = AllowedSizes::new(vec![1024, 2048]).unwrap();

    assert_eq!(sizes.nearest(1500), 1024);
    assert_eq!(sizes.nearest(1800), 2048);
}

#[test]
fn gray32_stretch_spans_full_byte_range() {
    let plane = Array2::from_shape_fn((10, 101), |(_, x)| 100 + x as u32);
    let source = SourceImage::from_pixels(Pixels::Gray32(plane));

    let OutputImage::Rgb(img) = normalize_and_resize(&source, &explicit(101, 10)).unwrap() else {
        panic!("expected RGB output");
    };

    let values: Vec<u8> = img.pixels().map(|p| p.0[0]).collect();
    assert_eq!(values.iter().min(), Some(&0));
    assert_eq!(values.iter().max(), Some(&255));
    // Linear in the source value, identical across the replicated channels
    for x in 0..101_u32 {
        let pixel = img.get_pixel(x, 0).0;
        let expected = (f64::from(x) / 100.0 * 255.0) as u8;
        assert_eq!(pixel, [expected; 3]);
    }
}

#[test]
fn flat_gray32_produces_constant_image() {
    let source = SourceImage::from_pixels(Pixels::Gray32(Array2::from_elem((8, 8), 12_345)));

    let OutputImage::Rgb(img) = normalize_and_resize(&source, &explicit(16, 16)).unwrap() else {
        panic!("expected RGB output");
    };

    let first = *img.get_pixel(0, 0);
    assert!(img.pixels().all(|p| *p == first));
}

#[test]
fn renormalizing_rgb_at_same_size_is_identity() {
    let cube = Array3::from_shape_fn((6, 9, 3), |(y, x, c)| (y * 31 + x * 7 + c) as u8);
    let source = SourceImage::from_pixels(Pixels::Rgb(cube));

    let first = normalize_and_resize(&source, &explicit(9, 6)).unwrap();
    let reloaded = SourceImage::from_dynamic(first.clone().into_dynamic()).unwrap();
    let second = normalize_and_resize(&reloaded, &explicit(9, 6)).unwrap();

    assert_eq!(first, second);
    assert_eq!(reloaded.pixels(), source.pixels());
}

#[test]
fn large_palette_image_to_square_target() {
    let source = SourceImage::from_pixels(Pixels::Palette {
        indices: Array2::from_shape_fn((3000, 4000), |(y, x)| ((x / 500 + y / 500) % 2) as u8),
        palette: vec![[0, 128, 0], [139, 69, 19]],
    });

    let output = normalize_and_resize(&source, &explicit(2048, 2048)).unwrap();

    assert_eq!(output.mode(), PixelMode::Rgb);
    assert_eq!(output.dimensions(), (2048, 2048));
    let OutputImage::Rgb(img) = output else {
        unreachable!()
    };
    assert!(img.pixels().all(|p| p.0 == [0, 128, 0] || p.0 == [139, 69, 19]));
}
