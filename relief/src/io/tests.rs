use std::fs::File;
use std::io::BufWriter;

use image::{ImageBuffer, Rgb};
use tiff::encoder::{TiffEncoder, colortype};

use super::*;
use crate::test_utils::ScratchDir;

fn write_rgb16_png(path: &Path, width: u32, height: u32) {
    ImageBuffer::<Rgb<u16>, Vec<u16>>::from_pixel(width, height, Rgb([32768, 32768, 65535]))
        .save(path)
        .unwrap();
}

fn write_gray8_tiff(path: &Path, width: u32, height: u32, samples: &[u8]) {
    let mut writer = BufWriter::new(File::create(path).unwrap());
    TiffEncoder::new(&mut writer)
        .unwrap()
        .write_image::<colortype::Gray8>(width, height, samples)
        .unwrap();
}

fn write_rgb8_tiff(path: &Path, width: u32, height: u32, samples: &[u8]) {
    let mut writer = BufWriter::new(File::create(path).unwrap());
    TiffEncoder::new(&mut writer)
        .unwrap()
        .write_image::<colortype::RGB8>(width, height, samples)
        .unwrap();
}

#[test]
fn test_png_decoding_ignores_default_memory_limits() {
    let scratch = ScratchDir::new("png_limits");
    let path = scratch.path().join("n.png");
    write_rgb16_png(&path, 64, 64);

    // A tight budget rejects the same file the loader accepts.
    let mut tight = image::Limits::default();
    tight.max_alloc = Some(1024);
    let err = load_png_jpeg_with_limits(&path, tight).unwrap_err();
    assert!(
        matches!(
            err,
            ImageIoError::Image {
                source: image::ImageError::Limits(_),
                ..
            }
        ),
        "{err}"
    );

    let raw = load_raw(&path).unwrap();
    assert_eq!((raw.width, raw.height), (64, 64));
    assert_eq!(raw.bit_depth, 16);
    assert_eq!(raw.channel_count, 3);
}

#[test]
#[ignore] // Allocates about 1 GiB - run with --ignored
fn test_load_capture_beyond_default_alloc_limit() {
    let scratch = ScratchDir::new("png_large");
    let path = scratch.path().join("big.png");
    write_rgb16_png(&path, 9500, 9500);

    let raw = load_raw(&path).unwrap();
    assert_eq!((raw.width, raw.height), (9500, 9500));
    assert_eq!(raw.samples.len(), 9500 * 9500 * 3);
}

#[test]
fn test_load_gray8_tiff() {
    let scratch = ScratchDir::new("gray8_tiff");
    let path = scratch.path().join("g.tif");
    let samples: Vec<u8> = (0..4 * 3).map(|i| (i * 20) as u8).collect();
    write_gray8_tiff(&path, 4, 3, &samples);

    let raw = load_raw(&path).unwrap();

    assert_eq!((raw.width, raw.height), (4, 3));
    assert_eq!(raw.bit_depth, 8);
    assert_eq!(raw.channel_count, 1);
    assert_eq!(raw.samples, Samples::U8(samples));
}

#[test]
fn test_load_gray16_tiff_written_by_save() {
    let scratch = ScratchDir::new("gray16_tiff");
    let path = scratch.path().join("g16.TIFF");
    let samples: Vec<u16> = vec![0, 1, 32768, 65535, 12345, 54321];
    let written = RawImage::new_u16(3, 2, 1, samples);
    save_tiff16(&written, &path).unwrap();

    let raw = load_raw(&path).unwrap();

    assert_eq!(raw, written);
}

#[test]
fn test_load_rgb8_tiff_keeps_channel_order() {
    let scratch = ScratchDir::new("rgb8_tiff");
    let path = scratch.path().join("c.tif");
    let samples: Vec<u8> = vec![255, 0, 128, 0, 255, 64];
    write_rgb8_tiff(&path, 2, 1, &samples);

    let raw = load_raw(&path).unwrap();

    assert_eq!(raw.bit_depth, 8);
    assert_eq!(raw.channel_count, 3);
    assert_eq!(raw.samples, Samples::U8(samples));
}

#[test]
fn test_unknown_extension_is_rejected() {
    let err = load_raw(Path::new("normals.bmp")).unwrap_err();
    assert!(
        matches!(err, ImageIoError::UnsupportedExtension { ref extension } if extension == "bmp"),
        "{err}"
    );
}

#[test]
fn test_save_rejects_8bit_samples() {
    let scratch = ScratchDir::new("save_u8");
    let path = scratch.path().join("out.tif");
    let raw = RawImage::new_u8(1, 1, 3, vec![1, 2, 3]);

    let err = save_tiff16(&raw, &path).unwrap_err();

    assert!(matches!(err, ImageIoError::UnsupportedFormat { .. }), "{err}");
    assert!(!path.exists());
}
