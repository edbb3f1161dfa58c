//! Reading normal-map images and writing 16-bit TIFF results.
//!
//! PNG and JPEG go through the `image` crate, TIFF through `tiff` directly.
//! Decoder memory limits are lifted for both so large captures are not
//! rejected.

#[cfg(test)]
mod tests;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{DynamicImage, ImageReader};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::encoder::{TiffEncoder, colortype};

use crate::codec::{RawImage, Samples};
use crate::error::ImageIoError;

/// Extensions accepted as inputs, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff"];

/// Extension of every written result.
pub const OUTPUT_EXTENSION: &str = "tif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFileFormat {
    Png,
    Jpeg,
    Tiff,
}

impl ImageFileFormat {
    /// Case-insensitive lookup by file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }
}

/// Load an image file as raw integer samples.
///
/// Only 8/16-bit gray and RGB layouts are returned; anything else is
/// `UnsupportedFormat`.
pub fn load_raw(path: &Path) -> Result<RawImage, ImageIoError> {
    match ImageFileFormat::from_path(path) {
        Some(ImageFileFormat::Png | ImageFileFormat::Jpeg) => load_png_jpeg(path),
        Some(ImageFileFormat::Tiff) => load_tiff(path),
        None => Err(ImageIoError::UnsupportedExtension {
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }),
    }
}

fn load_png_jpeg(path: &Path) -> Result<RawImage, ImageIoError> {
    load_png_jpeg_with_limits(path, image::Limits::no_limits())
}

fn load_png_jpeg_with_limits(
    path: &Path,
    limits: image::Limits,
) -> Result<RawImage, ImageIoError> {
    let io_err = |source| ImageIoError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?;
    reader.limits(limits);

    let img = reader.decode().map_err(|source| match source {
        image::ImageError::IoError(source) => io_err(source),
        source => ImageIoError::Image {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let width = img.width() as usize;
    let height = img.height() as usize;

    let raw = match img {
        DynamicImage::ImageLuma8(buf) => RawImage::new_u8(width, height, 1, buf.into_raw()),
        DynamicImage::ImageLuma16(buf) => RawImage::new_u16(width, height, 1, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => RawImage::new_u8(width, height, 3, buf.into_raw()),
        DynamicImage::ImageRgb16(buf) => RawImage::new_u16(width, height, 3, buf.into_raw()),
        other => {
            return Err(ImageIoError::UnsupportedFormat {
                path: path.to_path_buf(),
                detail: format!("color type {:?}", other.color()),
            });
        }
    };

    Ok(raw)
}

fn load_tiff(path: &Path) -> Result<RawImage, ImageIoError> {
    let tiff_err = |source| ImageIoError::Tiff {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| ImageIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut decoder = Decoder::new(file)
        .map_err(tiff_err)?
        .with_limits(Limits::unlimited());

    let color = decoder.colortype().map_err(tiff_err)?;
    let channel_count = match color {
        tiff::ColorType::Gray(_) => 1,
        tiff::ColorType::RGB(_) => 3,
        other => {
            return Err(ImageIoError::UnsupportedFormat {
                path: path.to_path_buf(),
                detail: format!("TIFF color type {other:?}"),
            });
        }
    };

    let (width, height) = decoder.dimensions().map_err(tiff_err)?;
    let (width, height) = (width as usize, height as usize);

    let raw = match decoder.read_image().map_err(tiff_err)? {
        DecodingResult::U8(buf) => RawImage::new_u8(width, height, channel_count, buf),
        DecodingResult::U16(buf) => RawImage::new_u16(width, height, channel_count, buf),
        _ => {
            return Err(ImageIoError::UnsupportedFormat {
                path: path.to_path_buf(),
                detail: format!("TIFF sample format of {color:?}"),
            });
        }
    };

    Ok(raw)
}

/// Write a 16-bit gray or RGB image as an uncompressed TIFF.
pub fn save_tiff16(raw: &RawImage, path: &Path) -> Result<(), ImageIoError> {
    let Samples::U16(samples) = &raw.samples else {
        return Err(ImageIoError::UnsupportedFormat {
            path: path.to_path_buf(),
            detail: format!("{}-bit samples, expected 16-bit", raw.samples.storage_bits()),
        });
    };

    if raw.channel_count != 1 && raw.channel_count != 3 {
        return Err(ImageIoError::UnsupportedFormat {
            path: path.to_path_buf(),
            detail: format!("{} channels, expected 1 or 3", raw.channel_count),
        });
    }

    let tiff_err = |source| ImageIoError::Tiff {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|source| ImageIoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let mut encoder = TiffEncoder::new(&mut writer).map_err(tiff_err)?;

    let width = raw.width as u32;
    let height = raw.height as u32;
    if raw.channel_count == 1 {
        encoder
            .write_image::<colortype::Gray16>(width, height, samples)
            .map_err(tiff_err)?;
    } else {
        encoder
            .write_image::<colortype::RGB16>(width, height, samples)
            .map_err(tiff_err)?;
    }
    drop(encoder);

    writer.flush().map_err(|source| ImageIoError::Io {
        path: path.to_path_buf(),
        source,
    })
}
