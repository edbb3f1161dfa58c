//! Conversion between stored pixel samples and decoded normal fields.
//!
//! Integer samples in `[0, 2^depth - 1]` map linearly onto `[-1, 1]`. Encoding
//! always produces 16-bit samples, whatever depth the inputs had.


use num_traits::Bounded;
use rayon::prelude::*;

use crate::buffer2::Buffer2;
use crate::error::CodecError;
use crate::field::{ChannelCount, NormalField};

/// Bit depth of every encoded output.
pub const OUTPUT_BIT_DEPTH: u32 = 16;

/// Interleaved integer samples as they come out of an image file.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(s) => s.len(),
            Samples::U16(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bit depth implied by the storage type.
    pub fn storage_bits(&self) -> u32 {
        match self {
            Samples::U8(_) => 8,
            Samples::U16(_) => 16,
        }
    }
}

/// Pixel buffer with its declared layout.
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub width: usize,
    pub height: usize,
    pub bit_depth: u32,
    pub channel_count: u32,
    pub samples: Samples,
}

impl RawImage {
    pub fn new_u8(width: usize, height: usize, channel_count: u32, samples: Vec<u8>) -> Self {
        Self {
            width,
            height,
            bit_depth: 8,
            channel_count,
            samples: Samples::U8(samples),
        }
    }

    pub fn new_u16(width: usize, height: usize, channel_count: u32, samples: Vec<u16>) -> Self {
        Self {
            width,
            height,
            bit_depth: 16,
            channel_count,
            samples: Samples::U16(samples),
        }
    }
}

/// Decode a raw image into a field with components in `[-1, 1]`.
///
/// `value = 2 * pixel / max_pixel - 1`, channel order preserved.
pub fn decode(raw: &RawImage) -> Result<NormalField, CodecError> {
    if raw.bit_depth != 8 && raw.bit_depth != 16 {
        return Err(CodecError::UnsupportedFormat(format!(
            "bit depth {} (expected 8 or 16)",
            raw.bit_depth
        )));
    }
    let channels = ChannelCount::from_count(raw.channel_count).ok_or_else(|| {
        CodecError::UnsupportedFormat(format!(
            "{} channels (expected 1 or 3)",
            raw.channel_count
        ))
    })?;
    if raw.samples.storage_bits() != raw.bit_depth {
        return Err(CodecError::UnsupportedFormat(format!(
            "{}-bit samples declared as {}-bit",
            raw.samples.storage_bits(),
            raw.bit_depth
        )));
    }

    let expected = raw.width * raw.height * channels.count();
    if raw.samples.len() != expected {
        return Err(CodecError::SampleCount {
            width: raw.width,
            height: raw.height,
            channels: raw.channel_count,
            expected,
            actual: raw.samples.len(),
        });
    }

    let planes = match &raw.samples {
        Samples::U8(s) => deinterleave(s, raw.width, raw.height, channels),
        Samples::U16(s) => deinterleave(s, raw.width, raw.height, channels),
    };

    Ok(NormalField::from_planes(planes))
}

fn deinterleave<T>(
    samples: &[T],
    width: usize,
    height: usize,
    channels: ChannelCount,
) -> Vec<Buffer2<f32>>
where
    T: Copy + Bounded + Into<f32> + Sync,
{
    let stride = channels.count();
    let max_pixel: f32 = T::max_value().into();

    (0..stride)
        .map(|c| {
            let pixels = samples
                .par_iter()
                .skip(c)
                .step_by(stride)
                .map(|&p| 2.0 * (Into::<f32>::into(p) / max_pixel) - 1.0)
                .collect();
            Buffer2::new(width, height, pixels)
        })
        .collect()
}

/// Encode a field as interleaved 16-bit samples.
///
/// Components are clamped to `[-1, 1]` before quantization:
/// `pixel = round((value + 1) / 2 * 65535)`.
pub fn encode(field: &NormalField) -> RawImage {
    let width = field.width();
    let height = field.height();
    let channels = field.channels();
    let stride = channels.count();

    let mut samples = vec![0u16; field.pixel_count() * stride];
    for (c, plane) in field.planes().iter().enumerate() {
        samples
            .par_iter_mut()
            .skip(c)
            .step_by(stride)
            .zip(plane.pixels().par_iter())
            .for_each(|(out, &v)| *out = quantize_u16(v));
    }

    RawImage {
        width,
        height,
        bit_depth: OUTPUT_BIT_DEPTH,
        channel_count: stride as u32,
        samples: Samples::U16(samples),
    }
}

#[inline]
fn quantize_u16(value: f32) -> u16 {
    let v = value.clamp(-1.0, 1.0);
    ((v + 1.0) * 0.5 * u16::MAX as f32).round() as u16
}
