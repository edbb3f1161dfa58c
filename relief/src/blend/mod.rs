//! Frequency-split correction of RTI normal maps.
//!
//! The RTI field keeps its high band (`rti - low_pass(rti)`) and receives a
//! low band that is mostly the photogrammetry one:
//!
//! ```text
//! blended   = alpha * low_pass(pg) + (1 - alpha) * low_pass(rti)
//! corrected = renormalize(rti - low_pass(rti) + blended)
//! ```
//!
//! Smoothing is per Cartesian component, not on the sphere. Renormalization
//! afterwards puts the vectors back on the unit sphere.


use glam::Vec3;
use rayon::prelude::*;

use crate::config::BlendParams;
use crate::convolution::gaussian_blur;
use crate::error::BlendError;
use crate::field::{CANONICAL_NORMAL, ChannelCount, NormalField};

/// Vectors shorter than this are replaced by [`CANONICAL_NORMAL`].
pub const DEGENERATE_NORM_EPSILON: f32 = 1e-6;

/// Gaussian low band of every channel.
///
/// # Panics
///
/// Panics if `sigma` is not positive. [`correct`] validates parameters first.
pub fn low_pass(field: &NormalField, sigma: f32) -> NormalField {
    field.map_planes(|plane| gaussian_blur(plane, sigma))
}

/// `alpha * pg_low + (1 - alpha) * rti_low`, per channel and pixel.
pub fn blend_low_freq(
    rti_low: &NormalField,
    pg_low: &NormalField,
    alpha: f32,
) -> Result<NormalField, BlendError> {
    ensure_same_shape(rti_low, pg_low)?;
    Ok(rti_low.zip_with(pg_low, |rti, pg| alpha * pg + (1.0 - alpha) * rti))
}

/// Swap the low band of `rti` for `blended_low`: `(rti - rti_low) + blended_low`.
pub fn reconstruct(
    rti: &NormalField,
    rti_low: &NormalField,
    blended_low: &NormalField,
) -> Result<NormalField, BlendError> {
    ensure_same_shape(rti, rti_low)?;
    ensure_same_shape(rti, blended_low)?;

    let detail = rti.zip_with(rti_low, |v, low| v - low);
    Ok(detail.zip_with(blended_low, |high, low| high + low))
}

/// Scale every vector to unit length.
///
/// Vectors with norm below [`DEGENERATE_NORM_EPSILON`] (or a NaN norm) become
/// [`CANONICAL_NORMAL`]. Single-channel fields carry no direction, so they are
/// clamped to `[-1, 1]` instead.
pub fn renormalize(mut field: NormalField) -> NormalField {
    match field.planes_mut() {
        [l] => {
            l.pixels_mut()
                .par_iter_mut()
                .for_each(|v| *v = v.clamp(-1.0, 1.0));
        }
        [x, y, z] => {
            x.pixels_mut()
                .par_iter_mut()
                .zip(y.pixels_mut().par_iter_mut())
                .zip(z.pixels_mut().par_iter_mut())
                .for_each(|((nx, ny), nz)| {
                    let n = unit_or_canonical(Vec3::new(*nx, *ny, *nz));
                    *nx = n.x;
                    *ny = n.y;
                    *nz = n.z;
                });
        }
        _ => unreachable!("normal field holds 1 or 3 planes"),
    }
    field
}

#[inline]
fn unit_or_canonical(v: Vec3) -> Vec3 {
    let len = v.length();
    if len.is_nan() || len < DEGENERATE_NORM_EPSILON {
        CANONICAL_NORMAL
    } else {
        v / len
    }
}

/// Full correction of one aligned pair.
///
/// `rti` is the detail-rich map, `pg` the geometrically accurate one. A
/// single-channel map paired with a three-channel map is replicated to three
/// channels; two single-channel maps are corrected as scalar fields.
pub fn correct(
    rti: NormalField,
    pg: NormalField,
    params: &BlendParams,
) -> Result<NormalField, BlendError> {
    params.validate()?;

    if (rti.width(), rti.height()) != (pg.width(), pg.height()) {
        return Err(BlendError::ShapeMismatch {
            expected: rti.shape(),
            actual: pg.shape(),
        });
    }

    let (rti, pg) = match (rti.channels(), pg.channels()) {
        (ChannelCount::L, ChannelCount::L) | (ChannelCount::Rgb, ChannelCount::Rgb) => (rti, pg),
        _ => (rti.expand_to_rgb(), pg.expand_to_rgb()),
    };

    let (rti_low, pg_low) = rayon::join(
        || low_pass(&rti, params.blur_radius),
        || low_pass(&pg, params.blur_radius),
    );
    drop(pg);

    let blended_low = blend_low_freq(&rti_low, &pg_low, params.alpha)?;
    drop(pg_low);

    let corrected = reconstruct(&rti, &rti_low, &blended_low)?;
    Ok(renormalize(corrected))
}

fn ensure_same_shape(expected: &NormalField, actual: &NormalField) -> Result<(), BlendError> {
    if expected.shape() != actual.shape() {
        return Err(BlendError::ShapeMismatch {
            expected: expected.shape(),
            actual: actual.shape(),
        });
    }
    Ok(())
}
