//! Decoded normal maps.
//!
//! A [`NormalField`] stores one `f32` plane per vector component so the
//! blender can filter each Cartesian component on its own.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::buffer2::Buffer2;

/// Fallback for vectors too short to renormalize: straight out of the surface.
pub const CANONICAL_NORMAL: Vec3 = Vec3::Z;

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[repr(u32)]
pub enum ChannelCount {
    /// Z-only, height-like normals.
    L = 1,
    Rgb = 3,
}

impl ChannelCount {
    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            1 => Some(ChannelCount::L),
            3 => Some(ChannelCount::Rgb),
            _ => None,
        }
    }

    #[inline]
    pub fn count(self) -> usize {
        self as usize
    }
}

/// Width, height and channel count of a field.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct FieldShape {
    pub width: usize,
    pub height: usize,
    pub channels: ChannelCount,
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} with {} channel(s)",
            self.width,
            self.height,
            self.channels.count()
        )
    }
}

/// Planar grid of 1- or 3-component vectors in the signed range [-1, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalField {
    planes: Vec<Buffer2<f32>>,
}

impl NormalField {
    /// Builds a field from per-component planes.
    ///
    /// # Panics
    ///
    /// Panics if the plane count is not 1 or 3, or if the planes differ in size.
    pub fn from_planes(planes: Vec<Buffer2<f32>>) -> Self {
        assert!(
            planes.len() == 1 || planes.len() == 3,
            "normal field needs 1 or 3 planes, got {}",
            planes.len()
        );
        assert!(
            planes.iter().all(|p| p.same_shape(&planes[0])),
            "all planes must share the same dimensions"
        );
        Self { planes }
    }

    /// Single-channel field.
    pub fn scalar(plane: Buffer2<f32>) -> Self {
        Self {
            planes: vec![plane],
        }
    }

    /// Three-channel field built from a per-pixel vector function.
    pub fn from_vectors<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Vec3,
    {
        let mut x = Vec::with_capacity(width * height);
        let mut y = Vec::with_capacity(width * height);
        let mut z = Vec::with_capacity(width * height);
        for py in 0..height {
            for px in 0..width {
                let v = f(px, py);
                x.push(v.x);
                y.push(v.y);
                z.push(v.z);
            }
        }
        Self {
            planes: vec![
                Buffer2::new(width, height, x),
                Buffer2::new(width, height, y),
                Buffer2::new(width, height, z),
            ],
        }
    }

    /// Three-channel field with the same vector everywhere.
    pub fn uniform(width: usize, height: usize, v: Vec3) -> Self {
        Self {
            planes: vec![
                Buffer2::new_filled(width, height, v.x),
                Buffer2::new_filled(width, height, v.y),
                Buffer2::new_filled(width, height, v.z),
            ],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.planes[0].width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.planes[0].height()
    }

    #[inline]
    pub fn channels(&self) -> ChannelCount {
        if self.planes.len() == 1 {
            ChannelCount::L
        } else {
            ChannelCount::Rgb
        }
    }

    pub fn shape(&self) -> FieldShape {
        FieldShape {
            width: self.width(),
            height: self.height(),
            channels: self.channels(),
        }
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.planes[0].len()
    }

    #[inline]
    pub fn planes(&self) -> &[Buffer2<f32>] {
        &self.planes
    }

    #[inline]
    pub fn planes_mut(&mut self) -> &mut [Buffer2<f32>] {
        &mut self.planes
    }

    #[inline]
    pub fn plane(&self, channel: usize) -> &Buffer2<f32> {
        &self.planes[channel]
    }

    pub fn into_planes(self) -> Vec<Buffer2<f32>> {
        self.planes
    }

    /// Vector at `(x, y)`. Single-channel fields read as `(0, 0, value)`.
    pub fn vector(&self, x: usize, y: usize) -> Vec3 {
        match self.planes.as_slice() {
            [l] => Vec3::new(0.0, 0.0, l[(x, y)]),
            [px, py, pz] => Vec3::new(px[(x, y)], py[(x, y)], pz[(x, y)]),
            _ => unreachable!("normal field holds 1 or 3 planes"),
        }
    }

    /// Replicates a single-channel field into three identical planes.
    /// Three-channel fields are returned unchanged.
    pub fn expand_to_rgb(self) -> Self {
        match self.channels() {
            ChannelCount::Rgb => self,
            ChannelCount::L => {
                let plane = &self.planes[0];
                Self {
                    planes: vec![plane.clone(), plane.clone(), plane.clone()],
                }
            }
        }
    }

    /// Applies `f` to every plane, producing a field of the same channel count.
    pub fn map_planes<F>(&self, f: F) -> Self
    where
        F: Fn(&Buffer2<f32>) -> Buffer2<f32>,
    {
        Self::from_planes(self.planes.iter().map(f).collect())
    }

    /// Combines matching planes of two fields sample by sample.
    ///
    /// Callers must check that both fields have the same shape.
    pub(crate) fn zip_with<F>(&self, other: &Self, f: F) -> Self
    where
        F: Fn(f32, f32) -> f32,
    {
        debug_assert_eq!(self.shape(), other.shape());
        let planes = self
            .planes
            .iter()
            .zip(&other.planes)
            .map(|(a, b)| {
                let pixels = a.iter().zip(b.iter()).map(|(&a, &b)| f(a, b)).collect();
                Buffer2::new(a.width(), a.height(), pixels)
            })
            .collect();
        Self { planes }
    }
}
