#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Uniquely named directory under the system temp dir, removed on drop.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!("relief_it_{label}_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&path).expect("failed to create scratch dir");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn subdir(&self, name: &str) -> PathBuf {
        let dir = self.path.join(name);
        fs::create_dir_all(&dir).expect("failed to create scratch subdir");
        dir
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Quantize a component in [-1, 1] to an 8-bit sample.
pub fn to_u8(v: f32) -> u8 {
    ((v.clamp(-1.0, 1.0) + 1.0) * 0.5 * 255.0).round() as u8
}

/// Write an 8-bit RGB normal map; `f` returns the vector at `(x, y)`.
pub fn write_rgb8<F>(path: &Path, width: u32, height: u32, f: F)
where
    F: Fn(u32, u32) -> [f32; 3],
{
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        let [nx, ny, nz] = f(x, y);
        image::Rgb([to_u8(nx), to_u8(ny), to_u8(nz)])
    });
    img.save(path).expect("failed to write RGB fixture");
}

/// Write an 8-bit single-channel map.
pub fn write_gray8<F>(path: &Path, width: u32, height: u32, f: F)
where
    F: Fn(u32, u32) -> f32,
{
    let img = image::GrayImage::from_fn(width, height, |x, y| image::Luma([to_u8(f(x, y))]));
    img.save(path).expect("failed to write gray fixture");
}

/// Flat map facing the viewer with a faint checkerboard of surface detail.
pub fn write_detailed(path: &Path, width: u32, height: u32) {
    write_rgb8(path, width, height, |x, y| {
        let s = if (x + y) % 2 == 0 { 0.04 } else { -0.04 };
        [s, -s, 0.99]
    });
}

/// Smoothly tilting map without detail.
pub fn write_smooth(path: &Path, width: u32, height: u32) {
    write_rgb8(path, width, height, |x, _| {
        let nx = 0.2 * x as f32 / width as f32 - 0.1;
        [nx, 0.0, (1.0 - nx * nx).sqrt()]
    });
}
