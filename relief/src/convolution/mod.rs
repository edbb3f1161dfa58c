//! Separable Gaussian smoothing of `f32` planes.
//!
//! Rows are filtered first, then columns, which is O(n×k) instead of the
//! O(n×k²) of a direct 2D kernel. Borders use reflect-101 mirroring (the
//! edge sample is not repeated), so output dimensions always equal input
//! dimensions.


use rayon::prelude::*;

use crate::buffer2::Buffer2;

/// Rows handed to one rayon task. Keeps each task on its own cache lines.
const ROWS_PER_CHUNK: usize = 8;

/// Compute a normalized 1D Gaussian kernel.
///
/// The tap count is `round(8 * sigma + 1)` forced odd, so the kernel spans
/// about ±4 sigma around the center.
///
/// # Panics
///
/// Panics if `sigma` is not positive.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    assert!(sigma > 0.0, "Sigma must be positive");

    let size = ((sigma * 8.0 + 1.0).round() as usize) | 1;
    let radius = size / 2;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - radius as f32;
            (-x * x / two_sigma_sq).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge.
///
/// `-1 -> 1`, `len -> len - 2`. Indices further out keep bouncing between
/// the two borders, so kernels wider than the plane stay well defined.
#[inline]
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    debug_assert!(len > 0);
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let i = index.rem_euclid(period);
    if i >= len as isize {
        (period - i) as usize
    } else {
        i as usize
    }
}

/// Gaussian-smooth a plane with standard deviation `sigma`.
///
/// # Panics
///
/// Panics if `sigma` is not positive.
pub fn gaussian_blur(plane: &Buffer2<f32>, sigma: f32) -> Buffer2<f32> {
    let width = plane.width();
    let height = plane.height();
    if plane.is_empty() {
        return plane.clone();
    }

    let kernel = gaussian_kernel_1d(sigma);

    let mut temp = vec![0.0f32; width * height];
    convolve_rows(plane.pixels(), &mut temp, width, &kernel);

    let mut output = vec![0.0f32; width * height];
    convolve_cols(&temp, &mut output, width, height, &kernel);

    Buffer2::new(width, height, output)
}

fn convolve_rows(input: &[f32], output: &mut [f32], width: usize, kernel: &[f32]) {
    output
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;
            for (local_y, out_row) in out_chunk.chunks_mut(width).enumerate() {
                let y = y_start + local_y;
                let in_row = &input[y * width..(y + 1) * width];
                convolve_row(in_row, out_row, kernel);
            }
        });
}

/// Convolve one row. Taps that stay inside the row skip the mirroring.
#[inline]
fn convolve_row(input: &[f32], output: &mut [f32], kernel: &[f32]) {
    let width = input.len();
    let radius = kernel.len() / 2;

    for (x, out) in output.iter_mut().enumerate() {
        let inside = x >= radius && x + radius < width;
        *out = if inside {
            let window = &input[x - radius..=x + radius];
            window.iter().zip(kernel).map(|(&v, &k)| v * k).sum()
        } else {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &kval)| {
                    let sx = reflect_101(x as isize + k as isize - radius as isize, width);
                    input[sx] * kval
                })
                .sum()
        };
    }
}

/// Vertical pass. Each output row accumulates whole source rows so memory
/// is walked sequentially.
fn convolve_cols(input: &[f32], output: &mut [f32], width: usize, height: usize, kernel: &[f32]) {
    let radius = kernel.len() / 2;

    output
        .par_chunks_mut(width * ROWS_PER_CHUNK)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let y_start = chunk_idx * ROWS_PER_CHUNK;
            for (local_y, out_row) in out_chunk.chunks_mut(width).enumerate() {
                let y = y_start + local_y;
                out_row.fill(0.0);

                for (k, &kval) in kernel.iter().enumerate() {
                    let sy = reflect_101(y as isize + k as isize - radius as isize, height);
                    let src = &input[sy * width..(sy + 1) * width];
                    for (o, &s) in out_row.iter_mut().zip(src) {
                        *o += s * kval;
                    }
                }
            }
        });
}
