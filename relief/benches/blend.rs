//! Benchmarks for the frequency split and the full pair correction.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::Vec3;
use relief::convolution::gaussian_blur;
use relief::{BlendParams, Buffer2, NormalField, correct};

fn synthetic_field(size: usize, phase: f32) -> NormalField {
    NormalField::from_vectors(size, size, |x, y| {
        let u = (x as f32 * 0.05 + phase).sin() * 0.3;
        let v = (y as f32 * 0.07 - phase).cos() * 0.3;
        Vec3::new(u, v, 1.0).normalize()
    })
}

fn bench_gaussian_blur(c: &mut Criterion) {
    let plane = Buffer2::from_fn(2048, 2048, |x, y| ((x ^ y) % 17) as f32 / 17.0);
    let mut group = c.benchmark_group("gaussian_blur_2048");
    for sigma in [2.0f32, 8.0, 12.0] {
        group.bench_function(format!("sigma_{sigma}"), |b| {
            b.iter(|| gaussian_blur(black_box(&plane), black_box(sigma)))
        });
    }
    group.finish();
}

fn bench_correct(c: &mut Criterion) {
    let rti = synthetic_field(1024, 0.0);
    let pg = synthetic_field(1024, 0.4);
    let params = BlendParams::default();

    c.bench_function("correct_1024_rgb", |b| {
        b.iter(|| correct(black_box(rti.clone()), black_box(pg.clone()), &params))
    });
}

criterion_group!(benches, bench_gaussian_blur, bench_correct);
criterion_main!(benches);
