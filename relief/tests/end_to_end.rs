mod common;

use common::{ScratchDir, write_rgb8};
use relief::io::load_raw;
use relief::pipeline::load_field;
use relief::{BatchConfig, BlendParams, NormalField, decode, low_pass, run};

const SIZE: u32 = 64;
const SIGMA: f32 = 8.0;

fn max_abs_diff(a: &NormalField, b: &NormalField) -> f32 {
    assert_eq!(a.shape(), b.shape());
    a.planes()
        .iter()
        .zip(b.planes())
        .flat_map(|(pa, pb)| pa.iter().zip(pb.iter()).map(|(x, y)| (x - y).abs()))
        .fold(0.0, f32::max)
}

fn high_band(field: &NormalField) -> f32 {
    let low = low_pass(field, SIGMA);
    low.planes()
        .iter()
        .zip(field.planes())
        .flat_map(|(pl, pf)| pl.iter().zip(pf.iter()).map(|(l, f)| (f - l).abs()))
        .fold(0.0, f32::max)
}

#[test]
fn test_flat_detail_over_smooth_gradient() {
    let scratch = ScratchDir::new("e2e");
    let rti_dir = scratch.subdir("rti");
    let pg_dir = scratch.subdir("pg");
    let out_dir = scratch.path().join("out");

    let rti_path = rti_dir.join("painting_01.png");
    let pg_path = pg_dir.join("painting_01.png");

    write_rgb8(&rti_path, SIZE, SIZE, |_, _| [0.0, 0.0, 1.0]);
    write_rgb8(&pg_path, SIZE, SIZE, |x, _| {
        let nx = 0.2 * x as f32 / (SIZE - 1) as f32 - 0.1;
        [nx, 0.0, (1.0 - nx * nx).sqrt()]
    });

    let config = BatchConfig::with_params(BlendParams::new(SIGMA, 0.99));
    let result = run(&rti_dir, &pg_dir, &out_dir, &config).unwrap();
    assert_eq!(result.succeeded, 1);

    let rti = load_field(&rti_path).unwrap();
    let pg = load_field(&pg_path).unwrap();
    let corrected = decode(&load_raw(&result.outputs[0]).unwrap()).unwrap();

    // Low band follows the photogrammetry gradient.
    let low_diff = max_abs_diff(&low_pass(&corrected, SIGMA), &low_pass(&pg, SIGMA));
    assert!(low_diff < 0.01, "low band off by {low_diff}");

    // The flat map has no detail, and none is invented.
    assert!(high_band(&rti) < 1e-4);
    let residual = high_band(&corrected);
    assert!(residual < 0.02, "unexpected detail {residual}");
}
