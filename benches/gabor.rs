//! Benchmark: Gabor noise evaluation throughput
//!
//! Measures the four evaluation variants over a fixed slab of sample
//! points. Correctness is pinned down by the integration tests.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pixelflow_noise::{GaborNoise, NoiseParams, NoiseSample, NoiseSample3, SamplePoint};

fn sample_points() -> Vec<SamplePoint> {
    (0..256)
        .map(|i| {
            let f = i as f32;
            SamplePoint::at([0.83 * f - 100.0, 1.29 * f - 160.0, 0.57 * f - 70.0])
        })
        .collect()
}

fn scalar_benchmarks(c: &mut Criterion) {
    let points = sample_points();

    let isotropic = GaborNoise::new(&NoiseParams::default()).unwrap();
    c.bench_function("isotropic_256", |b| {
        let mut out = vec![NoiseSample::default(); points.len()];
        b.iter(|| {
            isotropic
                .eval_slice(black_box(&points), &mut out)
                .unwrap();
            black_box(out[0].val)
        })
    });

    let anisotropic = GaborNoise::new(&NoiseParams {
        anisotropic: true,
        direction: [0.0, 0.6, 0.8],
        ..NoiseParams::default()
    })
    .unwrap();
    c.bench_function("anisotropic_256", |b| {
        let mut out = vec![NoiseSample::default(); points.len()];
        b.iter(|| {
            anisotropic
                .eval_slice(black_box(&points), &mut out)
                .unwrap();
            black_box(out[0].val)
        })
    });

    let filtered = GaborNoise::new(&NoiseParams {
        filter: Some([[0.05, 0.0], [0.0, 0.05]]),
        ..NoiseParams::default()
    })
    .unwrap();
    c.bench_function("filtered_256", |b| {
        let mut out = vec![NoiseSample::default(); points.len()];
        b.iter(|| {
            filtered.eval_slice(black_box(&points), &mut out).unwrap();
            black_box(out[0].val)
        })
    });
}

fn vector_benchmark(c: &mut Criterion) {
    let points = sample_points();
    let noise = GaborNoise::new(&NoiseParams::default()).unwrap();
    c.bench_function("vector_256", |b| {
        let mut out = vec![NoiseSample3::default(); points.len()];
        b.iter(|| {
            noise.eval3_slice(black_box(&points), &mut out).unwrap();
            black_box(out[0].val[0])
        })
    });
}

criterion_group!(benches, scalar_benchmarks, vector_benchmark);
criterion_main!(benches);
