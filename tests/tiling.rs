//! Periodic wrap: with a per-axis period of `k` cells, the noise repeats
//! every `k · cellSize` world units on that axis.

use pixelflow_noise::{GaborNoise, NoiseParams, NoiseSample, SamplePoint};

/// Truncation radius for bandwidth 1, which is also the cell size.
fn cell_size() -> f32 {
    (-(0.02f32.ln()) / std::f32::consts::PI).sqrt()
}

fn eval_all(noise: &GaborNoise, points: &[SamplePoint]) -> Vec<NoiseSample> {
    let mut out = vec![NoiseSample::default(); points.len()];
    noise.eval_slice(points, &mut out).unwrap();
    out
}

fn scatter(n: usize) -> Vec<SamplePoint> {
    (0..n)
        .map(|i| {
            let f = i as f32;
            SamplePoint::at([0.83 * f + 0.11, 1.29 * f + 0.47, 0.57 * f + 0.31])
        })
        .collect()
}

/// A kernel straddling the truncation boundary can flip in or out when the
/// shifted coordinates round differently; its contribution is bounded by
/// the truncation threshold, so repeats agree to well under the noise
/// amplitude but not necessarily to the last bit.
const TILE_TOL: f32 = 0.02;

#[test]
fn noise_repeats_at_the_period_on_each_axis() {
    let period = [3.0, 4.0, 5.0];
    let noise = GaborNoise::new(&NoiseParams {
        period,
        ..NoiseParams::default()
    })
    .unwrap();

    let base = scatter(48);
    let reference = eval_all(&noise, &base);
    for axis in 0..3 {
        let step = period[axis] * cell_size();
        let shifted: Vec<SamplePoint> = base
            .iter()
            .map(|s| {
                let mut p = s.p;
                p[axis] += step;
                SamplePoint::at(p)
            })
            .collect();
        let repeated = eval_all(&noise, &shifted);
        for (r, s) in reference.iter().zip(&repeated) {
            assert!(
                (r.val - s.val).abs() < TILE_TOL,
                "axis {axis}: {} vs {}",
                r.val,
                s.val
            );
        }
    }
}

#[test]
fn multiple_period_steps_still_repeat() {
    let noise = GaborNoise::new(&NoiseParams {
        period: [2.0, 2.0, 2.0],
        ..NoiseParams::default()
    })
    .unwrap();
    let base = scatter(24);
    let reference = eval_all(&noise, &base);
    let step = 3.0 * 2.0 * cell_size();
    let shifted: Vec<SamplePoint> = base
        .iter()
        .map(|s| SamplePoint::at([s.p[0] + step, s.p[1] + step, s.p[2] + step]))
        .collect();
    for (r, s) in reference.iter().zip(&eval_all(&noise, &shifted)) {
        assert!((r.val - s.val).abs() < TILE_TOL);
    }
}

#[test]
fn untiled_noise_does_not_repeat() {
    let noise = GaborNoise::new(&NoiseParams::default()).unwrap();
    let base = scatter(24);
    let step = 3.0 * cell_size();
    let shifted: Vec<SamplePoint> = base
        .iter()
        .map(|s| SamplePoint::at([s.p[0] + step, s.p[1], s.p[2]]))
        .collect();
    let reference = eval_all(&noise, &base);
    let moved = eval_all(&noise, &shifted);
    let differing = reference
        .iter()
        .zip(&moved)
        .filter(|(r, s)| (r.val - s.val).abs() > TILE_TOL)
        .count();
    assert!(differing > 16, "only {differing} of 24 samples moved");
}
