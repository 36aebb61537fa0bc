//! # Public Evaluation Surface
//!
//! [`GaborNoise`] wraps a validated configuration and exposes the two
//! evaluation shapes: lane-level batch calls on dual vectors for callers
//! that already speak [`DualVec3`], and slice drivers over plain
//! [`SamplePoint`] records for everyone else. Every evaluation is a pure
//! function of the handle's configuration and the call's own inputs, so a
//! handle is freely shared across threads.

use crate::config::{GaborSetup, NoiseParams};
use crate::dual::{Dual2, DualVec3};
use crate::error::NoiseError;
use crate::field::{Field, PARALLELISM};
use crate::grid;

/// A configured Gabor noise. Construction validates once; evaluation never
/// re-checks parameters.
#[derive(Debug)]
pub struct GaborNoise {
    setup: GaborSetup,
}

/// One query point with its surface-parameter derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// World-space position.
    pub p: [f32; 3],
    /// Position derivative along the first surface parameter.
    pub dpdu: [f32; 3],
    /// Position derivative along the second surface parameter.
    pub dpdv: [f32; 3],
}

impl Default for SamplePoint {
    /// Origin with the standard planar parameterization.
    fn default() -> Self {
        Self {
            p: [0.0; 3],
            dpdu: [1.0, 0.0, 0.0],
            dpdv: [0.0, 1.0, 0.0],
        }
    }
}

impl SamplePoint {
    /// A point on the default planar parameterization.
    pub fn at(p: [f32; 3]) -> Self {
        Self {
            p,
            ..Self::default()
        }
    }
}

/// Scalar noise value with both surface-parameter derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoiseSample {
    /// The noise value.
    pub val: f32,
    /// Derivative along the first surface parameter.
    pub du: f32,
    /// Derivative along the second surface parameter.
    pub dv: f32,
}

/// Vector noise value with both surface-parameter derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoiseSample3 {
    /// The three channel values.
    pub val: [f32; 3],
    /// Per-channel derivative along the first surface parameter.
    pub du: [f32; 3],
    /// Per-channel derivative along the second surface parameter.
    pub dv: [f32; 3],
}

impl GaborNoise {
    /// Validate `params` and build an evaluation handle.
    pub fn new(params: &NoiseParams) -> Result<Self, NoiseError> {
        Ok(Self {
            setup: GaborSetup::new(params)?,
        })
    }

    /// Evaluate [`PARALLELISM`] points in lock-step, one per lane.
    pub fn eval(&self, p: &DualVec3<2>) -> Result<Dual2, NoiseError> {
        let [v] = grid::eval_batch::<1>(&self.setup, *p)?;
        Ok(v)
    }

    /// Vector-noise variant: three decorrelated channels per point.
    pub fn eval3(&self, p: &DualVec3<2>) -> Result<[Dual2; 3], NoiseError> {
        grid::eval_batch::<3>(&self.setup, *p)
    }

    /// Evaluate a slice of points into `out`. The two slices must have
    /// equal length. Partial tail batches pad with the final point; padding
    /// lanes cannot perturb real ones because per-cell draw sequences are
    /// batch-independent.
    pub fn eval_slice(
        &self,
        points: &[SamplePoint],
        out: &mut [NoiseSample],
    ) -> Result<(), NoiseError> {
        assert_eq!(points.len(), out.len(), "input/output length mismatch");
        for (chunk, out_chunk) in points
            .chunks(PARALLELISM)
            .zip(out.chunks_mut(PARALLELISM))
        {
            let v = self.eval(&pack(chunk))?;
            let vals = v.val.to_array();
            let du = v.partials[0].to_array();
            let dv = v.partials[1].to_array();
            for (lane, sample) in out_chunk.iter_mut().enumerate() {
                *sample = NoiseSample {
                    val: vals[lane],
                    du: du[lane],
                    dv: dv[lane],
                };
            }
        }
        Ok(())
    }

    /// Slice driver for the vector-noise variant.
    pub fn eval3_slice(
        &self,
        points: &[SamplePoint],
        out: &mut [NoiseSample3],
    ) -> Result<(), NoiseError> {
        assert_eq!(points.len(), out.len(), "input/output length mismatch");
        for (chunk, out_chunk) in points
            .chunks(PARALLELISM)
            .zip(out.chunks_mut(PARALLELISM))
        {
            let channels = self.eval3(&pack(chunk))?;
            let vals = channels.map(|c| c.val.to_array());
            let du = channels.map(|c| c.partials[0].to_array());
            let dv = channels.map(|c| c.partials[1].to_array());
            for (lane, sample) in out_chunk.iter_mut().enumerate() {
                *sample = NoiseSample3 {
                    val: [vals[0][lane], vals[1][lane], vals[2][lane]],
                    du: [du[0][lane], du[1][lane], du[2][lane]],
                    dv: [dv[0][lane], dv[1][lane], dv[2][lane]],
                };
            }
        }
        Ok(())
    }
}

/// Load up to `PARALLELISM` sample points into lane position, repeating the
/// last point into any unfilled tail lanes.
fn pack(chunk: &[SamplePoint]) -> DualVec3<2> {
    let mut p = [[0.0f32; PARALLELISM]; 3];
    let mut dpdu = [[0.0f32; PARALLELISM]; 3];
    let mut dpdv = [[0.0f32; PARALLELISM]; 3];
    let last = chunk.len() - 1;
    for lane in 0..PARALLELISM {
        let sp = &chunk[lane.min(last)];
        for axis in 0..3 {
            p[axis][lane] = sp.p[axis];
            dpdu[axis][lane] = sp.dpdu[axis];
            dpdv[axis][lane] = sp.dpdv[axis];
        }
    }
    let component = |axis: usize| Dual2 {
        val: Field::from_array(p[axis]),
        partials: [Field::from_array(dpdu[axis]), Field::from_array(dpdv[axis])],
    };
    DualVec3 {
        x: component(0),
        y: component(1),
        z: component(2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn scatter(n: usize) -> Vec<SamplePoint> {
        (0..n)
            .map(|i| {
                let f = i as f32;
                SamplePoint::at([0.37 * f - 2.0, -0.61 * f + 1.0, 0.23 * f])
            })
            .collect()
    }

    #[test]
    fn slice_driver_matches_lane_level_eval() {
        let noise = GaborNoise::new(&NoiseParams::default()).unwrap();
        let points = scatter(PARALLELISM);
        let mut out = [NoiseSample::default(); PARALLELISM];
        noise.eval_slice(&points, &mut out).unwrap();

        let v = noise.eval(&pack(&points)).unwrap();
        let vals = v.val.to_array();
        for lane in 0..PARALLELISM {
            assert_eq!(out[lane].val.to_bits(), vals[lane].to_bits());
        }
    }

    #[test]
    fn tail_batches_produce_the_same_values_as_full_ones() {
        let noise = GaborNoise::new(&NoiseParams::default()).unwrap();
        let points = scatter(PARALLELISM + 1);
        let mut padded = Vec::new();
        padded.resize(points.len(), NoiseSample::default());
        noise.eval_slice(&points, &mut padded).unwrap();

        // The same trailing point evaluated in a full batch of its own.
        let alone = [points[PARALLELISM]; PARALLELISM];
        let mut solo = [NoiseSample::default(); PARALLELISM];
        noise.eval_slice(&alone, &mut solo).unwrap();
        assert_eq!(padded[PARALLELISM].val.to_bits(), solo[0].val.to_bits());
        assert_eq!(padded[PARALLELISM].du.to_bits(), solo[0].du.to_bits());
    }

    #[test]
    fn vector_slice_driver_is_finite_everywhere() {
        let noise = GaborNoise::new(&NoiseParams::default()).unwrap();
        let points = scatter(7);
        let mut out = Vec::new();
        out.resize(points.len(), NoiseSample3::default());
        noise.eval3_slice(&points, &mut out).unwrap();
        for s in &out {
            for c in 0..3 {
                assert!(s.val[c].is_finite());
                assert!(s.du[c].is_finite());
                assert!(s.dv[c].is_finite());
            }
        }
    }

    #[test]
    fn empty_slice_is_a_no_op() {
        let noise = GaborNoise::new(&NoiseParams::default()).unwrap();
        noise.eval_slice(&[], &mut []).unwrap();
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn mismatched_slice_lengths_panic() {
        let noise = GaborNoise::new(&NoiseParams::default()).unwrap();
        let points = scatter(3);
        let mut out = [NoiseSample::default(); 2];
        let _ = noise.eval_slice(&points, &mut out);
    }
}
