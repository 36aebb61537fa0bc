//! # PixelFlow Noise
//!
//! Band-limited, tileable Gabor noise, evaluated four points at a time in
//! SIMD lock-step with exact first derivatives.
//!
//! ## Design Philosophy
//!
//! **Everything is derived, nothing is stored.**
//!
//! - Kernels live on a jittered integer lattice; each cell's impulses are
//!   regenerated from a hash of the cell coordinates and a global seed, so
//!   evaluation is a pure function with no tables and no allocation.
//! - Values carry their derivatives: all kernel math runs on dual numbers,
//!   giving analytically exact surface-parameter gradients.
//! - Antialiasing is algebra, not supersampling: slicing and Gaussian
//!   prefiltering stay inside the Gabor kernel family in closed form.
//!
//! ```
//! use pixelflow_noise::{GaborNoise, NoiseParams, NoiseSample, SamplePoint};
//!
//! let noise = GaborNoise::new(&NoiseParams::default()).unwrap();
//! let points = [SamplePoint::at([0.5, -1.25, 3.0])];
//! let mut out = [NoiseSample::default()];
//! noise.eval_slice(&points, &mut out).unwrap();
//! assert!(out[0].val.is_finite());
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

mod backends;
mod config;
mod dual;
mod error;
mod field;
mod grid;
mod hash;
mod kernel;
mod math;
mod noise;
mod rng;

pub use config::NoiseParams;
pub use dual::{Dual, Dual2, DualVec2, DualVec3};
pub use error::NoiseError;
pub use field::{Field, IntField, Mask, Vec2F, Vec3F, PARALLELISM};
pub use noise::{GaborNoise, NoiseSample, NoiseSample3, SamplePoint};
