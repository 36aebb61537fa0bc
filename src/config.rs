//! # Noise Configuration
//!
//! [`NoiseParams`] is the public, serializable parameter record; a validated
//! [`GaborSetup`] is derived from it once per noise handle and carries every
//! constant the hot path needs: truncation radius (which doubles as the
//! lattice cell size), impulse density, Poisson mean per cell and the
//! variance-normalization scale. All fail-fast validation lives here, so no
//! invalid value ever reaches the kernel math.

use crate::error::NoiseError;
use crate::kernel::KernelFilter;
use crate::math::PI;
use serde::{Deserialize, Serialize};

/// Kernel contributions are cut once the envelope falls below this fraction
/// of its peak.
const TRUNCATE: f32 = 0.02;

/// Upper bound on `impulses`; keeps the per-cell Poisson mean small enough
/// that the sampler's iteration cap is unreachable.
const MAX_IMPULSES: f32 = 64.0;

/// Noise parameters as a host system configures them.
///
/// `impulses` is the expected number of kernels per truncation sphere;
/// `period` is per-axis in cell-size units, with 0 meaning untiled.
/// `direction` is only read when `anisotropic` is set, `filter` is the
/// optional screen-space filter covariance for analytic antialiasing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Gaussian envelope bandwidth `a` (> 0); higher is tighter kernels.
    pub bandwidth: f32,
    /// Expected impulse count per truncation sphere.
    pub impulses: f32,
    /// Global seed mixed into every cell hash.
    pub seed: u32,
    /// Use the fixed `direction` instead of uniform sphere orientations.
    pub anisotropic: bool,
    /// Preferred frequency direction for the anisotropic variant.
    pub direction: [f32; 3],
    /// Screen-space filter covariance; `None` disables prefiltering.
    pub filter: Option<[[f32; 2]; 2]>,
    /// Tiling period per axis in cells, 0 = no tiling on that axis.
    pub period: [f32; 3],
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            bandwidth: 1.0,
            impulses: 16.0,
            seed: 0,
            anisotropic: false,
            direction: [0.0, 0.0, 1.0],
            filter: None,
            period: [0.0; 3],
        }
    }
}

/// Validated configuration with all derived constants.
#[derive(Debug)]
pub(crate) struct GaborSetup {
    /// Envelope bandwidth.
    pub a: f32,
    /// Truncation radius, in world units. Also the lattice cell size, so
    /// the neighbor search is exactly home ± 1 per axis.
    pub radius: f32,
    pub radius_inv: f32,
    pub radius2: f32,
    /// Poisson mean per cell volume.
    pub mean: f32,
    /// `1/sqrt(λ)` normalization, making variance independent of density.
    pub scale: f32,
    pub seed: u32,
    /// Normalized preferred direction; `None` selects isotropic sampling.
    pub direction: Option<[f32; 3]>,
    pub filter: Option<KernelFilter>,
    /// Effective integer tiling period per axis.
    pub period: [Option<f32>; 3],
}

impl GaborSetup {
    pub fn new(params: &NoiseParams) -> Result<Self, NoiseError> {
        let a = params.bandwidth;
        if !a.is_finite() || a <= 0.0 {
            return Err(NoiseError::Bandwidth(a));
        }
        if !params.impulses.is_finite() || params.impulses <= 0.0 || params.impulses > MAX_IMPULSES
        {
            return Err(NoiseError::Impulses {
                got: params.impulses,
                max: MAX_IMPULSES,
            });
        }

        // Solve exp(-π a² r²) = TRUNCATE for the radius where the envelope
        // drops below the cut; re-derived here every time the bandwidth
        // changes rather than hard-coded.
        let radius = libm::sqrtf(-libm::logf(TRUNCATE) / PI) / a;
        let radius3 = radius * radius * radius;
        let lambda = params.impulses / ((4.0 / 3.0) * PI * radius3);
        let mean = lambda * radius3;
        let scale = 1.0 / libm::sqrtf(lambda);

        let direction = if params.anisotropic {
            let [x, y, z] = params.direction;
            let len2 = x * x + y * y + z * z;
            if !len2.is_finite() || len2 < 1e-12 {
                return Err(NoiseError::Direction);
            }
            let inv = 1.0 / libm::sqrtf(len2);
            Some([x * inv, y * inv, z * inv])
        } else {
            None
        };

        let filter = match params.filter {
            Some(cov) => Some(KernelFilter::new(cov, a)?),
            None => None,
        };

        let mut period = [None; 3];
        for axis in 0..3 {
            let p = params.period[axis];
            if !p.is_finite() || p < 0.0 {
                return Err(NoiseError::Period(p));
            }
            if p > 0.0 {
                period[axis] = Some(libm::floorf(p).max(1.0));
            }
        }

        log::debug!(
            "gabor setup: a={a} radius={radius} lambda={lambda} mean={mean} scale={scale}"
        );

        Ok(Self {
            a,
            radius,
            radius_inv: 1.0 / radius,
            radius2: radius * radius,
            mean,
            scale,
            seed: params.seed,
            direction,
            filter,
            period,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_validate() {
        let setup = GaborSetup::new(&NoiseParams::default()).unwrap();
        // radius = sqrt(-ln 0.02 / π), mean = impulses·3/(4π)
        assert!((setup.radius - 1.1159005).abs() < 1e-4);
        assert!((setup.mean - 3.8197186).abs() < 1e-4);
        assert!(setup.direction.is_none());
        assert!(setup.filter.is_none());
    }

    #[test]
    fn setup_formats_with_debug() {
        let setup = GaborSetup::new(&NoiseParams::default()).unwrap();
        let text = std::format!("{setup:?}");
        assert!(text.contains("GaborSetup"));
    }

    #[test]
    fn radius_scales_inversely_with_bandwidth() {
        let narrow = GaborSetup::new(&NoiseParams {
            bandwidth: 2.0,
            ..NoiseParams::default()
        })
        .unwrap();
        let wide = GaborSetup::new(&NoiseParams::default()).unwrap();
        assert!((narrow.radius * 2.0 - wide.radius).abs() < 1e-5);
        // Mean impulse count per cell is bandwidth-independent.
        assert!((narrow.mean - wide.mean).abs() < 1e-5);
    }

    #[test]
    fn invalid_bandwidth_fails_fast() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let err = GaborSetup::new(&NoiseParams {
                bandwidth: bad,
                ..NoiseParams::default()
            })
            .unwrap_err();
            assert!(matches!(err, NoiseError::Bandwidth(_)));
        }
    }

    #[test]
    fn invalid_impulse_density_fails_fast() {
        for bad in [0.0, -4.0, 1000.0, f32::NAN] {
            let err = GaborSetup::new(&NoiseParams {
                impulses: bad,
                ..NoiseParams::default()
            })
            .unwrap_err();
            assert!(matches!(err, NoiseError::Impulses { .. }));
        }
    }

    #[test]
    fn anisotropic_direction_is_normalized_or_rejected() {
        let setup = GaborSetup::new(&NoiseParams {
            anisotropic: true,
            direction: [3.0, 0.0, 4.0],
            ..NoiseParams::default()
        })
        .unwrap();
        let d = setup.direction.unwrap();
        assert!((d[0] - 0.6).abs() < 1e-6 && (d[2] - 0.8).abs() < 1e-6);

        let err = GaborSetup::new(&NoiseParams {
            anisotropic: true,
            direction: [0.0, 0.0, 0.0],
            ..NoiseParams::default()
        })
        .unwrap_err();
        assert_eq!(err, NoiseError::Direction);
    }

    #[test]
    fn periods_are_floored_and_clamped_to_at_least_one() {
        let setup = GaborSetup::new(&NoiseParams {
            period: [0.0, 0.25, 7.9],
            ..NoiseParams::default()
        })
        .unwrap();
        assert_eq!(setup.period, [None, Some(1.0), Some(7.0)]);

        let err = GaborSetup::new(&NoiseParams {
            period: [-2.0, 0.0, 0.0],
            ..NoiseParams::default()
        })
        .unwrap_err();
        assert!(matches!(err, NoiseError::Period(_)));
    }
}
