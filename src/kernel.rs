//! # Gabor Kernel Algebra
//!
//! The harmonic-Gaussian primitive and the two analytic transforms the noise
//! applies to it: slicing a 3D kernel to the 2D tangent plane of a surface,
//! and convolving the sliced kernel with a Gaussian low-pass filter in
//! closed form. Both transforms keep the kernel inside the same family
//! (weight, frequency, phase, bandwidth), which is what makes analytic
//! antialiasing possible.
//!
//! Filtering works in the frequency domain. The kernel's spectrum is a
//! Gaussian lobe of covariance `Σ_G = (a²/2π)·I` centered on the frequency
//! vector; a spatial Gaussian filter of covariance `Σ_s` has transfer
//! function `exp(-2π²·ξᵀΣ_s ξ)`, a Gaussian lobe of covariance
//! `Σ_F = (4π²Σ_s)⁻¹` centered at zero. Their product is again a Gaussian
//! lobe, with
//!
//! ```text
//! Σ_GF = (Σ_G⁻¹ + Σ_F⁻¹)⁻¹            combined covariance
//! ω_f  = Σ_GF·Σ_G⁻¹·ω                  shifted center frequency
//! a_f  = sqrt(2π·sqrt(det Σ_GF))       equivalent isotropic bandwidth
//! w_f  = w·(a_f²/a²)·exp(-½·ωᵀ(Σ_G+Σ_F)⁻¹ω)
//! ```
//!
//! and the phase unchanged. Everything except the `ω`-dependent factors is
//! uniform across a batch and precomputed once at setup.

use crate::dual::{Dual, DualVec2, DualVec3};
use crate::error::NoiseError;
use crate::field::{Field, Vec2F, Vec3F};
use crate::math::{fast_exp, PI, TWO_PI};

/// Determinant floor applied before any covariance inversion.
const DET_FLOOR: f32 = 1e-18;

/// The harmonic-Gaussian primitive in 3D:
/// `w · exp(-π a² |x|²) · cos(2π ω·x + φ)`.
///
/// `weight` and `phi` are dual because slicing gives them derivatives; the
/// unfiltered path passes constants.
#[inline(always)]
pub(crate) fn gabor_kernel3<const N: usize>(
    weight: Dual<N>,
    omega: Vec3F,
    phi: Dual<N>,
    a: f32,
    x: DualVec3<N>,
) -> Dual<N> {
    let envelope = x.length2().scale(Field::splat(-PI * a * a)).exp();
    let harmonic = (x.dot_vec(omega).scale(Field::splat(TWO_PI)) + phi).cos();
    weight * envelope * harmonic
}

/// The 2D counterpart, used after slicing and filtering.
#[inline(always)]
pub(crate) fn gabor_kernel2<const N: usize>(
    weight: Dual<N>,
    omega: Vec2F,
    phi: Dual<N>,
    a: f32,
    x: DualVec2<N>,
) -> Dual<N> {
    let envelope = x.length2().scale(Field::splat(-PI * a * a)).exp();
    let harmonic = (x.dot_vec(omega).scale(Field::splat(TWO_PI)) + phi).cos();
    weight * envelope * harmonic
}

/// Slice a 3D kernel along the frame normal at signed distance `d` from the
/// kernel center, producing the equivalent 2D kernel in the tangent plane:
///
/// ```text
/// w' = w · exp(-π a² d²)
/// ω' = (ω.x, ω.y)
/// φ' = φ - 2π·d·ω.x
/// ```
///
/// `omega` must already be expressed in the frame's local coordinates.
/// `d` carries derivatives, so the sliced weight and phase become dual.
#[inline(always)]
pub(crate) fn slice_gabor_kernel<const N: usize>(
    d: Dual<N>,
    w: Field,
    a: f32,
    omega: Vec3F,
    phi: Field,
) -> (Dual<N>, Vec2F, Dual<N>) {
    let w_s = (d * d).scale(Field::splat(-PI * a * a)).exp().scale(w);
    let omega_s = Vec2F {
        x: omega.x,
        y: omega.y,
    };
    let phi_s = Dual::constant(phi) - d.scale(Field::splat(TWO_PI) * omega.x);
    (w_s, omega_s, phi_s)
}

/// Symmetric 2x2 matrix helper for the filter precomputation. Scalar math
/// only; this runs once per noise setup.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Mat2 {
    pub m00: f32,
    pub m01: f32,
    pub m10: f32,
    pub m11: f32,
}

impl Mat2 {
    fn diagonal(d: f32) -> Self {
        Self {
            m00: d,
            m01: 0.0,
            m10: 0.0,
            m11: d,
        }
    }

    fn det(self) -> f32 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    /// Inverse with the determinant floored away from zero, so near-singular
    /// covariances degrade to very wide (or very tight) Gaussians instead of
    /// producing infinities.
    fn inverse(self) -> Self {
        let det = self.det().max(DET_FLOOR);
        let inv = 1.0 / det;
        Self {
            m00: self.m11 * inv,
            m01: -self.m01 * inv,
            m10: -self.m10 * inv,
            m11: self.m00 * inv,
        }
    }

    fn add(self, rhs: Self) -> Self {
        Self {
            m00: self.m00 + rhs.m00,
            m01: self.m01 + rhs.m01,
            m10: self.m10 + rhs.m10,
            m11: self.m11 + rhs.m11,
        }
    }

    fn mul(self, rhs: Self) -> Self {
        Self {
            m00: self.m00 * rhs.m00 + self.m01 * rhs.m10,
            m01: self.m00 * rhs.m01 + self.m01 * rhs.m11,
            m10: self.m10 * rhs.m00 + self.m11 * rhs.m10,
            m11: self.m10 * rhs.m01 + self.m11 * rhs.m11,
        }
    }

    fn scale(self, k: f32) -> Self {
        Self {
            m00: self.m00 * k,
            m01: self.m01 * k,
            m10: self.m10 * k,
            m11: self.m11 * k,
        }
    }
}

/// Precomputed closed-form Gaussian prefilter for one noise configuration.
///
/// Holds the uniform matrix parts of the frequency-domain convolution; only
/// the per-impulse attenuation and frequency shift remain lane math.
#[derive(Copy, Clone, Debug)]
pub(crate) struct KernelFilter {
    /// `(Σ_G + Σ_F)⁻¹`, the attenuation quadratic form.
    sum_inv: Mat2,
    /// `Σ_GF·Σ_G⁻¹`, applied to the frequency vector.
    freq_xform: Mat2,
    /// Equivalent isotropic bandwidth of the filtered envelope.
    pub a_f: f32,
    /// Amplitude correction `a_f²/a²`.
    gain: f32,
}

impl KernelFilter {
    /// Build from a screen-space filter covariance and the kernel bandwidth.
    ///
    /// Fails on non-finite or indefinite covariance; a zero covariance is
    /// valid and yields the identity filter.
    pub fn new(cov: [[f32; 2]; 2], a: f32) -> Result<Self, NoiseError> {
        for row in &cov {
            for v in row {
                if !v.is_finite() {
                    return Err(NoiseError::FilterCovariance);
                }
            }
        }
        // Covariances are symmetric; average out asymmetry from upstream
        // derivative estimation.
        let off = 0.5 * (cov[0][1] + cov[1][0]);
        let sigma_s = Mat2 {
            m00: cov[0][0],
            m01: off,
            m10: off,
            m11: cov[1][1],
        };
        if sigma_s.m00 < 0.0 || sigma_s.m11 < 0.0 || sigma_s.det() < 0.0 {
            return Err(NoiseError::FilterCovariance);
        }

        let four_pi2 = 4.0 * PI * PI;
        // Frequency-domain lobes: Σ_F⁻¹ = 4π²·Σ_s, Σ_G = (a²/2π)·I. Σ_F
        // itself is never formed; a zero covariance (identity filter) has
        // Σ_F⁻¹ = 0 and everything below stays exact.
        let sigma_f_inv = sigma_s.scale(four_pi2);
        let sg = a * a / TWO_PI;
        let sigma_g_inv = Mat2::diagonal(1.0 / sg);

        let sigma_gf = sigma_g_inv.add(sigma_f_inv).inverse();
        let freq_xform = sigma_gf.mul(sigma_g_inv);
        // (Σ_G + Σ_F)⁻¹ = Σ_G⁻¹ − Σ_G⁻¹·Σ_GF·Σ_G⁻¹.
        let correction = sigma_g_inv.mul(sigma_gf).mul(sigma_g_inv);
        let sum_inv = sigma_g_inv.add(correction.scale(-1.0));
        let a_f = libm::sqrtf(TWO_PI * libm::sqrtf(sigma_gf.det().max(0.0)));
        let gain = a_f * a_f / (a * a);

        Ok(Self {
            sum_inv,
            freq_xform,
            a_f,
            gain,
        })
    }

    /// Apply the filter to one kernel: attenuate the weight by the lobe
    /// overlap at its frequency and shift the frequency toward the filter
    /// passband. Phase is untouched by filtering.
    #[inline(always)]
    pub fn apply<const N: usize>(&self, w: Dual<N>, omega: Vec2F) -> (Dual<N>, Vec2F) {
        let q00 = Field::splat(self.sum_inv.m00);
        let q01 = Field::splat(self.sum_inv.m01 + self.sum_inv.m10);
        let q11 = Field::splat(self.sum_inv.m11);
        let quad = omega.x * omega.x * q00 + omega.x * omega.y * q01 + omega.y * omega.y * q11;
        let atten = fast_exp(quad * Field::splat(-0.5)) * Field::splat(self.gain);

        let omega_f = Vec2F {
            x: omega.x * Field::splat(self.freq_xform.m00)
                + omega.y * Field::splat(self.freq_xform.m01),
            y: omega.x * Field::splat(self.freq_xform.m10)
                + omega.y * Field::splat(self.freq_xform.m11),
        };
        (w.scale(atten), omega_f)
    }
}

/// Complete a right-handed orthonormal basis around unit vector `v`:
/// `a = normalize(cross(v, axis))` with the axis chosen away from `v`
/// (the 0.9 threshold keeps the cross product well-conditioned), then
/// `b = cross(v, a)`.
#[inline(always)]
pub(crate) fn make_orthonormals(v: Vec3F) -> (Vec3F, Vec3F) {
    let use_x = v.x.abs().lt(Field::splat(0.9));
    let axis = Vec3F {
        x: use_x.select(Field::splat(1.0), Field::splat(0.0)),
        y: use_x.select(Field::splat(0.0), Field::splat(1.0)),
        z: Field::splat(0.0),
    };
    let a = v.cross(axis).normalize();
    let b = v.cross(a);
    (a, b)
}
