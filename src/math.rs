//! # Polynomial Transcendentals
//!
//! SIMD-vectorized sin, cos and exp via range reduction plus Taylor
//! polynomials, evaluated with Horner's method. Accuracy is ~1e-6 relative,
//! ample for noise synthesis, and because only IEEE add/mul/floor and bit
//! operations are involved, every backend produces bit-identical results —
//! which the determinism contract of the noise requires. No libm calls on
//! the hot path.

use crate::field::{Field, IntField};

pub(crate) const PI: f32 = core::f32::consts::PI;
pub(crate) const TWO_PI: f32 = 2.0 * PI;

const PI_INV: f32 = 1.0 / PI;

/// Range reduction: map angle x to [-π/2, π/2].
///
/// Returns `(reduced_x, sign)` with `x = k*π + reduced_x` and `sign` +1 for
/// even k, -1 for odd k.
#[inline(always)]
fn range_reduce_half_pi(x: Field) -> (Field, Field) {
    // k = round(x / π) = floor(x/π + 0.5)
    let k = (x * Field::splat(PI_INV) + Field::splat(0.5)).floor();
    let reduced = x - k * Field::splat(PI);

    // k is an integer-valued float; k/2 has fraction 0.5 exactly when k is
    // odd, so the parity falls out of a floor without integer conversion.
    let half_k = k * Field::splat(0.5);
    let is_odd = ((half_k - half_k.floor()) * Field::splat(2.0)).abs();
    let sign = Field::splat(1.0) - Field::splat(2.0) * is_odd;

    (reduced, sign)
}

/// Taylor approximation of sin(x), valid for any finite x.
#[inline(always)]
pub(crate) fn fast_sin(x: Field) -> Field {
    let (x, sign) = range_reduce_half_pi(x);

    // x - x^3/6 + x^5/120 - x^7/5040 + x^9/362880 - x^11/39916800
    const C1: f32 = 1.0;
    const C3: f32 = -1.0 / 6.0;
    const C5: f32 = 1.0 / 120.0;
    const C7: f32 = -1.0 / 5040.0;
    const C9: f32 = 1.0 / 362880.0;
    const C11: f32 = -1.0 / 39916800.0;

    let x2 = x * x;
    let poly = ((((Field::splat(C11) * x2 + Field::splat(C9)) * x2 + Field::splat(C7)) * x2
        + Field::splat(C5))
        * x2
        + Field::splat(C3))
        * x2
        + Field::splat(C1);

    poly * x * sign
}

/// Taylor approximation of cos(x), valid for any finite x.
#[inline(always)]
pub(crate) fn fast_cos(x: Field) -> Field {
    let (x, sign) = range_reduce_half_pi(x);

    // 1 - x^2/2 + x^4/24 - x^6/720 + x^8/40320 - x^10/3628800
    const C0: f32 = 1.0;
    const C2: f32 = -1.0 / 2.0;
    const C4: f32 = 1.0 / 24.0;
    const C6: f32 = -1.0 / 720.0;
    const C8: f32 = 1.0 / 40320.0;
    const C10: f32 = -1.0 / 3628800.0;

    let x2 = x * x;
    let poly = ((((Field::splat(C10) * x2 + Field::splat(C8)) * x2 + Field::splat(C6)) * x2
        + Field::splat(C4))
        * x2
        + Field::splat(C2))
        * x2
        + Field::splat(C0);

    poly * sign
}

/// Taylor approximation of exp(x).
///
/// Reduces by powers of two (`exp(x) = 2^n · exp(r)`, |r| ≤ ln2/2) with the
/// classic split-constant subtraction for a high-precision remainder, then
/// rebuilds 2^n directly in the exponent bits. Inputs are clamped to the
/// finite range of f32; the envelope and filter math only ever feed it
/// values whose clamped tails are indistinguishable from 0.
#[inline(always)]
pub(crate) fn fast_exp(x: Field) -> Field {
    const LOG2_E: f32 = core::f32::consts::LOG2_E;
    // C1 + C2 = ln 2, with C1 exactly representable.
    const C1: f32 = 0.693359375;
    const C2: f32 = -2.12194440e-4;

    let x = x.max(Field::splat(-87.0)).min(Field::splat(88.0));

    let n = (x * Field::splat(LOG2_E) + Field::splat(0.5)).floor();
    let r = x - n * Field::splat(C1);
    let r = r - n * Field::splat(C2);

    // exp(r) = 1 + r + r^2/2 + ... + r^6/720
    let poly = Field::splat(1.0 / 720.0);
    let poly = poly * r + Field::splat(1.0 / 120.0);
    let poly = poly * r + Field::splat(1.0 / 24.0);
    let poly = poly * r + Field::splat(1.0 / 6.0);
    let poly = poly * r + Field::splat(0.5);
    let poly = poly * r + Field::splat(1.0);
    let poly = poly * r + Field::splat(1.0);

    // 2^n assembled in the exponent field; n is in [-126, 127] after the
    // input clamp.
    let scale = (n.to_int_trunc() + IntField::splat(127)).shl(23).bitcast_f32();

    poly * scale
}
