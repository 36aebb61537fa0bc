//! # Dual Numbers over Field Lanes
//!
//! A `Dual<N>` carries a batch of values plus `N` derivative slots, each a
//! full `Field`, and propagates derivatives through every operation by exact
//! chain rule — never finite differences. The noise API fixes `N = 2`
//! (the two surface parameters a shading system differentiates against),
//! exported as [`Dual2`].
//!
//! Operations are plain value-type functions with explicit derivative
//! arithmetic, so the rules are visible at each call site.

use crate::field::{Field, Mask, Vec2F, Vec3F};
use crate::math::{fast_cos, fast_exp, fast_sin};
use core::ops::{Add, Mul, Neg, Sub};

/// A batch of scalar values with `N` partial-derivative slots.
#[derive(Copy, Clone, Debug)]
pub struct Dual<const N: usize> {
    /// The value lanes.
    pub val: Field,
    /// One derivative batch per independent parameter.
    pub partials: [Field; N],
}

/// Dual value with the two surface-parameter slots the noise API uses.
pub type Dual2 = Dual<2>;

impl<const N: usize> Dual<N> {
    /// A value with no dependence on any parameter.
    #[inline(always)]
    pub fn constant(val: Field) -> Self {
        Self {
            val,
            partials: [Field::splat(0.0); N],
        }
    }

    /// The `I`-th independent variable: unit derivative in slot `I`.
    #[inline(always)]
    pub fn var<const I: usize>(val: Field) -> Self {
        const { assert!(I < N) }
        let mut partials = [Field::splat(0.0); N];
        partials[I] = Field::splat(1.0);
        Self { val, partials }
    }

    /// Constant zero.
    #[inline(always)]
    pub fn zero() -> Self {
        Self::constant(Field::splat(0.0))
    }

    /// Multiply by a derivative-free factor.
    #[inline(always)]
    pub fn scale(self, k: Field) -> Self {
        Self {
            val: self.val * k,
            partials: self.partials.map(|d| d * k),
        }
    }

    /// exp(f)' = exp(f) · f'
    #[inline(always)]
    pub fn exp(self) -> Self {
        let e = fast_exp(self.val);
        Self {
            val: e,
            partials: self.partials.map(|d| e * d),
        }
    }

    /// cos(f)' = -sin(f) · f'
    #[inline(always)]
    pub fn cos(self) -> Self {
        let c = fast_cos(self.val);
        let neg_s = -fast_sin(self.val);
        Self {
            val: c,
            partials: self.partials.map(|d| neg_s * d),
        }
    }

    /// Floor of the value. The derivative is zero almost everywhere, so the
    /// result is a constant.
    #[inline(always)]
    pub fn floor(self) -> Self {
        Self::constant(self.val.floor())
    }

    /// Lane-wise select across value and every derivative slot.
    #[inline(always)]
    pub fn select(mask: Mask, if_true: Self, if_false: Self) -> Self {
        let mut partials = [Field::splat(0.0); N];
        for i in 0..N {
            partials[i] = mask.select(if_true.partials[i], if_false.partials[i]);
        }
        Self {
            val: mask.select(if_true.val, if_false.val),
            partials,
        }
    }
}

impl<const N: usize> Add for Dual<N> {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        let mut partials = self.partials;
        for i in 0..N {
            partials[i] = partials[i] + rhs.partials[i];
        }
        Self {
            val: self.val + rhs.val,
            partials,
        }
    }
}

impl<const N: usize> Sub for Dual<N> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        let mut partials = self.partials;
        for i in 0..N {
            partials[i] = partials[i] - rhs.partials[i];
        }
        Self {
            val: self.val - rhs.val,
            partials,
        }
    }
}

impl<const N: usize> Mul for Dual<N> {
    type Output = Self;
    /// (f · g)' = f' · g + f · g'
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        let mut partials = [Field::splat(0.0); N];
        for i in 0..N {
            partials[i] = self.partials[i] * rhs.val + self.val * rhs.partials[i];
        }
        Self {
            val: self.val * rhs.val,
            partials,
        }
    }
}

impl<const N: usize> Neg for Dual<N> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            val: -self.val,
            partials: self.partials.map(|d| -d),
        }
    }
}

/// A 3-vector of dual values.
#[derive(Copy, Clone, Debug)]
pub struct DualVec3<const N: usize> {
    /// x component.
    pub x: Dual<N>,
    /// y component.
    pub y: Dual<N>,
    /// z component.
    pub z: Dual<N>,
}

impl<const N: usize> DualVec3<N> {
    /// Dot product with full derivative propagation.
    #[inline(always)]
    pub fn dot(self, rhs: Self) -> Dual<N> {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Dot product against a derivative-free vector.
    #[inline(always)]
    pub fn dot_vec(self, v: Vec3F) -> Dual<N> {
        self.x.scale(v.x) + self.y.scale(v.y) + self.z.scale(v.z)
    }

    /// Squared length.
    #[inline(always)]
    pub fn length2(self) -> Dual<N> {
        self.dot(self)
    }

    /// Subtract a derivative-free vector.
    #[inline(always)]
    pub fn sub_vec(self, v: Vec3F) -> Self {
        Self {
            x: self.x - Dual::constant(v.x),
            y: self.y - Dual::constant(v.y),
            z: self.z - Dual::constant(v.z),
        }
    }

    /// Multiply every component by a derivative-free factor.
    #[inline(always)]
    pub fn scale(self, k: Field) -> Self {
        Self {
            x: self.x.scale(k),
            y: self.y.scale(k),
            z: self.z.scale(k),
        }
    }

    /// The value lanes without their derivatives.
    #[inline(always)]
    pub fn value(self) -> Vec3F {
        Vec3F {
            x: self.x.val,
            y: self.y.val,
            z: self.z.val,
        }
    }
}

/// A 2-vector of dual values.
#[derive(Copy, Clone, Debug)]
pub struct DualVec2<const N: usize> {
    /// x component.
    pub x: Dual<N>,
    /// y component.
    pub y: Dual<N>,
}

impl<const N: usize> DualVec2<N> {
    /// Squared length.
    #[inline(always)]
    pub fn length2(self) -> Dual<N> {
        self.x * self.x + self.y * self.y
    }

    /// Dot product against a derivative-free vector.
    #[inline(always)]
    pub fn dot_vec(self, v: Vec2F) -> Dual<N> {
        self.x.scale(v.x) + self.y.scale(v.y)
    }
}
