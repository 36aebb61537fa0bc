//! # Batch Primitives
//!
//! `Field` is a fixed-width batch of `f32` lanes, `IntField` the matching
//! batch of `u32` lanes and `Mask` a batch of lane predicates. They wrap the
//! per-architecture backend registers and are the only arithmetic surface
//! the rest of the crate touches. `Vec3F` and `Vec2F` are small geometric
//! bundles of `Field` lanes.
//!
//! `IntField` arithmetic always wraps modulo 2^32, which is exactly what the
//! hash and RNG layers need.

use crate::backends;
use core::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

/// Number of points processed in lock-step per evaluation call.
pub const PARALLELISM: usize = 4;

/// A SIMD batch of `f32` values, one per lane.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Field(pub(crate) backends::F32x4);

/// A SIMD batch of `u32` values, one per lane. Arithmetic wraps.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct IntField(pub(crate) backends::U32x4);

/// A SIMD batch of boolean lane predicates.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Mask(pub(crate) backends::M32x4);

// ============================================================================
// Field
// ============================================================================

impl Field {
    /// Broadcast one value to every lane.
    #[inline(always)]
    pub fn splat(v: f32) -> Self {
        Self(backends::F32x4::splat(v))
    }

    /// Build from one value per lane.
    #[inline(always)]
    pub fn from_array(v: [f32; PARALLELISM]) -> Self {
        Self(backends::F32x4::from_array(v))
    }

    /// Copy the lanes out.
    #[inline(always)]
    pub fn to_array(self) -> [f32; PARALLELISM] {
        self.0.to_array()
    }

    /// Store all lanes into a fixed-size buffer.
    #[inline(always)]
    pub fn store(self, out: &mut [f32; PARALLELISM]) {
        *out = self.0.to_array();
    }

    /// Lane-wise absolute value.
    #[inline(always)]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Lane-wise square root.
    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self(self.0.sqrt())
    }

    /// Lane-wise round toward negative infinity.
    #[inline(always)]
    pub fn floor(self) -> Self {
        Self(self.0.floor())
    }

    /// Lane-wise minimum.
    #[inline(always)]
    pub fn min(self, rhs: Self) -> Self {
        Self(self.0.min(rhs.0))
    }

    /// Lane-wise maximum.
    #[inline(always)]
    pub fn max(self, rhs: Self) -> Self {
        Self(self.0.max(rhs.0))
    }

    /// Largest value across all lanes.
    #[inline(always)]
    pub fn max_element(self) -> f32 {
        self.0.max_element()
    }

    /// Lane-wise truncating conversion to integer bits (two's complement
    /// for negative inputs).
    #[inline(always)]
    pub fn to_int_trunc(self) -> IntField {
        IntField(self.0.to_int_trunc())
    }

    /// Lane-wise `==`.
    #[inline(always)]
    pub fn eq(self, rhs: Self) -> Mask {
        Mask(self.0.eq(rhs.0))
    }

    /// Lane-wise `<`.
    #[inline(always)]
    pub fn lt(self, rhs: Self) -> Mask {
        Mask(self.0.lt(rhs.0))
    }

    /// Lane-wise `<=`.
    #[inline(always)]
    pub fn le(self, rhs: Self) -> Mask {
        Mask(self.0.le(rhs.0))
    }

    /// Lane-wise `>`.
    #[inline(always)]
    pub fn gt(self, rhs: Self) -> Mask {
        Mask(self.0.gt(rhs.0))
    }

    /// Lane-wise `>=`.
    #[inline(always)]
    pub fn ge(self, rhs: Self) -> Mask {
        Mask(self.0.ge(rhs.0))
    }
}

impl From<f32> for Field {
    #[inline(always)]
    fn from(v: f32) -> Self {
        Self::splat(v)
    }
}

impl Add for Field {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.add(rhs.0))
    }
}

impl Sub for Field {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.sub(rhs.0))
    }
}

impl Mul for Field {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self(self.0.mul(rhs.0))
    }
}

impl Div for Field {
    type Output = Self;
    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self(self.0.div(rhs.0))
    }
}

impl Neg for Field {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self(self.0.neg())
    }
}

// ============================================================================
// IntField
// ============================================================================

impl IntField {
    /// Broadcast one value to every lane.
    #[inline(always)]
    pub fn splat(v: u32) -> Self {
        Self(backends::U32x4::splat(v))
    }

    /// Build from one value per lane.
    #[inline(always)]
    pub fn from_array(v: [u32; PARALLELISM]) -> Self {
        Self(backends::U32x4::from_array(v))
    }

    /// Copy the lanes out.
    #[inline(always)]
    pub fn to_array(self) -> [u32; PARALLELISM] {
        self.0.to_array()
    }

    /// Lane-wise wrapping multiply (low 32 bits of the product).
    #[inline(always)]
    pub fn wrapping_mul(self, rhs: Self) -> Self {
        Self(self.0.mul(rhs.0))
    }

    /// Lane-wise rotate left. `k` must be in `1..32`.
    #[inline(always)]
    pub fn rotl(self, k: u32) -> Self {
        Self(self.0.shl(k).or(self.0.shr(32 - k)))
    }

    /// Logical left shift. `k` must be below 32.
    #[inline(always)]
    pub fn shl(self, k: u32) -> Self {
        Self(self.0.shl(k))
    }

    /// Exact lane-wise unsigned conversion (`u32 as f32` semantics).
    #[inline(always)]
    pub fn to_f32(self) -> Field {
        Field(self.0.to_f32())
    }

    /// Reinterpret lane bits as `f32`.
    #[inline(always)]
    pub fn bitcast_f32(self) -> Field {
        Field(self.0.bitcast_f32())
    }

    /// Lane-wise `==`.
    #[inline(always)]
    pub fn eq(self, rhs: Self) -> Mask {
        Mask(self.0.eq(rhs.0))
    }
}

impl Add for IntField {
    type Output = Self;
    /// Wrapping addition.
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.add(rhs.0))
    }
}

impl Sub for IntField {
    type Output = Self;
    /// Wrapping subtraction.
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.sub(rhs.0))
    }
}

impl BitXor for IntField {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0.xor(rhs.0))
    }
}

impl BitAnd for IntField {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0.and(rhs.0))
    }
}

impl BitOr for IntField {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0.or(rhs.0))
    }
}

// ============================================================================
// Mask
// ============================================================================

impl Mask {
    /// Mask with every lane set.
    #[inline(always)]
    pub fn all_true() -> Self {
        Self(backends::M32x4::all_true())
    }

    /// Mask with no lane set.
    #[inline(always)]
    pub fn all_false() -> Self {
        Self(backends::M32x4::all_false())
    }

    /// True if at least one lane is set.
    #[inline(always)]
    pub fn any(self) -> bool {
        self.0.any()
    }

    /// True if every lane is set.
    #[inline(always)]
    pub fn all(self) -> bool {
        self.0.all()
    }

    /// Branchless select: `if_true` where set, `if_false` elsewhere.
    #[inline(always)]
    pub fn select(self, if_true: Field, if_false: Field) -> Field {
        Field(self.0.select_f32(if_true.0, if_false.0))
    }

    /// Integer-lane counterpart of [`Mask::select`].
    #[inline(always)]
    pub fn select_int(self, if_true: IntField, if_false: IntField) -> IntField {
        IntField(self.0.select_u32(if_true.0, if_false.0))
    }
}

impl BitAnd for Mask {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0.and(rhs.0))
    }
}

impl BitOr for Mask {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0.or(rhs.0))
    }
}

impl Not for Mask {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Self(self.0.not())
    }
}

// ============================================================================
// Lane Vectors
// ============================================================================

/// Three `Field` components, one 3-vector per lane.
#[derive(Copy, Clone, Debug)]
pub struct Vec3F {
    /// x components, one per lane.
    pub x: Field,
    /// y components, one per lane.
    pub y: Field,
    /// z components, one per lane.
    pub z: Field,
}

impl Vec3F {
    /// Broadcast one scalar vector to every lane.
    #[inline(always)]
    pub fn broadcast(v: [f32; 3]) -> Self {
        Self {
            x: Field::splat(v[0]),
            y: Field::splat(v[1]),
            z: Field::splat(v[2]),
        }
    }

    /// Lane-wise dot product.
    #[inline(always)]
    pub fn dot(self, rhs: Self) -> Field {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Lane-wise squared length.
    #[inline(always)]
    pub fn length2(self) -> Field {
        self.dot(self)
    }

    /// Lane-wise cross product.
    #[inline(always)]
    pub fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Multiply every component by `k`.
    #[inline(always)]
    pub fn scale(self, k: Field) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
            z: self.z * k,
        }
    }

    /// Scale to unit length. Callers must guarantee a non-zero input.
    #[inline(always)]
    pub fn normalize(self) -> Self {
        self.scale(Field::splat(1.0) / self.length2().sqrt())
    }
}

/// Two `Field` components, one 2-vector per lane.
#[derive(Copy, Clone, Debug)]
pub struct Vec2F {
    /// x components, one per lane.
    pub x: Field,
    /// y components, one per lane.
    pub y: Field,
}

impl Vec2F {
    /// Lane-wise dot product.
    #[inline(always)]
    pub fn dot(self, rhs: Self) -> Field {
        self.x * rhs.x + self.y * rhs.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotl_matches_scalar_rotate() {
        let v = IntField::from_array([0x8000_0001, 0xdead_beef, 1, 0]);
        for k in [4u32, 14, 25] {
            let got = v.rotl(k).to_array();
            let src = v.to_array();
            for i in 0..PARALLELISM {
                assert_eq!(got[i], src[i].rotate_left(k));
            }
        }
    }

    #[test]
    fn int_add_and_sub_wrap() {
        let a = IntField::splat(0xffff_fffe);
        let b = IntField::splat(5);
        assert_eq!((a + b).to_array(), [3; PARALLELISM]);
        assert_eq!((b - a).to_array(), [7; PARALLELISM]);
    }

    #[test]
    fn cross_of_axes_is_right_handed() {
        let x = Vec3F::broadcast([1.0, 0.0, 0.0]);
        let y = Vec3F::broadcast([0.0, 1.0, 0.0]);
        let z = x.cross(y);
        assert_eq!(z.x.to_array()[0], 0.0);
        assert_eq!(z.y.to_array()[0], 0.0);
        assert_eq!(z.z.to_array()[0], 1.0);
    }

    #[test]
    fn to_int_trunc_preserves_negative_cell_coords() {
        let v = Field::from_array([-1.0, -3.0, 2.0, 0.0]);
        let got = v.to_int_trunc().to_array();
        assert_eq!(got, [(-1i32) as u32, (-3i32) as u32, 2, 0]);
    }
}
