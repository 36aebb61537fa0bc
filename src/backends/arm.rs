//! # aarch64 Backend (NEON)
//!
//! NEON is part of the aarch64 baseline, so this backend is always available
//! on that target. Unlike SSE2, NEON has native unsigned multiply, unsigned
//! conversion, round-toward-negative and horizontal reductions, so nothing
//! needs to be synthesized.

use core::arch::aarch64::*;

/// Four packed `f32` lanes.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F32x4(pub(crate) float32x4_t);

/// Four packed `u32` lanes. All arithmetic wraps modulo 2^32.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct U32x4(pub(crate) uint32x4_t);

/// Four lane predicates, stored as all-ones / all-zeros lanes.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct M32x4(pub(crate) uint32x4_t);

// ============================================================================
// F32x4
// ============================================================================

impl F32x4 {
    #[inline(always)]
    pub fn splat(v: f32) -> Self {
        unsafe { Self(vdupq_n_f32(v)) }
    }

    #[inline(always)]
    pub fn from_array(v: [f32; 4]) -> Self {
        unsafe { Self(vld1q_f32(v.as_ptr())) }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { vst1q_f32(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    pub fn add(self, rhs: Self) -> Self {
        unsafe { Self(vaddq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn sub(self, rhs: Self) -> Self {
        unsafe { Self(vsubq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn mul(self, rhs: Self) -> Self {
        unsafe { Self(vmulq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn div(self, rhs: Self) -> Self {
        unsafe { Self(vdivq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn neg(self) -> Self {
        unsafe { Self(vnegq_f32(self.0)) }
    }

    #[inline(always)]
    pub fn abs(self) -> Self {
        unsafe { Self(vabsq_f32(self.0)) }
    }

    #[inline(always)]
    pub fn sqrt(self) -> Self {
        unsafe { Self(vsqrtq_f32(self.0)) }
    }

    #[inline(always)]
    pub fn min(self, rhs: Self) -> Self {
        unsafe { Self(vminq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn max(self, rhs: Self) -> Self {
        unsafe { Self(vmaxq_f32(self.0, rhs.0)) }
    }

    /// Largest value across all four lanes.
    #[inline(always)]
    pub fn max_element(self) -> f32 {
        unsafe { vmaxvq_f32(self.0) }
    }

    /// Round toward negative infinity.
    #[inline(always)]
    pub fn floor(self) -> Self {
        unsafe { Self(vrndmq_f32(self.0)) }
    }

    /// Truncating conversion to integer lanes (two's complement bits).
    #[inline(always)]
    pub fn to_int_trunc(self) -> U32x4 {
        unsafe { U32x4(vreinterpretq_u32_s32(vcvtq_s32_f32(self.0))) }
    }

    #[inline(always)]
    pub fn eq(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(vceqq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn lt(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(vcltq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn le(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(vcleq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn gt(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(vcgtq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn ge(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(vcgeq_f32(self.0, rhs.0)) }
    }
}

// ============================================================================
// U32x4
// ============================================================================

impl U32x4 {
    #[inline(always)]
    pub fn splat(v: u32) -> Self {
        unsafe { Self(vdupq_n_u32(v)) }
    }

    #[inline(always)]
    pub fn from_array(v: [u32; 4]) -> Self {
        unsafe { Self(vld1q_u32(v.as_ptr())) }
    }

    #[inline(always)]
    pub fn to_array(self) -> [u32; 4] {
        let mut out = [0u32; 4];
        unsafe { vst1q_u32(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    pub fn add(self, rhs: Self) -> Self {
        unsafe { Self(vaddq_u32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn sub(self, rhs: Self) -> Self {
        unsafe { Self(vsubq_u32(self.0, rhs.0)) }
    }

    /// Low 32 bits of the lane-wise product (wrapping multiply).
    #[inline(always)]
    pub fn mul(self, rhs: Self) -> Self {
        unsafe { Self(vmulq_u32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn xor(self, rhs: Self) -> Self {
        unsafe { Self(veorq_u32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn and(self, rhs: Self) -> Self {
        unsafe { Self(vandq_u32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn or(self, rhs: Self) -> Self {
        unsafe { Self(vorrq_u32(self.0, rhs.0)) }
    }

    /// Logical left shift of every lane. `k` must be below 32.
    #[inline(always)]
    pub fn shl(self, k: u32) -> Self {
        unsafe { Self(vshlq_u32(self.0, vdupq_n_s32(k as i32))) }
    }

    /// Logical right shift of every lane. `k` must be below 32.
    #[inline(always)]
    pub fn shr(self, k: u32) -> Self {
        unsafe { Self(vshlq_u32(self.0, vdupq_n_s32(-(k as i32)))) }
    }

    /// Exact unsigned conversion, identical to `u32 as f32` per lane.
    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        unsafe { F32x4(vcvtq_f32_u32(self.0)) }
    }

    #[inline(always)]
    pub fn bitcast_f32(self) -> F32x4 {
        unsafe { F32x4(vreinterpretq_f32_u32(self.0)) }
    }

    #[inline(always)]
    pub fn eq(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(vceqq_u32(self.0, rhs.0)) }
    }
}

// ============================================================================
// M32x4
// ============================================================================

impl M32x4 {
    #[inline(always)]
    pub fn all_true() -> Self {
        unsafe { Self(vdupq_n_u32(u32::MAX)) }
    }

    #[inline(always)]
    pub fn all_false() -> Self {
        unsafe { Self(vdupq_n_u32(0)) }
    }

    #[inline(always)]
    pub fn any(self) -> bool {
        unsafe { vmaxvq_u32(self.0) != 0 }
    }

    #[inline(always)]
    pub fn all(self) -> bool {
        unsafe { vminvq_u32(self.0) == u32::MAX }
    }

    #[inline(always)]
    pub fn and(self, rhs: Self) -> Self {
        unsafe { Self(vandq_u32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn or(self, rhs: Self) -> Self {
        unsafe { Self(vorrq_u32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn not(self) -> Self {
        unsafe { Self(vmvnq_u32(self.0)) }
    }

    #[inline(always)]
    pub fn select_f32(self, if_true: F32x4, if_false: F32x4) -> F32x4 {
        unsafe { F32x4(vbslq_f32(self.0, if_true.0, if_false.0)) }
    }

    #[inline(always)]
    pub fn select_u32(self, if_true: U32x4, if_false: U32x4) -> U32x4 {
        unsafe { U32x4(vbslq_u32(self.0, if_true.0, if_false.0)) }
    }
}
