//! # Scalar Fallback Backend
//!
//! Plain array loops for targets without a dedicated SIMD backend. Uses
//! `libm` for the float primitives `core` does not provide. Semantics match
//! the SIMD backends exactly (IEEE round-to-nearest, wrapping integers),
//! so results are bit-identical across backends.

/// Four `f32` lanes.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F32x4(pub(crate) [f32; 4]);

/// Four `u32` lanes. All arithmetic wraps modulo 2^32.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct U32x4(pub(crate) [u32; 4]);

/// Four lane predicates, stored as all-ones / all-zeros words.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct M32x4(pub(crate) [u32; 4]);

#[inline(always)]
fn map2_f32(a: [f32; 4], b: [f32; 4], f: impl Fn(f32, f32) -> f32) -> [f32; 4] {
    [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3])]
}

#[inline(always)]
fn map2_u32(a: [u32; 4], b: [u32; 4], f: impl Fn(u32, u32) -> u32) -> [u32; 4] {
    [f(a[0], b[0]), f(a[1], b[1]), f(a[2], b[2]), f(a[3], b[3])]
}

#[inline(always)]
fn cmp(a: [f32; 4], b: [f32; 4], f: impl Fn(f32, f32) -> bool) -> M32x4 {
    M32x4([
        if f(a[0], b[0]) { u32::MAX } else { 0 },
        if f(a[1], b[1]) { u32::MAX } else { 0 },
        if f(a[2], b[2]) { u32::MAX } else { 0 },
        if f(a[3], b[3]) { u32::MAX } else { 0 },
    ])
}

// ============================================================================
// F32x4
// ============================================================================

impl F32x4 {
    #[inline(always)]
    pub fn splat(v: f32) -> Self {
        Self([v; 4])
    }

    #[inline(always)]
    pub fn from_array(v: [f32; 4]) -> Self {
        Self(v)
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        self.0
    }

    #[inline(always)]
    pub fn add(self, rhs: Self) -> Self {
        Self(map2_f32(self.0, rhs.0, |a, b| a + b))
    }

    #[inline(always)]
    pub fn sub(self, rhs: Self) -> Self {
        Self(map2_f32(self.0, rhs.0, |a, b| a - b))
    }

    #[inline(always)]
    pub fn mul(self, rhs: Self) -> Self {
        Self(map2_f32(self.0, rhs.0, |a, b| a * b))
    }

    #[inline(always)]
    pub fn div(self, rhs: Self) -> Self {
        Self(map2_f32(self.0, rhs.0, |a, b| a / b))
    }

    #[inline(always)]
    pub fn neg(self) -> Self {
        Self(self.0.map(|a| -a))
    }

    #[inline(always)]
    pub fn abs(self) -> Self {
        Self(self.0.map(libm::fabsf))
    }

    #[inline(always)]
    pub fn sqrt(self) -> Self {
        Self(self.0.map(libm::sqrtf))
    }

    #[inline(always)]
    pub fn min(self, rhs: Self) -> Self {
        Self(map2_f32(self.0, rhs.0, |a, b| if a < b { a } else { b }))
    }

    #[inline(always)]
    pub fn max(self, rhs: Self) -> Self {
        Self(map2_f32(self.0, rhs.0, |a, b| if a > b { a } else { b }))
    }

    /// Largest value across all four lanes.
    #[inline(always)]
    pub fn max_element(self) -> f32 {
        let mut m = self.0[0];
        for v in &self.0[1..] {
            if *v > m {
                m = *v;
            }
        }
        m
    }

    /// Round toward negative infinity.
    #[inline(always)]
    pub fn floor(self) -> Self {
        Self(self.0.map(libm::floorf))
    }

    /// Truncating conversion to integer lanes (two's complement bits).
    #[inline(always)]
    pub fn to_int_trunc(self) -> U32x4 {
        U32x4(self.0.map(|v| v as i32 as u32))
    }

    #[inline(always)]
    pub fn eq(self, rhs: Self) -> M32x4 {
        cmp(self.0, rhs.0, |a, b| a == b)
    }

    #[inline(always)]
    pub fn lt(self, rhs: Self) -> M32x4 {
        cmp(self.0, rhs.0, |a, b| a < b)
    }

    #[inline(always)]
    pub fn le(self, rhs: Self) -> M32x4 {
        cmp(self.0, rhs.0, |a, b| a <= b)
    }

    #[inline(always)]
    pub fn gt(self, rhs: Self) -> M32x4 {
        cmp(self.0, rhs.0, |a, b| a > b)
    }

    #[inline(always)]
    pub fn ge(self, rhs: Self) -> M32x4 {
        cmp(self.0, rhs.0, |a, b| a >= b)
    }
}

// ============================================================================
// U32x4
// ============================================================================

impl U32x4 {
    #[inline(always)]
    pub fn splat(v: u32) -> Self {
        Self([v; 4])
    }

    #[inline(always)]
    pub fn from_array(v: [u32; 4]) -> Self {
        Self(v)
    }

    #[inline(always)]
    pub fn to_array(self) -> [u32; 4] {
        self.0
    }

    #[inline(always)]
    pub fn add(self, rhs: Self) -> Self {
        Self(map2_u32(self.0, rhs.0, u32::wrapping_add))
    }

    #[inline(always)]
    pub fn sub(self, rhs: Self) -> Self {
        Self(map2_u32(self.0, rhs.0, u32::wrapping_sub))
    }

    /// Low 32 bits of the lane-wise product (wrapping multiply).
    #[inline(always)]
    pub fn mul(self, rhs: Self) -> Self {
        Self(map2_u32(self.0, rhs.0, u32::wrapping_mul))
    }

    #[inline(always)]
    pub fn xor(self, rhs: Self) -> Self {
        Self(map2_u32(self.0, rhs.0, |a, b| a ^ b))
    }

    #[inline(always)]
    pub fn and(self, rhs: Self) -> Self {
        Self(map2_u32(self.0, rhs.0, |a, b| a & b))
    }

    #[inline(always)]
    pub fn or(self, rhs: Self) -> Self {
        Self(map2_u32(self.0, rhs.0, |a, b| a | b))
    }

    /// Logical left shift of every lane. `k` must be below 32.
    #[inline(always)]
    pub fn shl(self, k: u32) -> Self {
        Self(self.0.map(|v| v << k))
    }

    /// Logical right shift of every lane. `k` must be below 32.
    #[inline(always)]
    pub fn shr(self, k: u32) -> Self {
        Self(self.0.map(|v| v >> k))
    }

    /// Exact unsigned conversion, identical to `u32 as f32` per lane.
    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        F32x4(self.0.map(|v| v as f32))
    }

    #[inline(always)]
    pub fn bitcast_f32(self) -> F32x4 {
        F32x4(self.0.map(f32::from_bits))
    }

    #[inline(always)]
    pub fn eq(self, rhs: Self) -> M32x4 {
        M32x4(map2_u32(self.0, rhs.0, |a, b| if a == b { u32::MAX } else { 0 }))
    }
}

// ============================================================================
// M32x4
// ============================================================================

impl M32x4 {
    #[inline(always)]
    pub fn all_true() -> Self {
        Self([u32::MAX; 4])
    }

    #[inline(always)]
    pub fn all_false() -> Self {
        Self([0; 4])
    }

    #[inline(always)]
    pub fn any(self) -> bool {
        self.0.iter().any(|m| *m != 0)
    }

    #[inline(always)]
    pub fn all(self) -> bool {
        self.0.iter().all(|m| *m != 0)
    }

    #[inline(always)]
    pub fn and(self, rhs: Self) -> Self {
        Self(map2_u32(self.0, rhs.0, |a, b| a & b))
    }

    #[inline(always)]
    pub fn or(self, rhs: Self) -> Self {
        Self(map2_u32(self.0, rhs.0, |a, b| a | b))
    }

    #[inline(always)]
    pub fn not(self) -> Self {
        Self(self.0.map(|m| !m))
    }

    #[inline(always)]
    pub fn select_f32(self, if_true: F32x4, if_false: F32x4) -> F32x4 {
        let t = if_true.to_array();
        let f = if_false.to_array();
        F32x4([
            if self.0[0] != 0 { t[0] } else { f[0] },
            if self.0[1] != 0 { t[1] } else { f[1] },
            if self.0[2] != 0 { t[2] } else { f[2] },
            if self.0[3] != 0 { t[3] } else { f[3] },
        ])
    }

    #[inline(always)]
    pub fn select_u32(self, if_true: U32x4, if_false: U32x4) -> U32x4 {
        let t = if_true.to_array();
        let f = if_false.to_array();
        U32x4([
            if self.0[0] != 0 { t[0] } else { f[0] },
            if self.0[1] != 0 { t[1] } else { f[1] },
            if self.0[2] != 0 { t[2] } else { f[2] },
            if self.0[3] != 0 { t[3] } else { f[3] },
        ])
    }
}
