//! # x86_64 Backend (SSE2)
//!
//! Four-lane registers over the SSE2 baseline, which every x86_64 target
//! guarantees, so no runtime feature detection is needed. SSE2 predates a
//! few conveniences this crate needs, and the gaps are synthesized here:
//!
//! - 32-bit lane multiply (`_mm_mullo_epi32` is SSE4.1): built from two
//!   `_mm_mul_epu32` widening multiplies and a repack.
//! - `floor` (`_mm_floor_ps` is SSE4.1): truncate, then subtract one where
//!   truncation rounded toward zero from below.
//! - unsigned u32 → f32 conversion (`_mm_cvtepi32_ps` is signed): split each
//!   lane into 16-bit halves, convert both exactly, and recombine with a
//!   single rounding step so the result matches `u32 as f32` bit for bit.

use core::arch::x86_64::*;

/// Four packed `f32` lanes.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct F32x4(pub(crate) __m128);

/// Four packed `u32` lanes. All arithmetic wraps modulo 2^32.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct U32x4(pub(crate) __m128i);

/// Four lane predicates, stored as all-ones / all-zeros float lanes.
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct M32x4(pub(crate) __m128);

// ============================================================================
// F32x4
// ============================================================================

impl F32x4 {
    #[inline(always)]
    pub fn splat(v: f32) -> Self {
        unsafe { Self(_mm_set1_ps(v)) }
    }

    #[inline(always)]
    pub fn from_array(v: [f32; 4]) -> Self {
        unsafe { Self(_mm_loadu_ps(v.as_ptr())) }
    }

    #[inline(always)]
    pub fn to_array(self) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe { _mm_storeu_ps(out.as_mut_ptr(), self.0) };
        out
    }

    #[inline(always)]
    pub fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm_mul_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn div(self, rhs: Self) -> Self {
        unsafe { Self(_mm_div_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn neg(self) -> Self {
        unsafe { Self(_mm_xor_ps(self.0, _mm_set1_ps(-0.0))) }
    }

    #[inline(always)]
    pub fn abs(self) -> Self {
        unsafe { Self(_mm_and_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(0x7fff_ffff)))) }
    }

    #[inline(always)]
    pub fn sqrt(self) -> Self {
        unsafe { Self(_mm_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    pub fn min(self, rhs: Self) -> Self {
        unsafe { Self(_mm_min_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn max(self, rhs: Self) -> Self {
        unsafe { Self(_mm_max_ps(self.0, rhs.0)) }
    }

    /// Largest value across all four lanes.
    #[inline(always)]
    pub fn max_element(self) -> f32 {
        unsafe {
            let hi = _mm_movehl_ps(self.0, self.0);
            let m = _mm_max_ps(self.0, hi);
            let m = _mm_max_ps(m, _mm_shuffle_ps::<0b01>(m, m));
            _mm_cvtss_f32(m)
        }
    }

    /// Round toward negative infinity. Lane magnitudes must stay below 2^31.
    #[inline(always)]
    pub fn floor(self) -> Self {
        unsafe {
            let trunc = _mm_cvtepi32_ps(_mm_cvttps_epi32(self.0));
            // trunc > x only for negative non-integers; step those down by one.
            let stepped = _mm_cmplt_ps(self.0, trunc);
            Self(_mm_add_ps(trunc, _mm_and_ps(stepped, _mm_set1_ps(-1.0))))
        }
    }

    /// Truncating conversion to integer lanes (two's complement bits).
    #[inline(always)]
    pub fn to_int_trunc(self) -> U32x4 {
        unsafe { U32x4(_mm_cvttps_epi32(self.0)) }
    }

    #[inline(always)]
    pub fn eq(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(_mm_cmpeq_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn lt(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(_mm_cmplt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn le(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(_mm_cmple_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn gt(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(_mm_cmpgt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn ge(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(_mm_cmpge_ps(self.0, rhs.0)) }
    }
}

// ============================================================================
// U32x4
// ============================================================================

impl U32x4 {
    #[inline(always)]
    pub fn splat(v: u32) -> Self {
        unsafe { Self(_mm_set1_epi32(v as i32)) }
    }

    #[inline(always)]
    pub fn from_array(v: [u32; 4]) -> Self {
        unsafe { Self(_mm_loadu_si128(v.as_ptr() as *const __m128i)) }
    }

    #[inline(always)]
    pub fn to_array(self) -> [u32; 4] {
        let mut out = [0u32; 4];
        unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0) };
        out
    }

    #[inline(always)]
    pub fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_epi32(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_epi32(self.0, rhs.0)) }
    }

    /// Low 32 bits of the lane-wise product (wrapping multiply).
    #[inline(always)]
    pub fn mul(self, rhs: Self) -> Self {
        unsafe {
            let even = _mm_mul_epu32(self.0, rhs.0);
            let odd = _mm_mul_epu32(_mm_srli_si128::<4>(self.0), _mm_srli_si128::<4>(rhs.0));
            let even_lo = _mm_shuffle_epi32::<0b10_00_10_00>(even);
            let odd_lo = _mm_shuffle_epi32::<0b10_00_10_00>(odd);
            Self(_mm_unpacklo_epi32(even_lo, odd_lo))
        }
    }

    #[inline(always)]
    pub fn xor(self, rhs: Self) -> Self {
        unsafe { Self(_mm_xor_si128(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn and(self, rhs: Self) -> Self {
        unsafe { Self(_mm_and_si128(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn or(self, rhs: Self) -> Self {
        unsafe { Self(_mm_or_si128(self.0, rhs.0)) }
    }

    /// Logical left shift of every lane. `k` must be below 32.
    #[inline(always)]
    pub fn shl(self, k: u32) -> Self {
        unsafe { Self(_mm_sll_epi32(self.0, _mm_cvtsi32_si128(k as i32))) }
    }

    /// Logical right shift of every lane. `k` must be below 32.
    #[inline(always)]
    pub fn shr(self, k: u32) -> Self {
        unsafe { Self(_mm_srl_epi32(self.0, _mm_cvtsi32_si128(k as i32))) }
    }

    /// Exact unsigned conversion, identical to `u32 as f32` per lane.
    #[inline(always)]
    pub fn to_f32(self) -> F32x4 {
        unsafe {
            let hi = _mm_srli_epi32::<16>(self.0);
            let lo = _mm_and_si128(self.0, _mm_set1_epi32(0xffff));
            let hi_f = _mm_mul_ps(_mm_cvtepi32_ps(hi), _mm_set1_ps(65536.0));
            // Both halves convert exactly; the final add is the only rounding.
            F32x4(_mm_add_ps(hi_f, _mm_cvtepi32_ps(lo)))
        }
    }

    #[inline(always)]
    pub fn bitcast_f32(self) -> F32x4 {
        unsafe { F32x4(_mm_castsi128_ps(self.0)) }
    }

    #[inline(always)]
    pub fn eq(self, rhs: Self) -> M32x4 {
        unsafe { M32x4(_mm_castsi128_ps(_mm_cmpeq_epi32(self.0, rhs.0))) }
    }
}

// ============================================================================
// M32x4
// ============================================================================

impl M32x4 {
    #[inline(always)]
    pub fn all_true() -> Self {
        unsafe { Self(_mm_castsi128_ps(_mm_set1_epi32(-1))) }
    }

    #[inline(always)]
    pub fn all_false() -> Self {
        unsafe { Self(_mm_setzero_ps()) }
    }

    #[inline(always)]
    pub fn any(self) -> bool {
        unsafe { _mm_movemask_ps(self.0) != 0 }
    }

    #[inline(always)]
    pub fn all(self) -> bool {
        unsafe { _mm_movemask_ps(self.0) == 0b1111 }
    }

    #[inline(always)]
    pub fn and(self, rhs: Self) -> Self {
        unsafe { Self(_mm_and_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn or(self, rhs: Self) -> Self {
        unsafe { Self(_mm_or_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    pub fn not(self) -> Self {
        unsafe { Self(_mm_xor_ps(self.0, _mm_castsi128_ps(_mm_set1_epi32(-1)))) }
    }

    #[inline(always)]
    pub fn select_f32(self, if_true: F32x4, if_false: F32x4) -> F32x4 {
        unsafe {
            F32x4(_mm_or_ps(
                _mm_and_ps(self.0, if_true.0),
                _mm_andnot_ps(self.0, if_false.0),
            ))
        }
    }

    #[inline(always)]
    pub fn select_u32(self, if_true: U32x4, if_false: U32x4) -> U32x4 {
        unsafe {
            let m = _mm_castps_si128(self.0);
            U32x4(_mm_or_si128(
                _mm_and_si128(m, if_true.0),
                _mm_andnot_si128(m, if_false.0),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_matches_wrapping_scalar_multiply() {
        let a = U32x4::from_array([3_039_177_861, 0xffff_ffff, 12345, 1]);
        let b = U32x4::from_array([2_502_242_556, 0xffff_ffff, 6789, 3_039_177_861]);
        let got = a.mul(b).to_array();
        let a = a.to_array();
        let b = b.to_array();
        for i in 0..4 {
            assert_eq!(got[i], a[i].wrapping_mul(b[i]));
        }
    }

    #[test]
    fn to_f32_matches_as_cast_exactly() {
        let v = [0u32, 1, 0xffff_ffff, 2_502_242_556];
        let got = U32x4::from_array(v).to_f32().to_array();
        for i in 0..4 {
            assert_eq!(got[i].to_bits(), (v[i] as f32).to_bits());
        }
    }

    #[test]
    fn floor_handles_negative_fractions() {
        let v = F32x4::from_array([-0.5, -1.0, 2.75, -2.25]);
        assert_eq!(v.floor().to_array(), [-1.0, -1.0, 2.0, -3.0]);
    }

    #[test]
    fn max_element_scans_all_lanes() {
        assert_eq!(F32x4::from_array([1.0, 7.0, -2.0, 3.0]).max_element(), 7.0);
        assert_eq!(F32x4::from_array([9.0, 7.0, -2.0, 3.0]).max_element(), 9.0);
        assert_eq!(F32x4::from_array([1.0, 2.0, 3.0, 8.0]).max_element(), 8.0);
    }

    #[test]
    fn select_blends_per_lane() {
        let m = F32x4::from_array([1.0, 5.0, 3.0, 0.0]).gt(F32x4::splat(2.0));
        let out = m.select_f32(F32x4::splat(1.0), F32x4::splat(-1.0)).to_array();
        assert_eq!(out, [-1.0, 1.0, 1.0, -1.0]);
    }
}
