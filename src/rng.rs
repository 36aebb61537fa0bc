//! # Per-Cell RNG
//!
//! A multiplicative congruential generator seeded from a lattice-cell hash,
//! one independent stream per lane. The state update is a single wrapping
//! multiply, so a zero state would be an absorbing fixed point; construction
//! forces those lanes to 1.
//!
//! All draws take an `active` mask and only advance the state of active
//! lanes. That keeps each cell's draw sequence identical no matter which
//! other cells happen to share the batch — the determinism contract depends
//! on it, because Poisson counts differ per lane and the impulse loop runs
//! to the maximum count across lanes.

use crate::error::NoiseError;
use crate::field::{Field, IntField, Mask};
use crate::math::fast_exp;

/// Borosh-Niederreiter full-period multiplier for modulus 2^32.
const LCG_MULTIPLIER: u32 = 3_039_177_861;

/// Hard cap on Knuth-method iterations. Validated configurations keep the
/// Poisson mean at most ~15, where 256 iterations is unreachable.
const POISSON_MAX_ITERS: u32 = 256;

/// Exactly 2^-32; the state-to-unit-interval scale.
const UNIT_SCALE: f32 = 1.0 / 4_294_967_296.0;

/// One uniform/Poisson stream per lane, seeded per lattice cell.
pub(crate) struct CellRng {
    state: IntField,
}

impl CellRng {
    /// Seed from a cell hash. Zero lanes are forced to 1.
    #[inline(always)]
    pub fn new(seed: IntField) -> Self {
        let zero = IntField::splat(0);
        Self {
            state: seed.eq(zero).select_int(IntField::splat(1), seed),
        }
    }

    /// Next uniform draw in [0, 1). Only active lanes advance.
    #[inline(always)]
    pub fn next(&mut self, active: Mask) -> Field {
        let advanced = self.state.wrapping_mul(IntField::splat(LCG_MULTIPLIER));
        self.state = active.select_int(advanced, self.state);
        self.state.to_f32() * Field::splat(UNIT_SCALE)
    }

    /// Poisson-distributed count per lane, Knuth's product method in
    /// lock-step: every live lane keeps multiplying uniforms until its
    /// product crosses `e^-mean`; finished lanes stop advancing.
    ///
    /// A zero mean returns zero without consuming a draw.
    pub fn poisson(&mut self, mean: f32) -> Result<Field, NoiseError> {
        if mean == 0.0 {
            return Ok(Field::splat(0.0));
        }
        let g = fast_exp(Field::splat(-mean));
        let one = Field::splat(1.0);

        let mut count = Field::splat(0.0);
        let mut t = self.next(Mask::all_true());
        let mut live = t.gt(g);
        for _ in 0..POISSON_MAX_ITERS {
            if !live.any() {
                return Ok(count);
            }
            count = live.select(count + one, count);
            let u = self.next(live);
            t = live.select(t * u, t);
            live = live & t.gt(g);
        }
        log::error!(
            "poisson sampler exceeded {} iterations (mean = {})",
            POISSON_MAX_ITERS,
            mean
        );
        Err(NoiseError::ImpulseOverflow { mean })
    }
}
