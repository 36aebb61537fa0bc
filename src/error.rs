//! Error type for configuration validation and internal limits.

use thiserror::Error;

/// Everything that can go wrong constructing or evaluating a noise.
///
/// All configuration problems are caught once, in [`crate::GaborNoise::new`],
/// before any point is evaluated. The only evaluation-time variant is
/// [`NoiseError::ImpulseOverflow`], an internal-limits guard that valid
/// configurations can never trip.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum NoiseError {
    /// Bandwidth must be finite and strictly positive.
    #[error("bandwidth must be finite and positive, got {0}")]
    Bandwidth(f32),

    /// Impulse density is out of the supported range.
    #[error("impulses per kernel radius must be in (0, {max}], got {got}")]
    Impulses { got: f32, max: f32 },

    /// The anisotropic direction could not be normalized.
    #[error("anisotropic direction must be finite and non-zero")]
    Direction,

    /// The filter covariance is not a usable 2x2 covariance matrix.
    #[error("filter covariance must be finite and positive semi-definite")]
    FilterCovariance,

    /// A tiling period is negative or non-finite.
    #[error("tiling period must be finite and non-negative, got {0}")]
    Period(f32),

    /// The Poisson sampler hit its iteration cap.
    #[error("poisson sampler exceeded its iteration cap (mean = {mean})")]
    ImpulseOverflow { mean: f32 },
}
