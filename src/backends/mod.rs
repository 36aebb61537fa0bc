//! # Architecture Backends
//!
//! Each backend exposes the same three four-lane register types: `F32x4`
//! (packed floats), `U32x4` (packed 32-bit integers, wrapping arithmetic)
//! and `M32x4` (lane predicates). The active backend is chosen at compile
//! time from the target architecture; everything above this module is
//! backend-agnostic and sees identical semantics on every target, including
//! rounding (all float ops are IEEE round-to-nearest, and integer-to-float
//! conversion matches `u32 as f32` exactly).

#[cfg(target_arch = "aarch64")]
pub mod arm;
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub mod scalar;
#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub use arm::{F32x4, M32x4, U32x4};
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub use scalar::{F32x4, M32x4, U32x4};
#[cfg(target_arch = "x86_64")]
pub use x86::{F32x4, M32x4, U32x4};
