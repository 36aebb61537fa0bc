//! # Lattice Accumulator
//!
//! The sparse-convolution core: scatter Gabor kernels on a jittered integer
//! lattice and sum every kernel whose truncation sphere covers the query
//! point. The lattice cell size equals the truncation radius, so the home
//! cell plus one neighbor per axis is always a complete cover and the
//! `|x - center|² < radius²` cull discards the rest.
//!
//! All four lanes walk the lattice in lock-step. Poisson counts differ per
//! lane; the impulse loop runs to the maximum count across lanes and lanes
//! past their own count are masked out of both the accumulation and the RNG
//! advancement, so each cell's draw sequence never depends on what else
//! shares the batch.

use crate::config::GaborSetup;
use crate::dual::{Dual2, DualVec2, DualVec3};
use crate::error::NoiseError;
use crate::field::{Field, Mask, Vec3F};
use crate::hash::cell_hash;
use crate::kernel::{gabor_kernel2, gabor_kernel3, make_orthonormals, slice_gabor_kernel};
use crate::math::{fast_cos, fast_sin, TWO_PI};
use crate::rng::CellRng;

/// Per-lane tangent frame for the filtered (surface) evaluation path.
struct Frame {
    n: Vec3F,
    t: Vec3F,
    b: Vec3F,
}

impl Frame {
    /// Build the frame from the position's partial derivatives:
    /// `n = normalize(dP/du × dP/dv)`, falling back to `(0,0,1)` on
    /// degenerate parameterizations, then complete the basis.
    fn from_derivs(p: &DualVec3<2>) -> Self {
        let dpdu = Vec3F {
            x: p.x.partials[0],
            y: p.y.partials[0],
            z: p.z.partials[0],
        };
        let dpdv = Vec3F {
            x: p.x.partials[1],
            y: p.y.partials[1],
            z: p.z.partials[1],
        };
        let raw = dpdu.cross(dpdv);
        let len2 = raw.length2();
        let ok = len2.gt(Field::splat(1e-12));
        let inv = Field::splat(1.0) / len2.max(Field::splat(1e-12)).sqrt();
        let n = Vec3F {
            x: ok.select(raw.x * inv, Field::splat(0.0)),
            y: ok.select(raw.y * inv, Field::splat(0.0)),
            z: ok.select(raw.z * inv, Field::splat(1.0)),
        };
        let (t, b) = make_orthonormals(n);
        Self { n, t, b }
    }
}

/// `s - period·floor(s/period)`, lane-wise on a dual coordinate. The floor
/// term is piecewise constant, so the derivatives of `s` pass through.
#[inline(always)]
fn wrap_dual(s: Dual2, period: f32) -> Dual2 {
    let p = Field::splat(period);
    s - s.scale(Field::splat(1.0) / p).floor().scale(p)
}

/// Same reduction on a plain cell coordinate.
#[inline(always)]
fn wrap_cell(c: Field, period: f32) -> Field {
    let p = Field::splat(period);
    c - (c / p).floor() * p
}

/// Uniform direction on the unit sphere, two draws per lane:
/// longitude first, then the cosine of the colatitude.
#[inline(always)]
fn sample_sphere(rng: &mut CellRng, active: Mask) -> Vec3F {
    let theta = rng.next(active) * Field::splat(TWO_PI);
    let cos_phi = rng.next(active) * Field::splat(2.0) - Field::splat(1.0);
    let sin_phi = (Field::splat(1.0) - cos_phi * cos_phi)
        .max(Field::splat(0.0))
        .sqrt();
    Vec3F {
        x: fast_cos(theta) * sin_phi,
        y: fast_sin(theta) * sin_phi,
        z: cos_phi,
    }
}

/// Evaluate one batch of `PARALLELISM` points with the standard one-cell
/// neighborhood.
#[inline(always)]
pub(crate) fn eval_batch<const CH: usize>(
    setup: &GaborSetup,
    p: DualVec3<2>,
) -> Result<[Dual2; CH], NoiseError> {
    eval_batch_ext(setup, p, 1)
}

/// The accumulator with an explicit neighborhood extent. Anything beyond
/// ±1 is already excluded by the radius cull; the extent knob exists so a
/// test can prove that.
pub(crate) fn eval_batch_ext<const CH: usize>(
    setup: &GaborSetup,
    p: DualVec3<2>,
    extent: i32,
) -> Result<[Dual2; CH], NoiseError> {
    // Work in lattice coordinates: one unit per cell.
    let mut x_g = p.scale(Field::splat(setup.radius_inv));
    if let Some(period) = setup.period[0] {
        x_g.x = wrap_dual(x_g.x, period);
    }
    if let Some(period) = setup.period[1] {
        x_g.y = wrap_dual(x_g.y, period);
    }
    if let Some(period) = setup.period[2] {
        x_g.z = wrap_dual(x_g.z, period);
    }

    let home = Vec3F {
        x: x_g.x.val.floor(),
        y: x_g.y.val.floor(),
        z: x_g.z.val.floor(),
    };
    // Position within the home cell, derivatives intact.
    let x_c = x_g.sub_vec(home);

    let frame = setup.filter.as_ref().map(|_| Frame::from_derivs(&p));

    let mut sum = [Dual2::zero(); CH];
    for di in -extent..=extent {
        for dj in -extent..=extent {
            for dk in -extent..=extent {
                let off = Vec3F {
                    x: Field::splat(di as f32),
                    y: Field::splat(dj as f32),
                    z: Field::splat(dk as f32),
                };
                // Cell identity wraps with the period; geometry does not,
                // which is what makes the lattice tile seamlessly.
                let mut cx = home.x + off.x;
                let mut cy = home.y + off.y;
                let mut cz = home.z + off.z;
                if let Some(period) = setup.period[0] {
                    cx = wrap_cell(cx, period);
                }
                if let Some(period) = setup.period[1] {
                    cy = wrap_cell(cy, period);
                }
                if let Some(period) = setup.period[2] {
                    cz = wrap_cell(cz, period);
                }
                let seed = cell_hash(
                    cx.to_int_trunc(),
                    cy.to_int_trunc(),
                    cz.to_int_trunc(),
                    setup.seed,
                );
                let mut rng = CellRng::new(seed);

                let count = rng.poisson(setup.mean)?;
                let max_n = count.max_element() as usize;
                for n in 0..max_n {
                    let active = Field::splat(n as f32).lt(count);
                    // Impulse center, jittered uniformly inside the cell.
                    let jitter = Vec3F {
                        x: rng.next(active),
                        y: rng.next(active),
                        z: rng.next(active),
                    };
                    let center = Vec3F {
                        x: off.x + jitter.x,
                        y: off.y + jitter.y,
                        z: off.z + jitter.z,
                    };
                    let x_k = x_c.sub_vec(center).scale(Field::splat(setup.radius));
                    let r2 = x_k.value().length2();
                    let within = active & r2.lt(Field::splat(setup.radius2));

                    for channel in sum.iter_mut() {
                        let omega = match setup.direction {
                            Some(d) => Vec3F::broadcast(d),
                            None => sample_sphere(&mut rng, active),
                        };
                        let phi = rng.next(active) * Field::splat(TWO_PI);
                        let sign = rng
                            .next(active)
                            .lt(Field::splat(0.5))
                            .select(Field::splat(1.0), Field::splat(-1.0));

                        let contrib = match (&setup.filter, &frame) {
                            (Some(filter), Some(frame)) => {
                                // Signed distance from the kernel center to
                                // the tangent plane through the query point.
                                let d = -x_k.dot_vec(frame.n);
                                let omega_local = Vec3F {
                                    x: omega.dot(frame.t),
                                    y: omega.dot(frame.b),
                                    z: omega.dot(frame.n),
                                };
                                let (w_s, omega_s, phi_s) =
                                    slice_gabor_kernel(d, sign, setup.a, omega_local, phi);
                                let (w_f, omega_f) = filter.apply(w_s, omega_s);
                                let x_2d = DualVec2 {
                                    x: x_k.dot_vec(frame.t),
                                    y: x_k.dot_vec(frame.b),
                                };
                                gabor_kernel2(w_f, omega_f, phi_s, filter.a_f, x_2d)
                            }
                            _ => gabor_kernel3(
                                Dual2::constant(sign),
                                omega,
                                Dual2::constant(phi),
                                setup.a,
                                x_k,
                            ),
                        };
                        *channel = Dual2::select(within, *channel + contrib, *channel);
                    }
                }
            }
        }
    }

    Ok(sum.map(|s| s.scale(Field::splat(setup.scale))))
}
