//! Rusanov (local Lax-Friedrichs) flux.
//!
//! ```text
//! F* = ½ (F(q_L) + F(q_R)) - ½ λ (U_R - U_L)
//! λ  = max(|u_n,L| + c_L, |u_n,R| + c_R)
//! ```
//!
//! Very dissipative but positivity friendly, which makes it a sound
//! reference for a first-order scheme.

use crate::equations::{ConservedState, EquationOfState, N_HYDRO, PrimitiveState};
use crate::mesh::Axis;

/// Exact Euler flux of a primitive state along `axis`.
#[inline]
pub fn euler_flux<E: EquationOfState + ?Sized>(eos: &E, q: &PrimitiveState, axis: Axis) -> ConservedState {
    let un = match axis {
        Axis::X => q.u,
        Axis::Y => q.v,
    };
    let mut f = eos.to_conserved(q) * un;
    match axis {
        Axis::X => f.rho_u += q.p,
        Axis::Y => f.rho_v += q.p,
    }
    f.e += q.p * un;
    f
}

/// Rusanov flux between primitive cells `left` and `right` along `axis`.
///
/// Writes all `flux.len()` components (hydrodynamic fields, then passive
/// scalars as `ρφ`) and returns the wave speed estimate λ.
pub fn rusanov_flux<E: EquationOfState + ?Sized>(
    eos: &E,
    left: &[f64],
    right: &[f64],
    axis: Axis,
    flux: &mut [f64],
) -> f64 {
    let q_l = PrimitiveState::from_slice(left);
    let q_r = PrimitiveState::from_slice(right);

    let (un_l, un_r) = match axis {
        Axis::X => (q_l.u, q_r.u),
        Axis::Y => (q_l.v, q_r.v),
    };

    let c_l = eos.speed_of_sound(&q_l);
    let c_r = eos.speed_of_sound(&q_r);
    let lambda = (un_l.abs() + c_l).max(un_r.abs() + c_r);

    let u_l = eos.to_conserved(&q_l);
    let u_r = eos.to_conserved(&q_r);
    let f_l = euler_flux(eos, &q_l, axis);
    let f_r = euler_flux(eos, &q_r, axis);

    let f = 0.5 * (f_l + f_r) - 0.5 * lambda * (u_r - u_l);
    f.write_to(flux);

    // Passive scalars ride on the mass flux
    for s in N_HYDRO..flux.len() {
        let c_l = q_l.rho * left[s];
        let c_r = q_r.rho * right[s];
        flux[s] = 0.5 * (c_l * un_l + c_r * un_r) - 0.5 * lambda * (c_r - c_l);
    }

    lambda
}
