//! Equation of state and primitive/conserved conversion.
//!
//! # Ideal gas
//!
//! ```text
//! E  = p / (γ - 1) + ½ ρ (u² + v²)
//! p  = (γ - 1) (E - ½ ρ (u² + v²))
//! cs = sqrt(γ p / ρ)
//! ```
//!
//! No flooring is applied. A cell with negative pressure yields a NaN
//! sound speed, which the stability limiter carries through to a
//! non-finite time step so the driver can stop the run.

use crate::solver::FieldArray;

use super::state::{ConservedState, N_HYDRO, PrimitiveState};

/// Closure relation for the Euler equations.
///
/// Implementations are pure and shared read-only across parallel work.
pub trait EquationOfState: Send + Sync {
    /// Speed of sound for a primitive state.
    fn speed_of_sound(&self, q: &PrimitiveState) -> f64;

    /// Primitive → conserved.
    fn to_conserved(&self, q: &PrimitiveState) -> ConservedState;

    /// Conserved → primitive.
    fn to_primitive(&self, u: &ConservedState) -> PrimitiveState;

    /// Temperature in units where the gas constant is one (`p / ρ`).
    #[inline]
    fn temperature(&self, q: &PrimitiveState) -> f64 {
        q.p / q.rho
    }

    /// Convert a whole conserved array (ghosts included) to primitive variables.
    ///
    /// Passive scalars are stored as `ρφ` in `u` and written as `φ` to `q`.
    fn cons_to_prim(&self, u: &FieldArray, q: &mut FieldArray) {
        assert!(u.same_shape(q), "conserved/primitive arrays differ in shape");
        let n_fields = u.n_fields();

        let convert = |(q_cell, u_cell): (&mut [f64], &[f64])| {
            let prim = self.to_primitive(&ConservedState::from_slice(u_cell));
            prim.write_to(q_cell);
            for f in N_HYDRO..n_fields {
                q_cell[f] = u_cell[f] / prim.rho;
            }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            q.data
                .par_chunks_mut(n_fields)
                .zip(u.data.par_chunks(n_fields))
                .for_each(convert);
        }
        #[cfg(not(feature = "parallel"))]
        {
            q.data
                .chunks_mut(n_fields)
                .zip(u.data.chunks(n_fields))
                .for_each(convert);
        }
    }

    /// Convert a whole primitive array (ghosts included) to conserved variables.
    fn prim_to_cons(&self, q: &FieldArray, u: &mut FieldArray) {
        assert!(u.same_shape(q), "conserved/primitive arrays differ in shape");
        let n_fields = q.n_fields();

        let convert = |(u_cell, q_cell): (&mut [f64], &[f64])| {
            let prim = PrimitiveState::from_slice(q_cell);
            self.to_conserved(&prim).write_to(u_cell);
            for f in N_HYDRO..n_fields {
                u_cell[f] = q_cell[f] * prim.rho;
            }
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            u.data
                .par_chunks_mut(n_fields)
                .zip(q.data.par_chunks(n_fields))
                .for_each(convert);
        }
        #[cfg(not(feature = "parallel"))]
        {
            u.data
                .chunks_mut(n_fields)
                .zip(q.data.chunks(n_fields))
                .for_each(convert);
        }
    }
}

/// Calorically perfect gas with constant adiabatic index.
///
/// # Example
/// ```
/// use fv_rs::equations::{EquationOfState, IdealGas, PrimitiveState};
///
/// let eos = IdealGas::new(1.4);
/// let cs = eos.speed_of_sound(&PrimitiveState::at_rest(1.0, 1.0));
/// assert!((cs - 1.4_f64.sqrt()).abs() < 1e-14);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdealGas {
    /// Adiabatic index γ
    pub gamma: f64,
}

impl Default for IdealGas {
    fn default() -> Self {
        Self { gamma: 1.4 }
    }
}

impl IdealGas {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    /// Kinetic energy density ½ρ|u|².
    #[inline]
    fn kinetic(rho: f64, u: f64, v: f64) -> f64 {
        0.5 * rho * (u * u + v * v)
    }
}

impl EquationOfState for IdealGas {
    #[inline]
    fn speed_of_sound(&self, q: &PrimitiveState) -> f64 {
        (self.gamma * q.p / q.rho).sqrt()
    }

    #[inline]
    fn to_conserved(&self, q: &PrimitiveState) -> ConservedState {
        ConservedState {
            rho: q.rho,
            rho_u: q.rho * q.u,
            rho_v: q.rho * q.v,
            e: q.p / (self.gamma - 1.0) + Self::kinetic(q.rho, q.u, q.v),
        }
    }

    #[inline]
    fn to_primitive(&self, u: &ConservedState) -> PrimitiveState {
        let vx = u.rho_u / u.rho;
        let vy = u.rho_v / u.rho;
        PrimitiveState {
            rho: u.rho,
            u: vx,
            v: vy,
            p: (self.gamma - 1.0) * (u.e - Self::kinetic(u.rho, vx, vy)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{IP, IR, IU};
    use crate::mesh::Grid;
    use approx::assert_relative_eq;

    #[test]
    fn test_sound_speed_reference_state() {
        let eos = IdealGas::default();
        let cs = eos.speed_of_sound(&PrimitiveState::at_rest(1.0, 1.0));
        assert_relative_eq!(cs, 1.183_215_956_619_923_2, max_relative = 1e-12);
    }

    #[test]
    fn test_negative_pressure_gives_nan_sound_speed() {
        let eos = IdealGas::default();
        let cs = eos.speed_of_sound(&PrimitiveState::at_rest(1.0, -0.1));
        assert!(cs.is_nan());
    }

    #[test]
    fn test_state_conversion_inverts() {
        let eos = IdealGas::new(5.0 / 3.0);
        let q = PrimitiveState::new(0.7, 1.2, -0.4, 2.5);
        let back = eos.to_primitive(&eos.to_conserved(&q));
        assert_relative_eq!(back.rho, q.rho, max_relative = 1e-14);
        assert_relative_eq!(back.u, q.u, max_relative = 1e-14);
        assert_relative_eq!(back.v, q.v, max_relative = 1e-14);
        assert_relative_eq!(back.p, q.p, max_relative = 1e-13);
    }

    #[test]
    fn test_array_conversion_handles_passive_scalars() {
        let eos = IdealGas::default();
        let grid = Grid::uniform(3, 2, 1, 0.0, 1.0, 0.0, 1.0);
        let mut q = FieldArray::new(&grid, N_HYDRO + 1);
        for j in 0..grid.nty() {
            for i in 0..grid.ntx() {
                q.set_primitive(i, j, &PrimitiveState::new(2.0, 0.5, 0.0, 1.0));
                q.set(i, j, N_HYDRO, 0.25);
            }
        }

        let mut u = FieldArray::new(&grid, N_HYDRO + 1);
        eos.prim_to_cons(&q, &mut u);
        assert_relative_eq!(u.get(1, 1, IU), 1.0);
        assert_relative_eq!(u.get(1, 1, N_HYDRO), 0.5);

        let mut q2 = FieldArray::new(&grid, N_HYDRO + 1);
        eos.cons_to_prim(&u, &mut q2);
        assert_relative_eq!(q2.get(2, 1, IR), 2.0);
        assert_relative_eq!(q2.get(2, 1, IP), 1.0, max_relative = 1e-14);
        assert_relative_eq!(q2.get(0, 0, N_HYDRO), 0.25, max_relative = 1e-14);
    }
}
