//! State advancement by one explicit step.
//!
//! The driver calls [`Update::advance`] with the primitive state of the
//! current cycle and a scratch buffer holding a copy of the conserved
//! state. The update overwrites the scratch buffer with the conserved
//! state at `t + dt`.

use std::sync::Arc;

use tracing::trace;

use crate::boundary::{BoundaryKind, fill_ghosts};
use crate::equations::{EquationOfState, IE, IU, IV, PrimitiveState};
use crate::flux::rusanov_flux;
use crate::mesh::{Axis, Grid};
use crate::physics::TransportCoefficient;
use crate::types::{Iteration, SideBoundaries};

use super::FieldArray;

/// Advances conserved state by one step.
///
/// `q` may be modified (ghost cells are refreshed); `u_new` enters holding
/// the conserved state at `t` and leaves holding it at `t + dt`.
pub trait Update {
    fn advance(&self, q: &mut FieldArray, u_new: &mut FieldArray, dt: f64, iteration: Iteration);
}

impl<F> Update for F
where
    F: Fn(&mut FieldArray, &mut FieldArray, f64, Iteration),
{
    fn advance(&self, q: &mut FieldArray, u_new: &mut FieldArray, dt: f64, iteration: Iteration) {
        self(q, u_new, dt, iteration)
    }
}

/// First-order Godunov-type finite-volume update with Rusanov fluxes.
///
/// Optional heat conduction and viscosity add central-difference diffusive
/// face fluxes (no cross-derivative terms):
///
/// ```text
/// F_E   += -κ (T_R - T_L) / Δ
/// F_ρu  += -μ (u_R - u_L) / Δ
/// F_ρv  += -μ (v_R - v_L) / Δ
/// F_E   += -(ū τ_u + v̄ τ_v)
/// ```
pub struct GodunovUpdate<E: EquationOfState> {
    grid: Grid,
    eos: E,
    boundaries: SideBoundaries<BoundaryKind>,
    conductivity: Option<Arc<dyn TransportCoefficient>>,
    viscosity: Option<Arc<dyn TransportCoefficient>>,
}

impl<E: EquationOfState> GodunovUpdate<E> {
    pub fn new(grid: Grid, eos: E, boundaries: SideBoundaries<BoundaryKind>) -> Self {
        Self {
            grid,
            eos,
            boundaries,
            conductivity: None,
            viscosity: None,
        }
    }

    /// Enable heat conduction.
    pub fn with_conductivity(mut self, kappa: Arc<dyn TransportCoefficient>) -> Self {
        self.conductivity = Some(kappa);
        self
    }

    /// Enable viscous stresses.
    pub fn with_viscosity(mut self, mu: Arc<dyn TransportCoefficient>) -> Self {
        self.viscosity = Some(mu);
        self
    }

    /// Total flux through the face between `left` and `right` (cell indices) along `axis`.
    fn face_flux(
        &self,
        q: &FieldArray,
        left: (usize, usize),
        right: (usize, usize),
        axis: Axis,
        flux: &mut [f64],
    ) {
        let cell_l = q.cell(left.0, left.1);
        let cell_r = q.cell(right.0, right.1);
        rusanov_flux(&self.eos, cell_l, cell_r, axis, flux);

        if self.conductivity.is_none() && self.viscosity.is_none() {
            return;
        }

        let spacing = match axis {
            Axis::X => self.grid.dx(),
            Axis::Y => self.grid.dy(),
        };
        let q_l = PrimitiveState::from_slice(cell_l);
        let q_r = PrimitiveState::from_slice(cell_r);

        if let Some(kappa) = &self.conductivity {
            let k = 0.5 * (kappa.coefficient(left.0, left.1) + kappa.coefficient(right.0, right.1));
            let dt_dx = (self.eos.temperature(&q_r) - self.eos.temperature(&q_l)) / spacing;
            flux[IE] -= k * dt_dx;
        }

        if let Some(mu) = &self.viscosity {
            let m = 0.5 * (mu.coefficient(left.0, left.1) + mu.coefficient(right.0, right.1));
            let tau_u = m * (q_r.u - q_l.u) / spacing;
            let tau_v = m * (q_r.v - q_l.v) / spacing;
            let u_face = 0.5 * (q_l.u + q_r.u);
            let v_face = 0.5 * (q_l.v + q_r.v);
            flux[IU] -= tau_u;
            flux[IV] -= tau_v;
            flux[IE] -= u_face * tau_u + v_face * tau_v;
        }
    }

    /// Apply the flux divergence to one row of the scratch buffer.
    fn update_row(&self, q: &FieldArray, j: usize, row: &mut [f64], dt: f64) {
        let n = q.n_fields();
        let dtdx = dt / self.grid.dx();
        let dtdy = dt / self.grid.dy();

        let mut f_minus = vec![0.0; n];
        let mut f_plus = vec![0.0; n];
        let mut g_minus = vec![0.0; n];
        let mut g_plus = vec![0.0; n];

        for i in self.grid.interior_cols() {
            self.face_flux(q, (i - 1, j), (i, j), Axis::X, &mut f_minus);
            self.face_flux(q, (i, j), (i + 1, j), Axis::X, &mut f_plus);
            self.face_flux(q, (i, j - 1), (i, j), Axis::Y, &mut g_minus);
            self.face_flux(q, (i, j), (i, j + 1), Axis::Y, &mut g_plus);

            let cell = &mut row[i * n..(i + 1) * n];
            for k in 0..n {
                cell[k] -= dtdx * (f_plus[k] - f_minus[k]) + dtdy * (g_plus[k] - g_minus[k]);
            }
        }
    }
}

impl<E: EquationOfState> Update for GodunovUpdate<E> {
    fn advance(&self, q: &mut FieldArray, u_new: &mut FieldArray, dt: f64, iteration: Iteration) {
        debug_assert!(q.same_shape(u_new), "primitive/scratch arrays differ in shape");

        fill_ghosts(q, &self.grid, &self.boundaries);
        let q: &FieldArray = q;
        let row_len = u_new.row_len();
        let rows = self.grid.interior_rows();

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            u_new
                .data
                .par_chunks_mut(row_len)
                .enumerate()
                .filter(|(j, _)| rows.contains(j))
                .for_each(|(j, row)| self.update_row(q, j, row, dt));
        }
        #[cfg(not(feature = "parallel"))]
        {
            u_new
                .data
                .chunks_mut(row_len)
                .enumerate()
                .filter(|(j, _)| rows.contains(j))
                .for_each(|(j, row)| self.update_row(q, j, row, dt));
        }

        trace!(%iteration, dt, "state advanced");
    }
}
