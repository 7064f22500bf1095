//! Stability-limited time step.
//!
//! Every interior cell contributes three local inverse timescales:
//!
//! ```text
//! hyperbolic = (cs + |u|) / dl + (cs + |v|) / dl
//! thermal    = 2 κ / dl²     (conduction active, else ε)
//! viscous    = 2 μ / dl²     (viscosity active, else ε)
//! ```
//!
//! with `dl = min(dx, dy)` of that cell. Each category is reduced to its
//! maximum over the grid and the admissible step is
//!
//! ```text
//! dt = CFL / max(hyperbolic, thermal, viscous)
//! ```
//!
//! The reduction is a fold with an associative, commutative combine, so
//! it runs under any rayon partition. Results across partitions agree up
//! to floating-point reduction order.

use std::sync::Arc;

use tracing::{info, trace};

use crate::equations::EquationOfState;
use crate::mesh::Geometry;
use crate::physics::{ConstantCoefficient, TransportCoefficient};

use super::FieldArray;

/// Parameters of the stability estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StabilityParams {
    /// Courant number
    pub cfl: f64,
    /// Floor for disabled diffusive terms
    pub epsilon: f64,
    pub conduction_active: bool,
    pub viscosity_active: bool,
}

impl Default for StabilityParams {
    fn default() -> Self {
        Self {
            cfl: 0.4,
            epsilon: 1e-6,
            conduction_active: false,
            viscosity_active: false,
        }
    }
}

impl StabilityParams {
    pub fn new(cfl: f64, epsilon: f64) -> Self {
        Self {
            cfl,
            epsilon,
            ..Default::default()
        }
    }

    pub fn with_conduction(mut self, active: bool) -> Self {
        self.conduction_active = active;
        self
    }

    pub fn with_viscosity(mut self, active: bool) -> Self {
        self.viscosity_active = active;
        self
    }
}

/// Maximum of two values that keeps NaN.
///
/// `f64::max` drops a NaN operand, which would hide an invalid cell.
#[inline]
fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}

/// Inverse timescales of the three constraint categories.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseTimescales {
    pub hyperbolic: f64,
    pub thermal: f64,
    pub viscous: f64,
}

impl Default for InverseTimescales {
    fn default() -> Self {
        Self::zero()
    }
}

impl InverseTimescales {
    pub fn new(hyperbolic: f64, thermal: f64, viscous: f64) -> Self {
        Self {
            hyperbolic,
            thermal,
            viscous,
        }
    }

    /// Identity of [`combine`](Self::combine); every category is non-negative.
    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Per-category maximum. NaN in either operand wins.
    #[inline]
    pub fn combine(self, other: Self) -> Self {
        Self {
            hyperbolic: nan_max(self.hyperbolic, other.hyperbolic),
            thermal: nan_max(self.thermal, other.thermal),
            viscous: nan_max(self.viscous, other.viscous),
        }
    }

    /// Largest of the three categories.
    #[inline]
    pub fn max(&self) -> f64 {
        nan_max(nan_max(self.hyperbolic, self.thermal), self.viscous)
    }

    /// `cfl / max()`.
    #[inline]
    pub fn to_dt(&self, cfl: f64) -> f64 {
        cfl / self.max()
    }
}

/// Grid-wide time-step estimator.
///
/// Reads the primitive state and its collaborators only; holds no state
/// between calls.
///
/// # Example
/// ```
/// use fv_rs::equations::{IdealGas, PrimitiveState};
/// use fv_rs::mesh::{CartesianGeometry, Grid};
/// use fv_rs::solver::{FieldArray, StabilityLimiter, StabilityParams};
///
/// let grid = Grid::uniform(10, 10, 2, 0.0, 1.0, 0.0, 1.0);
/// let mut q = FieldArray::new(&grid, 4);
/// for (i, j) in grid.interior_cells() {
///     q.set_primitive(i, j, &PrimitiveState::at_rest(1.0, 1.0));
/// }
///
/// let limiter = StabilityLimiter::new(
///     CartesianGeometry::new(grid),
///     IdealGas::new(1.4),
///     StabilityParams::new(0.4, 1e-6),
/// );
/// let dt = limiter.compute_dt(&q, f64::INFINITY, 0.0, false);
/// assert!((dt - 0.4 / (2.0 * 1.4_f64.sqrt() / 0.1)).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct StabilityLimiter<G: Geometry, E: EquationOfState> {
    geometry: G,
    eos: E,
    params: StabilityParams,
    conductivity: Arc<dyn TransportCoefficient>,
    viscosity: Arc<dyn TransportCoefficient>,
}

impl<G: Geometry, E: EquationOfState> StabilityLimiter<G, E> {
    /// Limiter with zero conductivity and viscosity.
    pub fn new(geometry: G, eos: E, params: StabilityParams) -> Self {
        Self {
            geometry,
            eos,
            params,
            conductivity: Arc::new(ConstantCoefficient::new(0.0)),
            viscosity: Arc::new(ConstantCoefficient::new(0.0)),
        }
    }

    /// Set the thermal conductivity provider.
    pub fn with_conductivity(mut self, kappa: Arc<dyn TransportCoefficient>) -> Self {
        self.conductivity = kappa;
        self
    }

    /// Set the viscosity provider.
    pub fn with_viscosity(mut self, mu: Arc<dyn TransportCoefficient>) -> Self {
        self.viscosity = mu;
        self
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn eos(&self) -> &E {
        &self.eos
    }

    /// Inverse timescales of interior cell `(i, j)`.
    #[inline]
    pub fn local_timescales(&self, q: &FieldArray, i: usize, j: usize) -> InverseTimescales {
        let dl = self.geometry.min_cell_length(i, j);
        let prim = q.primitive(i, j);
        let cs = self.eos.speed_of_sound(&prim);

        let hyperbolic = (cs + prim.u.abs()) / dl + (cs + prim.v.abs()) / dl;

        let thermal = if self.params.conduction_active {
            2.0 * self.conductivity.coefficient(i, j) / (dl * dl)
        } else {
            self.params.epsilon
        };

        let viscous = if self.params.viscosity_active {
            2.0 * self.viscosity.coefficient(i, j) / (dl * dl)
        } else {
            self.params.epsilon
        };

        InverseTimescales::new(hyperbolic, thermal, viscous)
    }

    /// Fold over one interior row.
    fn row_timescales(&self, q: &FieldArray, j: usize) -> InverseTimescales {
        self.geometry
            .grid()
            .interior_cols()
            .map(|i| self.local_timescales(q, i, j))
            .fold(InverseTimescales::zero(), InverseTimescales::combine)
    }

    /// Grid-wide maxima of the three categories.
    pub fn inverse_timescales(&self, q: &FieldArray) -> InverseTimescales {
        debug_assert!(
            q.matches_grid(self.geometry.grid()),
            "primitive array does not match the grid"
        );
        let rows = self.geometry.grid().interior_rows();

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            rows.into_par_iter()
                .map(|j| self.row_timescales(q, j))
                .reduce(InverseTimescales::zero, InverseTimescales::combine)
        }
        #[cfg(not(feature = "parallel"))]
        {
            rows.map(|j| self.row_timescales(q, j))
                .fold(InverseTimescales::zero(), InverseTimescales::combine)
        }
    }

    /// Sequential fold over `cells` in the order given.
    pub fn inverse_timescales_over<I>(&self, q: &FieldArray, cells: I) -> InverseTimescales
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        cells
            .into_iter()
            .map(|(i, j)| self.local_timescales(q, i, j))
            .fold(InverseTimescales::zero(), InverseTimescales::combine)
    }

    /// Largest stable step for the primitive state `q`.
    ///
    /// `max_dt_hint` is an upper bound known to the caller (time to the next
    /// checkpoint). It is recorded at trace level and does not clamp the
    /// result. `t` is used for diagnostics only.
    ///
    /// A non-finite sound speed anywhere yields a non-finite step; the
    /// caller is expected to stop on it.
    pub fn compute_dt(&self, q: &FieldArray, max_dt_hint: f64, t: f64, diagnostics: bool) -> f64 {
        let inv = self.inverse_timescales(q);
        let dt = inv.to_dt(self.params.cfl);

        trace!(dt, max_dt_hint, "stability estimate");

        if diagnostics {
            let dt_hyp = 1.0 / inv.hyperbolic;
            match (self.params.conduction_active, self.params.viscosity_active) {
                (false, false) => info!(t, dt_hyp, "time step"),
                (true, false) => info!(t, dt_hyp, dt_tc = 1.0 / inv.thermal, "time step"),
                (false, true) => info!(t, dt_hyp, dt_visc = 1.0 / inv.viscous, "time step"),
                (true, true) => info!(
                    t,
                    dt_hyp,
                    dt_tc = 1.0 / inv.thermal,
                    dt_visc = 1.0 / inv.viscous,
                    "time step"
                ),
            }
        }

        dt
    }
}
