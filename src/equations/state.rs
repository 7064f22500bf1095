//! Per-cell state vectors for the 2D Euler equations.

use std::ops::{Add, Mul, Sub};

/// Density.
pub const IR: usize = 0;
/// x-velocity (primitive) / x-momentum (conserved).
pub const IU: usize = 1;
/// y-velocity (primitive) / y-momentum (conserved).
pub const IV: usize = 2;
/// Pressure (primitive).
pub const IP: usize = 3;
/// Total energy (conserved); shares the slot of [`IP`].
pub const IE: usize = 3;
/// Number of hydrodynamic fields; passive scalars follow.
pub const N_HYDRO: usize = 4;

/// Primitive state: density, velocity, pressure.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PrimitiveState {
    pub rho: f64,
    pub u: f64,
    pub v: f64,
    pub p: f64,
}

impl PrimitiveState {
    #[inline(always)]
    pub fn new(rho: f64, u: f64, v: f64, p: f64) -> Self {
        Self { rho, u, v, p }
    }

    /// State at rest.
    #[inline]
    pub fn at_rest(rho: f64, p: f64) -> Self {
        Self::new(rho, 0.0, 0.0, p)
    }

    /// Read the hydrodynamic fields from a cell slice.
    #[inline(always)]
    pub fn from_slice(cell: &[f64]) -> Self {
        Self {
            rho: cell[IR],
            u: cell[IU],
            v: cell[IV],
            p: cell[IP],
        }
    }

    /// Write the hydrodynamic fields into a cell slice.
    #[inline(always)]
    pub fn write_to(&self, cell: &mut [f64]) {
        cell[IR] = self.rho;
        cell[IU] = self.u;
        cell[IV] = self.v;
        cell[IP] = self.p;
    }
}

/// Conserved state: density, momentum, total energy.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConservedState {
    pub rho: f64,
    pub rho_u: f64,
    pub rho_v: f64,
    pub e: f64,
}

impl ConservedState {
    #[inline(always)]
    pub fn new(rho: f64, rho_u: f64, rho_v: f64, e: f64) -> Self {
        Self {
            rho,
            rho_u,
            rho_v,
            e,
        }
    }

    #[inline(always)]
    pub fn from_slice(cell: &[f64]) -> Self {
        Self {
            rho: cell[IR],
            rho_u: cell[IU],
            rho_v: cell[IV],
            e: cell[IE],
        }
    }

    #[inline(always)]
    pub fn write_to(&self, cell: &mut [f64]) {
        cell[IR] = self.rho;
        cell[IU] = self.rho_u;
        cell[IV] = self.rho_v;
        cell[IE] = self.e;
    }
}

impl Add for ConservedState {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            rho: self.rho + other.rho,
            rho_u: self.rho_u + other.rho_u,
            rho_v: self.rho_v + other.rho_v,
            e: self.e + other.e,
        }
    }
}

impl Sub for ConservedState {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            rho: self.rho - other.rho,
            rho_u: self.rho_u - other.rho_u,
            rho_v: self.rho_v - other.rho_v,
            e: self.e - other.e,
        }
    }
}

impl Mul<f64> for ConservedState {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            rho: self.rho * scalar,
            rho_u: self.rho_u * scalar,
            rho_v: self.rho_v * scalar,
            e: self.e * scalar,
        }
    }
}

impl Mul<ConservedState> for f64 {
    type Output = ConservedState;

    fn mul(self, state: ConservedState) -> ConservedState {
        state * self
    }
}
