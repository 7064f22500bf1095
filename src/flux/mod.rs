//! Numerical interface fluxes for the 2D Euler equations.
//!
//! Fluxes are evaluated from primitive cell states along a grid axis; no
//! rotation is needed on a Cartesian grid.

mod rusanov;

pub use rusanov::{euler_flux, rusanov_flux};
