//! Compressible Euler equations in two dimensions.
//!
//! Primitive variables `(ρ, u, v, p)` and conserved variables
//! `(ρ, ρu, ρv, E)` share one field layout so that a single
//! [`FieldArray`](crate::solver::FieldArray) type stores either:
//!
//! | index | primitive | conserved |
//! |-------|-----------|-----------|
//! | [`IR`] | ρ        | ρ         |
//! | [`IU`] | u        | ρu        |
//! | [`IV`] | v        | ρv        |
//! | [`IP`] / [`IE`] | p | E      |
//! | `4..` | φ (passive scalar) | ρφ |
//!
//! The [`EquationOfState`] trait closes the system: it provides the sound
//! speed consumed by the stability limiter and the conversions between
//! the two representations.

mod equation_of_state;
mod state;

pub use equation_of_state::{EquationOfState, IdealGas};
pub use state::{ConservedState, IE, IP, IR, IU, IV, N_HYDRO, PrimitiveState};
