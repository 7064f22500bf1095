//! Diffusive transport coefficients.
//!
//! Heat conduction and viscosity enter the solver only through a
//! [`TransportCoefficient`]: the stability limiter samples it per cell to
//! bound the parabolic time step, and the reference update uses it for
//! the diffusive face fluxes. Each coefficient is consulted only when the
//! matching physics flag is active.

mod transport;

pub use transport::{ConstantCoefficient, TransportCoefficient};
