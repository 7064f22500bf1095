//! Ghost-cell boundary conditions for the structured grid.
//!
//! Ghost layers are filled before every update so that interface fluxes
//! at the domain edge see a neighbour state.
//!
//! | Kind | Ghost state |
//! |------|-------------|
//! | `Transmissive` | Copy of the nearest interior cell (zero gradient) |
//! | `Reflecting` | Mirror image with the normal velocity reversed |
//! | `Periodic` | Copy from the opposite side of the domain |
//!
//! Periodic sides must be paired (west with east, south with north).

mod fill;

pub use fill::{BoundaryKind, fill_ghosts};
