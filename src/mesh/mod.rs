//! Structured 2D grids and their geometry.
//!
//! A [`Grid`] is a rectangle of `nx × ny` interior cells padded by
//! `nghost` layers of ghost cells on every side. Arrays indexed by
//! `(i, j)` cover the padded extent `ntx × nty`; the interior occupies
//! `ibeg..iend` × `jbeg..jend`.
//!
//! Cell sizes are queried through the [`Geometry`] trait so that the
//! stability limiter never assumes a particular spacing.

mod geometry;
mod grid;

pub use geometry::{Axis, CartesianGeometry, Geometry};
pub use grid::Grid;
