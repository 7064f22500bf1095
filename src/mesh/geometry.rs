//! Cell-length queries.

use std::fmt;

use super::Grid;

/// Coordinate direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Geometry provider: local cell lengths of a structured grid.
///
/// Implementations must be pure for a fixed grid. They are shared
/// read-only across the parallel stability reduction, hence `Sync`.
pub trait Geometry: Send + Sync {
    /// The grid this geometry describes.
    fn grid(&self) -> &Grid;

    /// Length of cell `(i, j)` along `axis`.
    fn cell_length(&self, i: usize, j: usize, axis: Axis) -> f64;

    /// Smallest length of cell `(i, j)` over both axes.
    #[inline]
    fn min_cell_length(&self, i: usize, j: usize) -> f64 {
        self.cell_length(i, j, Axis::X)
            .min(self.cell_length(i, j, Axis::Y))
    }
}

/// Uniform Cartesian spacing taken from the grid.
#[derive(Clone, Copy, Debug)]
pub struct CartesianGeometry {
    grid: Grid,
}

impl CartesianGeometry {
    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }
}

impl Geometry for CartesianGeometry {
    fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    fn cell_length(&self, _i: usize, _j: usize, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.grid.dx(),
            Axis::Y => self.grid.dy(),
        }
    }
}
