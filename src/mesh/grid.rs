//! Ghost-padded structured grid.

use std::ops::Range;

use crate::types::{Bounds2D, Resolution2D};

/// Immutable description of a uniform structured grid with ghost cells.
///
/// # Example
///
/// ```
/// use fv_rs::mesh::Grid;
///
/// let grid = Grid::uniform(10, 5, 2, 0.0, 1.0, 0.0, 0.5);
/// assert_eq!(grid.ntx(), 14);
/// assert_eq!(grid.nty(), 9);
/// assert_eq!(grid.interior_cols(), 2..12);
/// assert!((grid.dx() - 0.1).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    resolution: Resolution2D,
    nghost: usize,
    bounds: Bounds2D,
}

impl Grid {
    /// Create a grid from interior resolution, ghost width and physical bounds.
    pub fn new(resolution: Resolution2D, nghost: usize, bounds: Bounds2D) -> Self {
        Self {
            resolution,
            nghost,
            bounds,
        }
    }

    /// Convenience constructor for a uniform rectangle.
    pub fn uniform(
        nx: usize,
        ny: usize,
        nghost: usize,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    ) -> Self {
        Self::new(
            Resolution2D::new(nx, ny),
            nghost,
            Bounds2D::new(x_min, x_max, y_min, y_max),
        )
    }

    /// Interior cell counts.
    #[inline]
    pub fn resolution(&self) -> Resolution2D {
        self.resolution
    }

    /// Physical extent of the interior.
    #[inline]
    pub fn bounds(&self) -> Bounds2D {
        self.bounds
    }

    /// Number of interior cells in x.
    #[inline]
    pub fn nx(&self) -> usize {
        self.resolution.nx()
    }

    /// Number of interior cells in y.
    #[inline]
    pub fn ny(&self) -> usize {
        self.resolution.ny()
    }

    /// Ghost layers on each side.
    #[inline]
    pub fn nghost(&self) -> usize {
        self.nghost
    }

    /// Total cells in x including ghosts.
    #[inline]
    pub fn ntx(&self) -> usize {
        self.nx() + 2 * self.nghost
    }

    /// Total cells in y including ghosts.
    #[inline]
    pub fn nty(&self) -> usize {
        self.ny() + 2 * self.nghost
    }

    #[inline]
    pub fn ibeg(&self) -> usize {
        self.nghost
    }

    #[inline]
    pub fn iend(&self) -> usize {
        self.nghost + self.nx()
    }

    #[inline]
    pub fn jbeg(&self) -> usize {
        self.nghost
    }

    #[inline]
    pub fn jend(&self) -> usize {
        self.nghost + self.ny()
    }

    /// Interior column range `ibeg..iend`.
    #[inline]
    pub fn interior_cols(&self) -> Range<usize> {
        self.ibeg()..self.iend()
    }

    /// Interior row range `jbeg..jend`.
    #[inline]
    pub fn interior_rows(&self) -> Range<usize> {
        self.jbeg()..self.jend()
    }

    /// Iterate over interior cells, row by row.
    pub fn interior_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.interior_rows()
            .flat_map(move |j| self.interior_cols().map(move |i| (i, j)))
    }

    /// Uniform spacing in x.
    #[inline]
    pub fn dx(&self) -> f64 {
        self.bounds.width() / self.nx() as f64
    }

    /// Uniform spacing in y.
    #[inline]
    pub fn dy(&self) -> f64 {
        self.bounds.height() / self.ny() as f64
    }

    /// Physical centre of cell `(i, j)`; ghost cells extrapolate outside the bounds.
    pub fn cell_center(&self, i: usize, j: usize) -> (f64, f64) {
        let x = self.bounds.x_min + (i as f64 - self.nghost as f64 + 0.5) * self.dx();
        let y = self.bounds.y_min + (j as f64 - self.nghost as f64 + 0.5) * self.dy();
        (x, y)
    }
}
