//! Interior cell counts of a structured grid.

use std::fmt;

/// Number of interior cells in each direction.
///
/// # Example
///
/// ```
/// use fv_rs::types::Resolution2D;
///
/// let res = Resolution2D::new(128, 64);
/// assert_eq!(res.nx(), 128);
/// assert_eq!(res.ny(), 64);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution2D {
    nx: usize,
    ny: usize,
}

impl Resolution2D {
    /// Create a new resolution.
    ///
    /// # Panics
    ///
    /// Panics if either `nx` or `ny` is zero.
    pub fn new(nx: usize, ny: usize) -> Self {
        assert!(nx > 0, "nx must be positive, got {}", nx);
        assert!(ny > 0, "ny must be positive, got {}", ny);
        Self { nx, ny }
    }

    /// Number of interior cells in x.
    #[inline]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of interior cells in y.
    #[inline]
    pub fn ny(&self) -> usize {
        self.ny
    }
}

impl fmt::Display for Resolution2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.nx, self.ny)
    }
}
