//! 2D domain bounds.

use std::fmt;

/// 2D rectangular domain bounds.
///
/// # Example
///
/// ```
/// use fv_rs::types::Bounds2D;
///
/// // Shock tube twice as long as it is wide
/// let bounds = Bounds2D::new(0.0, 2.0, 0.0, 1.0);
///
/// assert_eq!(bounds.width(), 2.0);
/// assert_eq!(bounds.height(), 1.0);
/// assert_eq!(bounds.center(), (1.0, 0.5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2D {
    /// Minimum x-coordinate (western boundary)
    pub x_min: f64,
    /// Maximum x-coordinate (eastern boundary)
    pub x_max: f64,
    /// Minimum y-coordinate (southern boundary)
    pub y_min: f64,
    /// Maximum y-coordinate (northern boundary)
    pub y_max: f64,
}

impl Bounds2D {
    /// Create new domain bounds.
    ///
    /// # Panics
    ///
    /// Panics if `x_max <= x_min` or `y_max <= y_min`. Configuration
    /// validation rejects such bounds before a grid is built.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        assert!(
            x_max > x_min,
            "x_max ({}) must be greater than x_min ({})",
            x_max,
            x_min
        );
        assert!(
            y_max > y_min,
            "y_max ({}) must be greater than y_min ({})",
            y_max,
            y_min
        );

        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Domain width (x_max - x_min).
    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Domain height (y_max - y_min).
    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Domain center point.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }
}

impl fmt::Display for Bounds2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}] × [{:.3}, {:.3}]",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}
