//! Per-side values with named fields.

use std::fmt;

use serde::Deserialize;

/// One value per domain side.
///
/// Named fields avoid remembering whether an array is ordered
/// `[south, east, north, west]` or `[west, east, south, north]`.
///
/// # Example
///
/// ```
/// use fv_rs::types::SideBoundaries;
/// use fv_rs::boundary::BoundaryKind;
///
/// let bcs = SideBoundaries::new(
///     BoundaryKind::Reflecting,   // south
///     BoundaryKind::Transmissive, // east
///     BoundaryKind::Reflecting,   // north
///     BoundaryKind::Transmissive, // west
/// );
///
/// assert_eq!(bcs.south, BoundaryKind::Reflecting);
/// assert_eq!(bcs.east, BoundaryKind::Transmissive);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct SideBoundaries<T> {
    /// South boundary (y = y_min)
    pub south: T,
    /// East boundary (x = x_max)
    pub east: T,
    /// North boundary (y = y_max)
    pub north: T,
    /// West boundary (x = x_min)
    pub west: T,
}

impl<T> SideBoundaries<T> {
    /// Order: south, east, north, west (counterclockwise from bottom)
    pub fn new(south: T, east: T, north: T, west: T) -> Self {
        Self {
            south,
            east,
            north,
            west,
        }
    }

    /// Create with the same value on all sides.
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            south: value.clone(),
            east: value.clone(),
            north: value.clone(),
            west: value,
        }
    }
}

impl<T: Default> Default for SideBoundaries<T> {
    fn default() -> Self {
        Self {
            south: T::default(),
            east: T::default(),
            north: T::default(),
            west: T::default(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for SideBoundaries<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "S:{} E:{} N:{} W:{}",
            self.south, self.east, self.north, self.west
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform() {
        let sides = SideBoundaries::uniform(7);
        assert_eq!(sides, SideBoundaries::new(7, 7, 7, 7));
    }

    #[test]
    fn test_display() {
        let sides = SideBoundaries::new(1, 2, 3, 4);
        assert_eq!(sides.to_string(), "S:1 E:2 N:3 W:4");
    }
}
