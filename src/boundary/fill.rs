//! Ghost fill per side.

use std::fmt;

use serde::Deserialize;
use tracing::trace;

use crate::equations::{IU, IV};
use crate::mesh::{Axis, Grid};
use crate::solver::FieldArray;
use crate::types::SideBoundaries;

/// Boundary treatment of one domain side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Zero-gradient outflow
    #[default]
    Transmissive,
    /// Solid wall
    Reflecting,
    /// Wrap-around to the opposite side
    Periodic,
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryKind::Transmissive => write!(f, "transmissive"),
            BoundaryKind::Reflecting => write!(f, "reflecting"),
            BoundaryKind::Periodic => write!(f, "periodic"),
        }
    }
}

/// Source cell index along one axis for ghost layer `k` (0 = adjacent to the interior).
///
/// `low` selects the ghost layers below `beg`, otherwise those at or above `end`.
#[inline]
fn source_index(kind: BoundaryKind, low: bool, k: usize, beg: usize, end: usize) -> usize {
    match (kind, low) {
        (BoundaryKind::Transmissive, true) => beg,
        (BoundaryKind::Transmissive, false) => end - 1,
        (BoundaryKind::Reflecting, true) => beg + k,
        (BoundaryKind::Reflecting, false) => end - 1 - k,
        (BoundaryKind::Periodic, true) => end - 1 - k,
        (BoundaryKind::Periodic, false) => beg + k,
    }
}

/// Fill one side's ghost layers along `axis`. `lines` are the transverse indices to cover.
fn fill_side(
    q: &mut FieldArray,
    grid: &Grid,
    axis: Axis,
    low: bool,
    kind: BoundaryKind,
    lines: std::ops::Range<usize>,
) {
    let (beg, end, normal) = match axis {
        Axis::X => (grid.ibeg(), grid.iend(), IU),
        Axis::Y => (grid.jbeg(), grid.jend(), IV),
    };

    for k in 0..grid.nghost() {
        let ghost = if low { beg - 1 - k } else { end + k };
        let src = source_index(kind, low, k, beg, end);

        for line in lines.clone() {
            let (from, to) = match axis {
                Axis::X => ((src, line), (ghost, line)),
                Axis::Y => ((line, src), (line, ghost)),
            };
            q.copy_cell(from, to);
            if kind == BoundaryKind::Reflecting {
                let vn = q.get(to.0, to.1, normal);
                q.set(to.0, to.1, normal, -vn);
            }
        }
    }
}

/// Fill every ghost cell of a primitive array.
///
/// The x sides are filled over interior rows first, then the y sides over
/// all columns, so corner ghosts take their values from the x ghosts.
pub fn fill_ghosts(q: &mut FieldArray, grid: &Grid, sides: &SideBoundaries<BoundaryKind>) {
    debug_assert!(q.matches_grid(grid), "array does not match the grid");
    debug_assert!(
        grid.nghost() <= grid.nx().min(grid.ny()),
        "ghost layers wider than the interior"
    );

    fill_side(q, grid, Axis::X, true, sides.west, grid.interior_rows());
    fill_side(q, grid, Axis::X, false, sides.east, grid.interior_rows());
    fill_side(q, grid, Axis::Y, true, sides.south, 0..grid.ntx());
    fill_side(q, grid, Axis::Y, false, sides.north, 0..grid.ntx());

    trace!(boundaries = %sides, "ghost cells filled");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{IR, PrimitiveState};

    fn ramp(grid: &Grid) -> FieldArray {
        let mut q = FieldArray::new(grid, 4);
        for (i, j) in grid.interior_cells() {
            q.set_primitive(i, j, &PrimitiveState::new(1.0 + i as f64 + 10.0 * j as f64, 0.5, -0.25, 1.0));
        }
        q
    }

    #[test]
    fn test_transmissive_copies_edge() {
        let grid = Grid::uniform(4, 4, 2, 0.0, 1.0, 0.0, 1.0);
        let mut q = ramp(&grid);
        fill_ghosts(&mut q, &grid, &SideBoundaries::uniform(BoundaryKind::Transmissive));
        assert_eq!(q.get(0, 3, IR), q.get(2, 3, IR));
        assert_eq!(q.get(7, 3, IR), q.get(5, 3, IR));
        assert_eq!(q.get(3, 0, IR), q.get(3, 2, IR));
        assert_eq!(q.get(0, 0, IR), q.get(2, 2, IR));
    }

    #[test]
    fn test_reflecting_mirrors_and_flips_normal_velocity() {
        let grid = Grid::uniform(4, 4, 2, 0.0, 1.0, 0.0, 1.0);
        let mut q = ramp(&grid);
        fill_ghosts(&mut q, &grid, &SideBoundaries::uniform(BoundaryKind::Reflecting));

        // west: ghost 1 mirrors 2, ghost 0 mirrors 3
        assert_eq!(q.get(1, 3, IR), q.get(2, 3, IR));
        assert_eq!(q.get(0, 3, IR), q.get(3, 3, IR));
        assert_eq!(q.get(1, 3, IU), -0.5);
        assert_eq!(q.get(1, 3, IV), -0.25);

        // north: ghost 6 mirrors 5
        assert_eq!(q.get(3, 6, IR), q.get(3, 5, IR));
        assert_eq!(q.get(3, 6, IV), 0.25);
        assert_eq!(q.get(3, 6, IU), 0.5);
    }

    #[test]
    fn test_periodic_wraps() {
        let grid = Grid::uniform(4, 3, 2, 0.0, 1.0, 0.0, 1.0);
        let mut q = ramp(&grid);
        fill_ghosts(&mut q, &grid, &SideBoundaries::uniform(BoundaryKind::Periodic));
        assert_eq!(q.get(1, 3, IR), q.get(5, 3, IR));
        assert_eq!(q.get(0, 3, IR), q.get(4, 3, IR));
        assert_eq!(q.get(6, 3, IR), q.get(2, 3, IR));
        assert_eq!(q.get(3, 1, IR), q.get(3, 4, IR));
        assert_eq!(q.get(3, 5, IR), q.get(3, 2, IR));
    }

    #[test]
    fn test_display() {
        assert_eq!(BoundaryKind::Reflecting.to_string(), "reflecting");
        assert_eq!(BoundaryKind::default(), BoundaryKind::Transmissive);
    }
}
