//! Initial conditions.
//!
//! Each problem writes primitive state into the interior cells; ghost
//! cells are filled from the boundary conditions before conversion to
//! conserved variables.
//!
//! The first passive scalar, when present, marks the material that starts
//! on the left (Sod in x), bottom (Sod in y) or inside the disc (blast).

use serde::Deserialize;

use crate::boundary::{BoundaryKind, fill_ghosts};
use crate::equations::{EquationOfState, N_HYDRO, PrimitiveState};
use crate::mesh::Grid;
use crate::solver::FieldArray;
use crate::types::SideBoundaries;

/// Initial-condition catalogue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialCondition {
    /// Constant state everywhere.
    Uniform { rho: f64, u: f64, v: f64, p: f64 },
    /// Sod shock tube along x, interface at the domain centre.
    #[default]
    SodX,
    /// Sod shock tube along y, interface at the domain centre.
    SodY,
    /// Over-pressured disc at rest in a uniform gas of unit density.
    Blast { radius: f64, p_in: f64, p_out: f64 },
}

const SOD_LEFT: PrimitiveState = PrimitiveState {
    rho: 1.0,
    u: 0.0,
    v: 0.0,
    p: 1.0,
};

const SOD_RIGHT: PrimitiveState = PrimitiveState {
    rho: 0.125,
    u: 0.0,
    v: 0.0,
    p: 0.1,
};

impl InitialCondition {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            InitialCondition::Uniform { .. } => "uniform",
            InitialCondition::SodX => "sod_x",
            InitialCondition::SodY => "sod_y",
            InitialCondition::Blast { .. } => "blast",
        }
    }

    /// Primitive state and marker value at physical point `(x, y)`.
    pub fn state_at(&self, grid: &Grid, x: f64, y: f64) -> (PrimitiveState, f64) {
        let (xc, yc) = grid.bounds().center();
        match *self {
            InitialCondition::Uniform { rho, u, v, p } => (PrimitiveState::new(rho, u, v, p), 0.0),
            InitialCondition::SodX => {
                if x < xc {
                    (SOD_LEFT, 1.0)
                } else {
                    (SOD_RIGHT, 0.0)
                }
            }
            InitialCondition::SodY => {
                if y < yc {
                    (SOD_LEFT, 1.0)
                } else {
                    (SOD_RIGHT, 0.0)
                }
            }
            InitialCondition::Blast {
                radius,
                p_in,
                p_out,
            } => {
                let r2 = (x - xc).powi(2) + (y - yc).powi(2);
                if r2 < radius * radius {
                    (PrimitiveState::at_rest(1.0, p_in), 1.0)
                } else {
                    (PrimitiveState::at_rest(1.0, p_out), 0.0)
                }
            }
        }
    }

    /// Fill the interior of a primitive array.
    ///
    /// Passive scalars beyond the first start at zero.
    pub fn apply(&self, grid: &Grid, q: &mut FieldArray) {
        for (i, j) in grid.interior_cells() {
            let (x, y) = grid.cell_center(i, j);
            let (prim, marker) = self.state_at(grid, x, y);
            let cell = q.cell_mut(i, j);
            cell.fill(0.0);
            prim.write_to(cell);
            if cell.len() > N_HYDRO {
                cell[N_HYDRO] = marker;
            }
        }
    }

    /// Conserved initial state, ghosts included.
    pub fn conserved<E: EquationOfState>(
        &self,
        grid: &Grid,
        eos: &E,
        boundaries: &SideBoundaries<BoundaryKind>,
        n_fields: usize,
    ) -> FieldArray {
        let mut q = FieldArray::new(grid, n_fields);
        self.apply(grid, &mut q);
        fill_ghosts(&mut q, grid, boundaries);

        let mut u = FieldArray::new(grid, n_fields);
        eos.prim_to_cons(&q, &mut u);
        u
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{IP, IR, IdealGas};

    #[test]
    fn test_sod_x_splits_at_centre() {
        let grid = Grid::uniform(10, 2, 2, 0.0, 1.0, 0.0, 0.2);
        let mut q = FieldArray::new(&grid, N_HYDRO + 1);
        InitialCondition::SodX.apply(&grid, &mut q);

        assert_eq!(q.get(grid.ibeg(), 2, IR), 1.0);
        assert_eq!(q.get(grid.ibeg(), 2, N_HYDRO), 1.0);
        assert_eq!(q.get(grid.iend() - 1, 2, IR), 0.125);
        assert_eq!(q.get(grid.iend() - 1, 2, IP), 0.1);
        assert_eq!(q.get(grid.iend() - 1, 2, N_HYDRO), 0.0);
    }

    #[test]
    fn test_blast_disc() {
        let grid = Grid::uniform(11, 11, 1, 0.0, 1.0, 0.0, 1.0);
        let ic = InitialCondition::Blast {
            radius: 0.1,
            p_in: 10.0,
            p_out: 0.1,
        };
        let (centre, _) = ic.state_at(&grid, 0.5, 0.5);
        let (corner, _) = ic.state_at(&grid, 0.05, 0.05);
        assert_eq!(centre.p, 10.0);
        assert_eq!(corner.p, 0.1);
    }

    #[test]
    fn test_conserved_fills_ghosts() {
        let grid = Grid::uniform(4, 4, 2, 0.0, 1.0, 0.0, 1.0);
        let ic = InitialCondition::Uniform {
            rho: 2.0,
            u: 0.0,
            v: 0.0,
            p: 0.4,
        };
        let u = ic.conserved(&grid, &IdealGas::default(), &SideBoundaries::default(), N_HYDRO);
        assert_eq!(u.get(0, 0, IR), 2.0);
        assert!((u.get(0, 0, IP) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_tagged() {
        let ic: InitialCondition =
            serde_yaml::from_str("kind: blast\nradius: 0.2\np_in: 5.0\np_out: 0.5\n").unwrap();
        assert_eq!(ic.name(), "blast");
        let ic: InitialCondition = serde_yaml::from_str("kind: sod_y\n").unwrap();
        assert_eq!(ic, InitialCondition::SodY);
    }
}
