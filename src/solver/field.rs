//! Ghost-padded cell storage for multi-variable fields.
//!
//! Values are interleaved per cell:
//! `data[(j * ntx + i) * n_fields + var]` for cell `(i, j)`.
//!
//! Keeping all variables of a cell contiguous makes per-cell state reads
//! (sound speed, flux evaluation) a single slice access, and a full row
//! `j` is one contiguous chunk of `ntx * n_fields` values, which is the
//! unit of parallel work in the update.

use crate::equations::{N_HYDRO, PrimitiveState};
use crate::mesh::Grid;

/// Cell-centred array covering the padded grid (ghost cells included).
///
/// The same container holds primitive state `Q`, conserved state `U`, or the
/// update scratch buffer; the field layout is described in
/// [`equations`](crate::equations).
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArray {
    /// Interleaved cell values
    pub data: Vec<f64>,
    ntx: usize,
    nty: usize,
    n_fields: usize,
}

impl FieldArray {
    /// Zero-initialised array spanning the padded extent of `grid`.
    ///
    /// # Panics
    ///
    /// Panics if `n_fields < N_HYDRO`.
    pub fn new(grid: &Grid, n_fields: usize) -> Self {
        Self::zeros(grid.ntx(), grid.nty(), n_fields)
    }

    /// Zero-initialised array of explicit shape.
    pub fn zeros(ntx: usize, nty: usize, n_fields: usize) -> Self {
        assert!(
            n_fields >= N_HYDRO,
            "need at least {} fields, got {}",
            N_HYDRO,
            n_fields
        );
        Self {
            data: vec![0.0; ntx * nty * n_fields],
            ntx,
            nty,
            n_fields,
        }
    }

    #[inline]
    pub fn ntx(&self) -> usize {
        self.ntx
    }

    #[inline]
    pub fn nty(&self) -> usize {
        self.nty
    }

    /// Variables per cell.
    #[inline]
    pub fn n_fields(&self) -> usize {
        self.n_fields
    }

    /// Passive scalars per cell.
    #[inline]
    pub fn n_passive(&self) -> usize {
        self.n_fields - N_HYDRO
    }

    /// Values per grid row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.ntx * self.n_fields
    }

    /// `(ntx, nty, n_fields)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.ntx, self.nty, self.n_fields)
    }

    /// Whether `other` has identical shape.
    #[inline]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// Whether this array covers the padded extent of `grid`.
    #[inline]
    pub fn matches_grid(&self, grid: &Grid) -> bool {
        self.ntx == grid.ntx() && self.nty == grid.nty()
    }

    #[inline(always)]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.ntx && j < self.nty, "cell ({}, {}) out of range", i, j);
        (j * self.ntx + i) * self.n_fields
    }

    /// All variables of cell `(i, j)`.
    #[inline]
    pub fn cell(&self, i: usize, j: usize) -> &[f64] {
        let base = self.offset(i, j);
        &self.data[base..base + self.n_fields]
    }

    /// All variables of cell `(i, j)`, mutable.
    #[inline]
    pub fn cell_mut(&mut self, i: usize, j: usize) -> &mut [f64] {
        let base = self.offset(i, j);
        let n = self.n_fields;
        &mut self.data[base..base + n]
    }

    /// Single variable of cell `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize, var: usize) -> f64 {
        self.data[self.offset(i, j) + var]
    }

    /// Set a single variable of cell `(i, j)`.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, var: usize, value: f64) {
        let base = self.offset(i, j);
        self.data[base + var] = value;
    }

    /// Hydrodynamic fields of cell `(i, j)` read as primitive variables.
    #[inline]
    pub fn primitive(&self, i: usize, j: usize) -> PrimitiveState {
        PrimitiveState::from_slice(self.cell(i, j))
    }

    #[inline]
    pub fn set_primitive(&mut self, i: usize, j: usize, q: &PrimitiveState) {
        q.write_to(self.cell_mut(i, j));
    }

    /// Copy all variables of cell `from` into cell `to`.
    #[inline]
    pub fn copy_cell(&mut self, from: (usize, usize), to: (usize, usize)) {
        let src = self.offset(from.0, from.1);
        let dst = self.offset(to.0, to.1);
        self.data.copy_within(src..src + self.n_fields, dst);
    }

    /// Overwrite every value with those of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the shapes differ.
    pub fn copy_from(&mut self, other: &Self) {
        assert!(
            self.same_shape(other),
            "shape mismatch: {:?} vs {:?}",
            self.shape(),
            other.shape()
        );
        self.data.copy_from_slice(&other.data);
    }

    /// One interior variable flattened row by row, x fastest.
    pub fn interior_values(&self, grid: &Grid, var: usize) -> Vec<f64> {
        grid.interior_cells()
            .map(|(i, j)| self.get(i, j, var))
            .collect()
    }

    /// Whether every interior value is finite.
    pub fn interior_is_finite(&self, grid: &Grid) -> bool {
        grid.interior_cells()
            .all(|(i, j)| self.cell(i, j).iter().all(|v| v.is_finite()))
    }
}
