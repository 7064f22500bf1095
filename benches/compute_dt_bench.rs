//! Benchmarks for the stability-limited time step.
//!
//! Run with: `cargo bench --bench compute_dt_bench`
//!
//! Measures the grid-wide reduction at several resolutions, with and
//! without the diffusive constraints.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fv_rs::equations::{IdealGas, PrimitiveState};
use fv_rs::mesh::{CartesianGeometry, Grid};
use fv_rs::physics::ConstantCoefficient;
use fv_rs::solver::{FieldArray, StabilityLimiter, StabilityParams};

/// Smoothly varying primitive state so every cell does real work.
fn wavy_state(grid: &Grid) -> FieldArray {
    let mut q = FieldArray::new(grid, 4);
    for (i, j) in grid.interior_cells() {
        let (x, y) = grid.cell_center(i, j);
        let phase = 6.0 * x + 4.0 * y;
        q.set_primitive(
            i,
            j,
            &PrimitiveState::new(1.0 + 0.2 * phase.sin(), 0.5 * phase.cos(), -0.3 * phase.sin(), 1.0 + 0.1 * phase.cos()),
        );
    }
    q
}

fn bench_compute_dt(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_dt");

    for &n in &[64usize, 256, 1024] {
        let grid = Grid::uniform(n, n, 2, 0.0, 1.0, 0.0, 1.0);
        let q = wavy_state(&grid);

        let hyperbolic = StabilityLimiter::new(
            CartesianGeometry::new(grid),
            IdealGas::default(),
            StabilityParams::default(),
        );
        group.bench_with_input(BenchmarkId::new("hyperbolic", n), &q, |b, q| {
            b.iter(|| hyperbolic.compute_dt(black_box(q), f64::INFINITY, 0.0, false))
        });

        let diffusive = StabilityLimiter::new(
            CartesianGeometry::new(grid),
            IdealGas::default(),
            StabilityParams::default().with_conduction(true).with_viscosity(true),
        )
        .with_conductivity(Arc::new(ConstantCoefficient::new(1e-3)))
        .with_viscosity(Arc::new(ConstantCoefficient::new(1e-3)));
        group.bench_with_input(BenchmarkId::new("diffusive", n), &q, |b, q| {
            b.iter(|| diffusive.compute_dt(black_box(q), f64::INFINITY, 0.0, false))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_dt);
criterion_main!(benches);
