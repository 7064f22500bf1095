//! Simulation driver.
//!
//! Ties together the stability limiter, the state update and a checkpoint
//! sink into the explicit time-marching loop, with checkpoint and
//! diagnostic cadence and the instability abort.
//!
//! # Example
//! ```
//! use fv_rs::equations::{EquationOfState, IdealGas, PrimitiveState};
//! use fv_rs::io::MemoryCheckpoint;
//! use fv_rs::mesh::{CartesianGeometry, Grid};
//! use fv_rs::simulation::Simulation;
//! use fv_rs::solver::{FieldArray, GodunovUpdate, StabilityLimiter, StabilityParams};
//! use fv_rs::types::SideBoundaries;
//!
//! let grid = Grid::uniform(16, 16, 2, 0.0, 1.0, 0.0, 1.0);
//! let eos = IdealGas::default();
//!
//! let mut q = FieldArray::new(&grid, 4);
//! for (i, j) in grid.interior_cells() {
//!     q.set_primitive(i, j, &PrimitiveState::at_rest(1.0, 1.0));
//! }
//! let mut u = FieldArray::new(&grid, 4);
//! eos.prim_to_cons(&q, &mut u);
//!
//! let limiter = StabilityLimiter::new(CartesianGeometry::new(grid), eos, StabilityParams::default());
//! let update = GodunovUpdate::new(grid, eos, SideBoundaries::default());
//! let mut sim = Simulation::new(limiter, update, MemoryCheckpoint::new())
//!     .with_tend(0.05)
//!     .with_save_freq(0.01);
//!
//! let result = sim.run(&mut u)?;
//! assert!(result.is_success());
//! # Ok::<(), fv_rs::simulation::SimulationError>(())
//! ```

mod runner;

pub use runner::{
    DriverState, LogCountdown, MIN_DT, RunParams, RunStatus, Simulation, SimulationError,
    SimulationResult,
};
