//! # fv-rs
//!
//! An explicit finite-volume solver for the 2D compressible Euler
//! equations on a structured grid, built around stability-limited time
//! stepping.
//!
//! This crate provides:
//! - The stability limiter: a parallel grid-wide reduction of hyperbolic,
//!   thermal and viscous constraints into one admissible time step
//! - The simulation driver: state conversion, checkpoint and diagnostic
//!   cadence, instability abort, explicit status on exit
//! - Collaborators to run end to end: ideal-gas equation of state,
//!   Rusanov finite-volume update, ghost-cell boundaries, VTK checkpoints,
//!   YAML configuration and a small initial-condition catalogue

pub mod boundary;
pub mod config;
pub mod equations;
pub mod flux;
pub mod io;
pub mod mesh;
pub mod physics;
pub mod problem;
pub mod simulation;
pub mod solver;
pub mod types;

// Re-export main types for convenience
pub use boundary::{BoundaryKind, fill_ghosts};
pub use config::{ConfigError, SimulationConfig};
pub use equations::{EquationOfState, IdealGas, PrimitiveState};
pub use io::{CheckpointError, CheckpointSink, MemoryCheckpoint, VtkCheckpointWriter};
pub use mesh::{Axis, CartesianGeometry, Geometry, Grid};
pub use physics::{ConstantCoefficient, TransportCoefficient};
pub use problem::InitialCondition;
pub use simulation::{RunParams, RunStatus, Simulation, SimulationError, SimulationResult};
pub use solver::{
    FieldArray, GodunovUpdate, InverseTimescales, StabilityLimiter, StabilityParams, Update,
};
pub use types::{CheckpointIndex, Iteration, SideBoundaries};
