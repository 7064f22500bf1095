//! Checkpoint output.
//!
//! The driver persists primitive state through the [`CheckpointSink`]
//! trait. Two sinks are provided:
//!
//! - [`VtkCheckpointWriter`]: one VTK XML ImageData file (`.vti`) per
//!   checkpoint plus a `.pvd` collection for ParaView time series
//! - [`MemoryCheckpoint`]: keeps snapshots in memory

mod checkpoint;
mod vtk;

pub use checkpoint::{CheckpointError, CheckpointRecord, CheckpointSink, MemoryCheckpoint};
pub use vtk::VtkCheckpointWriter;
