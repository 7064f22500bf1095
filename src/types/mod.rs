//! Strongly-typed domain types for safer APIs.
//!
//! This module provides newtypes and structured types that keep solver
//! parameters from being mixed up: domain extents, cell counts, per-side
//! boundary choices, and the counters owned by the simulation driver.
//!
//! # Example
//!
//! ```
//! use fv_rs::types::{Bounds2D, CheckpointIndex, Iteration, Resolution2D};
//!
//! let bounds = Bounds2D::new(0.0, 2.0, 0.0, 1.0);
//! assert_eq!(bounds.width(), 2.0);
//!
//! let res = Resolution2D::new(200, 100);
//! assert_eq!(res.nx() * res.ny(), 20_000);
//!
//! let mut ckpt = CheckpointIndex::ZERO;
//! assert_eq!(ckpt.bump().get(), 0);
//! assert_eq!(ckpt.get(), 1);
//! assert_eq!(Iteration::new(7).to_string(), "it7");
//! ```

mod bounds;
mod indices;
mod resolution;
mod sides;

pub use bounds::Bounds2D;
pub use indices::{CheckpointIndex, Iteration};
pub use resolution::Resolution2D;
pub use sides::SideBoundaries;
