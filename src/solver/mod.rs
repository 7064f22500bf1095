//! Time-step control and state advancement.
//!
//! - [`FieldArray`]: ghost-padded storage shared by primitive, conserved
//!   and scratch state
//! - [`StabilityLimiter`]: grid-wide reduction of the hyperbolic, thermal
//!   and viscous stability constraints into one admissible `dt`
//! - [`Update`]: the step advancing conserved state, with
//!   [`GodunovUpdate`] as the reference scheme

mod compute_dt;
mod field;
mod update;

pub use compute_dt::{InverseTimescales, StabilityLimiter, StabilityParams};
pub use field::FieldArray;
pub use update::{GodunovUpdate, Update};
