//! Conductivity and viscosity providers.

use std::fmt::Debug;

/// Per-cell diffusion coefficient (thermal conductivity κ or dynamic viscosity μ).
///
/// Implementations must be pure for a fixed configuration; they are shared
/// read-only with every task of the parallel stability reduction.
pub trait TransportCoefficient: Debug + Send + Sync {
    /// Coefficient value in cell `(i, j)`. Must be non-negative.
    fn coefficient(&self, i: usize, j: usize) -> f64;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str {
        "transport"
    }
}

/// Spatially uniform coefficient.
///
/// # Example
/// ```
/// use fv_rs::physics::{ConstantCoefficient, TransportCoefficient};
///
/// let kappa = ConstantCoefficient::new(0.01);
/// assert_eq!(kappa.coefficient(3, 7), 0.01);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConstantCoefficient {
    pub value: f64,
}

impl ConstantCoefficient {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl TransportCoefficient for ConstantCoefficient {
    #[inline]
    fn coefficient(&self, _i: usize, _j: usize) -> f64 {
        self.value
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}
