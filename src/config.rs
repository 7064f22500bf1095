//! YAML run configuration.
//!
//! Every section and field has a default, so a file only needs the values
//! it changes:
//!
//! ```yaml
//! mesh:
//!   nx: 200
//!   ny: 100
//!   boundaries: { south: reflecting, east: transmissive, north: reflecting, west: transmissive }
//! physics:
//!   cfl: 0.3
//! run:
//!   tend: 0.25
//!   save_freq: 0.025
//! problem:
//!   kind: sod_x
//! ```
//!
//! The configuration is immutable once loaded; the driver and its
//! collaborators receive the small parameter structs built from it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::boundary::BoundaryKind;
use crate::equations::{IdealGas, N_HYDRO};
use crate::mesh::Grid;
use crate::physics::{ConstantCoefficient, TransportCoefficient};
use crate::problem::InitialCondition;
use crate::simulation::RunParams;
use crate::solver::StabilityParams;
use crate::types::{Bounds2D, Resolution2D, SideBoundaries};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration value `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub nx: usize,
    pub ny: usize,
    pub nghost: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub boundaries: SideBoundaries<BoundaryKind>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gamma: f64,
    pub cfl: f64,
    pub epsilon: f64,
    pub thermal_conductivity_active: bool,
    pub kappa: f64,
    pub viscosity_active: bool,
    pub mu: f64,
    pub n_passive: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub tend: f64,
    pub save_freq: f64,
    pub log_frequency: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub prefix: String,
}

/// Complete run configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub mesh: MeshConfig,
    pub physics: PhysicsConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
    pub problem: InitialCondition,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            nx: 64,
            ny: 64,
            nghost: 2,
            xmin: 0.0,
            xmax: 1.0,
            ymin: 0.0,
            ymax: 1.0,
            boundaries: SideBoundaries::default(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gamma: 1.4,
            cfl: 0.4,
            epsilon: 1e-6,
            thermal_conductivity_active: false,
            kappa: 0.0,
            viscosity_active: false,
            mu: 0.0,
            n_passive: 0,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tend: 0.2,
            save_freq: 0.05,
            log_frequency: 10,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            prefix: "run".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the interior resolution.
    pub fn with_resolution(mut self, nx: usize, ny: usize) -> Self {
        self.mesh.nx = nx;
        self.mesh.ny = ny;
        self
    }

    /// Set the terminal time and checkpoint period.
    pub fn with_run(mut self, tend: f64, save_freq: f64) -> Self {
        self.run.tend = tend;
        self.run.save_freq = save_freq;
        self
    }

    pub fn with_problem(mut self, problem: InitialCondition) -> Self {
        self.problem = problem;
        self
    }

    /// Check every value the solver relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.mesh;
        if m.nx == 0 || m.ny == 0 {
            return Err(invalid("mesh.nx/ny", "grid must have at least one cell per direction"));
        }
        if m.nghost == 0 {
            return Err(invalid("mesh.nghost", "need at least one ghost layer"));
        }
        if m.nghost > m.nx.min(m.ny) {
            return Err(invalid(
                "mesh.nghost",
                format!("{} ghost layers exceed the interior {}x{}", m.nghost, m.nx, m.ny),
            ));
        }
        if !(m.xmax > m.xmin) {
            return Err(invalid("mesh.xmax", format!("xmax ({}) <= xmin ({})", m.xmax, m.xmin)));
        }
        if !(m.ymax > m.ymin) {
            return Err(invalid("mesh.ymax", format!("ymax ({}) <= ymin ({})", m.ymax, m.ymin)));
        }
        let b = &m.boundaries;
        if (b.west == BoundaryKind::Periodic) != (b.east == BoundaryKind::Periodic) {
            return Err(invalid("mesh.boundaries", "periodic west/east must be paired"));
        }
        if (b.south == BoundaryKind::Periodic) != (b.north == BoundaryKind::Periodic) {
            return Err(invalid("mesh.boundaries", "periodic south/north must be paired"));
        }

        let p = &self.physics;
        if !(p.gamma > 1.0) {
            return Err(invalid("physics.gamma", format!("must exceed 1, got {}", p.gamma)));
        }
        if !(p.cfl > 0.0) || !p.cfl.is_finite() {
            return Err(invalid("physics.cfl", format!("must be positive, got {}", p.cfl)));
        }
        if !(p.epsilon > 0.0) {
            return Err(invalid("physics.epsilon", format!("must be positive, got {}", p.epsilon)));
        }
        if !(p.kappa >= 0.0) {
            return Err(invalid("physics.kappa", format!("must be non-negative, got {}", p.kappa)));
        }
        if !(p.mu >= 0.0) {
            return Err(invalid("physics.mu", format!("must be non-negative, got {}", p.mu)));
        }

        let r = &self.run;
        if !(r.tend >= 0.0) {
            return Err(invalid("run.tend", format!("must be non-negative, got {}", r.tend)));
        }
        if !(r.save_freq > 0.0) {
            return Err(invalid("run.save_freq", format!("must be positive, got {}", r.save_freq)));
        }

        if let InitialCondition::Blast { radius, .. } = self.problem
            && !(radius > 0.0)
        {
            return Err(invalid("problem.radius", format!("must be positive, got {}", radius)));
        }

        Ok(())
    }

    pub fn grid(&self) -> Grid {
        let m = &self.mesh;
        Grid::new(
            Resolution2D::new(m.nx, m.ny),
            m.nghost,
            Bounds2D::new(m.xmin, m.xmax, m.ymin, m.ymax),
        )
    }

    pub fn eos(&self) -> IdealGas {
        IdealGas::new(self.physics.gamma)
    }

    /// Variables per cell.
    pub fn n_fields(&self) -> usize {
        N_HYDRO + self.physics.n_passive
    }

    pub fn stability_params(&self) -> StabilityParams {
        StabilityParams::new(self.physics.cfl, self.physics.epsilon)
            .with_conduction(self.physics.thermal_conductivity_active)
            .with_viscosity(self.physics.viscosity_active)
    }

    pub fn run_params(&self) -> RunParams {
        RunParams {
            tend: self.run.tend,
            save_freq: self.run.save_freq,
            log_frequency: self.run.log_frequency,
            epsilon: self.physics.epsilon,
        }
    }

    /// Thermal conductivity provider, if conduction is active.
    pub fn conductivity(&self) -> Option<Arc<dyn TransportCoefficient>> {
        self.physics
            .thermal_conductivity_active
            .then(|| Arc::new(ConstantCoefficient::new(self.physics.kappa)) as Arc<dyn TransportCoefficient>)
    }

    /// Viscosity provider, if viscosity is active.
    pub fn viscosity(&self) -> Option<Arc<dyn TransportCoefficient>> {
        self.physics
            .viscosity_active
            .then(|| Arc::new(ConstantCoefficient::new(self.physics.mu)) as Arc<dyn TransportCoefficient>)
    }
}
