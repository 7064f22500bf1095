//! Simulation driver implementation.
//!
//! One cycle:
//!
//! 1. copy `U` into the scratch buffer
//! 2. convert `U` to primitive `Q`
//! 3. note whether a checkpoint is due (`t + ε > next_save`)
//! 4. ask the stability limiter for `dt` (diagnostics on the log cadence)
//! 5. abort if `dt` collapsed below [`MIN_DT`] or is not finite
//! 6. write the due checkpoint and advance `next_save` by `save_freq`
//! 7. advance the scratch buffer by `dt` and copy it back into `U`
//! 8. `t += dt`, next iteration
//! 9. complete once `t + ε >= tend`
//!
//! Completion and abort both end with one trailing checkpoint of the
//! primitive state of the last cycle, stamped with the final `t`.

use std::fmt;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, error, info};

use crate::equations::EquationOfState;
use crate::io::{CheckpointError, CheckpointSink};
use crate::mesh::Geometry;
use crate::solver::{FieldArray, StabilityLimiter, Update};
use crate::types::{CheckpointIndex, Iteration};

/// Steps below this are treated as a numerical instability.
pub const MIN_DT: f64 = 1e-10;

// =============================================================================
// Run parameters
// =============================================================================

/// Temporal control of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunParams {
    /// Terminal physical time.
    pub tend: f64,
    /// Physical-time period between checkpoints.
    pub save_freq: f64,
    /// Cycles between diagnostic reports (reports fire every `log_frequency + 1` cycles).
    pub log_frequency: usize,
    /// Slack in time comparisons.
    pub epsilon: f64,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            tend: 0.2,
            save_freq: 0.05,
            log_frequency: 10,
            epsilon: 1e-6,
        }
    }
}

/// Diagnostic cadence: fires on the first tick, then every `period + 1` ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogCountdown {
    remaining: usize,
    period: usize,
}

impl LogCountdown {
    pub fn new(period: usize) -> Self {
        Self {
            remaining: 0,
            period,
        }
    }

    /// Advance one cycle; returns whether diagnostics fire on it.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            self.remaining = self.period;
            true
        } else {
            self.remaining -= 1;
            false
        }
    }
}

// =============================================================================
// Status and result
// =============================================================================

/// Driver state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Aborted,
    Completed,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunStatus {
    /// Reached `tend`.
    Completed,
    /// Stopped because the stable step collapsed.
    AbortedUnstable { dt: f64 },
}

impl RunStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunStatus::Completed)
    }

    /// Process exit code: 0 on completion, 2 on instability.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::AbortedUnstable { .. } => 2,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::AbortedUnstable { dt } => write!(f, "aborted (unstable, dt = {:.3e})", dt),
        }
    }
}

/// Result of a simulation run.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    pub status: RunStatus,
    /// Final simulation time reached.
    pub final_time: f64,
    /// Completed cycles.
    pub iterations: usize,
    /// Checkpoints written, trailing one included.
    pub checkpoints_written: usize,
    /// Smallest accepted step (`INFINITY` if no cycle ran).
    pub dt_min: f64,
    /// Largest accepted step.
    pub dt_max: f64,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        self.status.is_completed()
    }
}

/// Errors that stop a run before it can finish either way.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    /// Conserved array does not cover the grid.
    #[error("state shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

// =============================================================================
// Driver
// =============================================================================

/// Explicit time-marching driver.
///
/// # Type Parameters
///
/// * `G` - Geometry provider
/// * `E` - Equation of state (also used for state conversion)
/// * `U` - State update
/// * `C` - Checkpoint sink
pub struct Simulation<G, E, U, C>
where
    G: Geometry,
    E: EquationOfState,
    U: Update,
    C: CheckpointSink,
{
    limiter: StabilityLimiter<G, E>,
    update: U,
    checkpoint: C,
    params: RunParams,
}

impl<G, E, U, C> Simulation<G, E, U, C>
where
    G: Geometry,
    E: EquationOfState,
    U: Update,
    C: CheckpointSink,
{
    pub fn new(limiter: StabilityLimiter<G, E>, update: U, checkpoint: C) -> Self {
        Self {
            limiter,
            update,
            checkpoint,
            params: RunParams::default(),
        }
    }

    pub fn with_params(mut self, params: RunParams) -> Self {
        self.params = params;
        self
    }

    /// Set the terminal time.
    pub fn with_tend(mut self, tend: f64) -> Self {
        self.params.tend = tend;
        self
    }

    /// Set the checkpoint period.
    pub fn with_save_freq(mut self, save_freq: f64) -> Self {
        self.params.save_freq = save_freq;
        self
    }

    /// Set the diagnostic cadence.
    pub fn with_log_frequency(mut self, log_frequency: usize) -> Self {
        self.params.log_frequency = log_frequency;
        self
    }

    pub fn checkpoint(&self) -> &C {
        &self.checkpoint
    }

    /// Run from `t = 0` until `tend` or instability.
    ///
    /// `u` holds the initial conserved state (ghosts included) and is left
    /// holding the final one.
    pub fn run(&mut self, u: &mut FieldArray) -> Result<SimulationResult, SimulationError> {
        let grid = *self.limiter.geometry().grid();
        if !u.matches_grid(&grid) {
            return Err(SimulationError::ShapeMismatch {
                expected: (grid.ntx(), grid.nty()),
                found: (u.ntx(), u.nty()),
            });
        }

        let RunParams {
            tend,
            save_freq,
            log_frequency,
            epsilon,
        } = self.params;
        let start_wall = Instant::now();

        let mut q = FieldArray::zeros(u.ntx(), u.nty(), u.n_fields());
        self.limiter.eos().cons_to_prim(u, &mut q);
        let mut u_new = u.clone();

        let mut t = 0.0;
        let mut dt = 0.0;
        let mut iteration = Iteration::ZERO;
        let mut index = CheckpointIndex::ZERO;
        let mut next_save = 0.0;
        let mut next_log = LogCountdown::new(log_frequency);
        let mut checkpoints_written = 0;
        let mut dt_min_used = f64::INFINITY;
        let mut dt_max_used: f64 = 0.0;

        let mut state = if t + epsilon >= tend {
            DriverState::Completed
        } else {
            DriverState::Running
        };

        info!(
            nx = grid.nx(),
            ny = grid.ny(),
            n_fields = u.n_fields(),
            tend,
            save_freq,
            "starting simulation"
        );

        while state == DriverState::Running {
            u_new.copy_from(u);
            self.limiter.eos().cons_to_prim(u, &mut q);

            let save_due = t + epsilon > next_save;

            let diagnostics = next_log.tick();

            let max_dt_hint = if iteration == Iteration::ZERO {
                save_freq
            } else {
                next_save - t
            };
            dt = self.limiter.compute_dt(&q, max_dt_hint, t, diagnostics);

            if !(dt >= MIN_DT) {
                error!(%iteration, t, dt, "time step collapsed, stopping run");
                state = DriverState::Aborted;
                break;
            }

            if save_due {
                info!(index = %index, t, dt, "saving");
                self.checkpoint.save(&q, index.bump(), t, dt)?;
                checkpoints_written += 1;
                next_save += save_freq;
            }

            self.update.advance(&mut q, &mut u_new, dt, iteration);
            u.copy_from(&u_new);

            t += dt;
            iteration.bump();
            dt_min_used = dt_min_used.min(dt);
            dt_max_used = dt_max_used.max(dt);
            debug!(%iteration, t, dt, "step");

            if t + epsilon >= tend {
                state = DriverState::Completed;
            }
        }

        let status = match state {
            DriverState::Aborted => RunStatus::AbortedUnstable { dt },
            _ => RunStatus::Completed,
        };

        info!(index = %index, t, dt, "saving");
        self.checkpoint.save(&q, index.bump(), t, dt)?;
        checkpoints_written += 1;

        let wall_time = start_wall.elapsed().as_secs_f64();
        info!(
            %status,
            t,
            iterations = iteration.get(),
            checkpoints = checkpoints_written,
            dt_min = dt_min_used,
            dt_max = dt_max_used,
            wall_time,
            "simulation finished"
        );

        Ok(SimulationResult {
            status,
            final_time: t,
            iterations: iteration.get(),
            checkpoints_written,
            dt_min: dt_min_used,
            dt_max: dt_max_used,
            wall_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equations::{IR, IU, IdealGas, PrimitiveState};
    use crate::io::MemoryCheckpoint;
    use crate::mesh::{CartesianGeometry, Grid};
    use crate::solver::StabilityParams;
    use approx::assert_relative_eq;

    fn grid() -> Grid {
        Grid::uniform(4, 4, 1, 0.0, 1.0, 0.0, 1.0)
    }

    fn initial(grid: &Grid, prim: PrimitiveState) -> FieldArray {
        let mut q = FieldArray::new(grid, 4);
        for j in 0..grid.nty() {
            for i in 0..grid.ntx() {
                q.set_primitive(i, j, &prim);
            }
        }
        let mut u = FieldArray::new(grid, 4);
        IdealGas::default().prim_to_cons(&q, &mut u);
        u
    }

    fn limiter(grid: Grid) -> StabilityLimiter<CartesianGeometry, IdealGas> {
        StabilityLimiter::new(
            CartesianGeometry::new(grid),
            IdealGas::default(),
            StabilityParams::default(),
        )
    }

    fn noop(_: &mut FieldArray, _: &mut FieldArray, _: f64, _: Iteration) {}

    #[test]
    fn test_log_countdown_period() {
        let mut log = LogCountdown::new(2);
        let fired: Vec<usize> = (0..10).filter(|_| log.tick()).collect();
        assert_eq!(fired, vec![0, 3, 6, 9]);

        let mut every = LogCountdown::new(0);
        assert!((0..5).all(|_| every.tick()));
    }

    #[test]
    fn test_run_status_exit_codes() {
        assert_eq!(RunStatus::Completed.exit_code(), 0);
        assert_eq!(RunStatus::AbortedUnstable { dt: 0.0 }.exit_code(), 2);
        assert!(RunStatus::Completed.to_string().contains("completed"));
    }

    #[test]
    fn test_trailing_checkpoint_holds_last_cycle_state() {
        let g = grid();
        let mut u = initial(&g, PrimitiveState::at_rest(1.0, 1.0));
        // Scaling U leaves the sound speed and so dt unchanged
        let grow = |_: &mut FieldArray, u_new: &mut FieldArray, _: f64, _: Iteration| {
            u_new.data.iter_mut().for_each(|v| *v *= 1.1);
        };
        let mut sim = Simulation::new(limiter(g), grow, MemoryCheckpoint::new())
            .with_tend(0.1)
            .with_save_freq(0.05);

        let result = sim.run(&mut u).unwrap();

        assert!(result.is_success());
        assert_eq!(result.iterations, 3);
        assert_eq!(result.checkpoints_written, sim.checkpoint().len());
        assert_eq!(sim.checkpoint().records()[0].t, 0.0);

        let last = sim.checkpoint().last().unwrap();
        assert_eq!(last.t, result.final_time);
        assert_eq!(last.index.get(), result.checkpoints_written - 1);
        assert_relative_eq!(last.snapshot.get(2, 2, IR), 1.1_f64.powi(2), max_relative = 1e-12);
        assert_relative_eq!(u.get(2, 2, IR), 1.1_f64.powi(3), max_relative = 1e-12);
    }

    #[test]
    fn test_zero_tend_runs_no_cycle() {
        let g = grid();
        let mut u = initial(&g, PrimitiveState::at_rest(1.0, 1.0));
        let mut sim = Simulation::new(limiter(g), noop, MemoryCheckpoint::new()).with_tend(0.0);

        let result = sim.run(&mut u).unwrap();

        assert_eq!(result.iterations, 0);
        assert_eq!(sim.checkpoint().len(), 1);
        assert_eq!(sim.checkpoint().records()[0].dt, 0.0);
        assert_eq!(sim.checkpoint().records()[0].snapshot.get(2, 2, IR), 1.0);
    }

    #[test]
    fn test_extreme_velocity_aborts() {
        let g = grid();
        let mut u = initial(&g, PrimitiveState::new(1.0, 1e12, 0.0, 1.0));
        let mut sim = Simulation::new(limiter(g), noop, MemoryCheckpoint::new());

        let result = sim.run(&mut u).unwrap();

        assert!(matches!(result.status, RunStatus::AbortedUnstable { .. }));
        assert_eq!(result.status.exit_code(), 2);
        assert_eq!(result.iterations, 0);
        assert_eq!(sim.checkpoint().len(), 1);
        assert_eq!(sim.checkpoint().records()[0].snapshot.get(2, 2, IU), 1e12);
    }

    #[test]
    fn test_rejects_state_of_other_grid() {
        let mut u = FieldArray::new(&Grid::uniform(5, 4, 1, 0.0, 1.0, 0.0, 1.0), 4);
        let mut sim = Simulation::new(limiter(grid()), noop, MemoryCheckpoint::new());
        assert!(matches!(
            sim.run(&mut u),
            Err(SimulationError::ShapeMismatch { .. })
        ));
    }
}
