//! Integration tests for the simulation driver.
//!
//! These tests verify:
//! - Checkpoint cadence (one save per `save_freq` window)
//! - Termination at `tend`
//! - Instability abort with a trailing checkpoint
//! - Stability diagnostics on the log cadence
//! - An end-to-end Sod run written to VTK

use std::fmt;
use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use fv_rs::equations::{EquationOfState, IE, IR, IU, IdealGas, N_HYDRO, PrimitiveState};
use fv_rs::io::{MemoryCheckpoint, VtkCheckpointWriter};
use fv_rs::mesh::{CartesianGeometry, Grid};
use fv_rs::problem::InitialCondition;
use fv_rs::simulation::{RunParams, RunStatus, Simulation};
use fv_rs::solver::{FieldArray, GodunovUpdate, StabilityLimiter, StabilityParams};
use fv_rs::types::{Iteration, SideBoundaries};
use fv_rs::{BoundaryKind, SimulationConfig};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

const EPS: f64 = 1e-6;

fn grid() -> Grid {
    Grid::uniform(8, 8, 2, 0.0, 1.0, 0.0, 1.0)
}

fn limiter(grid: Grid) -> StabilityLimiter<CartesianGeometry, IdealGas> {
    StabilityLimiter::new(
        CartesianGeometry::new(grid),
        IdealGas::default(),
        StabilityParams::new(0.4, EPS),
    )
}

fn gas_at_rest(grid: &Grid) -> FieldArray {
    InitialCondition::Uniform {
        rho: 1.0,
        u: 0.0,
        v: 0.0,
        p: 1.0,
    }
    .conserved(grid, &IdealGas::default(), &SideBoundaries::default(), N_HYDRO)
}

/// Leaves the state untouched, so every cycle has the same `dt`.
fn frozen(_: &mut FieldArray, _: &mut FieldArray, _: f64, _: Iteration) {}

#[test]
fn test_checkpoint_once_per_window() {
    let g = grid();
    let mut u = gas_at_rest(&g);
    let save_freq = 0.1;
    let mut sim = Simulation::new(limiter(g), frozen, MemoryCheckpoint::new()).with_params(RunParams {
        tend: 1.0,
        save_freq,
        log_frequency: 3,
        epsilon: EPS,
    });

    let result = sim.run(&mut u).unwrap();
    let records = sim.checkpoint().records();
    let (trailing, in_loop) = records.split_last().unwrap();
    let dt = result.dt_max;
    assert_eq!(result.dt_min, dt);
    assert!(dt < save_freq);

    for (k, rec) in in_loop.iter().enumerate() {
        assert_eq!(rec.index.get(), k);
        let threshold = k as f64 * save_freq;
        // Due on this cycle and not on the previous one
        assert!(rec.t + EPS > threshold);
        assert!(k == 0 || rec.t - dt + EPS <= threshold);
    }

    // No cycle started past the window after the last save
    let last_cycle_start = result.final_time - dt;
    assert!(last_cycle_start + EPS <= in_loop.len() as f64 * save_freq);
    assert_eq!(in_loop.len(), 10);

    assert_eq!(trailing.index.get(), in_loop.len());
    assert_eq!(trailing.t, result.final_time);
    assert_eq!(result.checkpoints_written, records.len());
}

#[test]
fn test_terminates_at_tend() {
    let g = grid();
    let mut u = gas_at_rest(&g);
    let tend = 0.3;
    let mut sim = Simulation::new(limiter(g), frozen, MemoryCheckpoint::new())
        .with_tend(tend)
        .with_save_freq(1.0);

    let result = sim.run(&mut u).unwrap();

    assert_eq!(result.status, RunStatus::Completed);
    assert!(result.final_time + EPS >= tend);
    assert!(result.final_time - result.dt_max + EPS < tend);
    let expected = (tend / result.dt_max).ceil() as usize;
    assert_eq!(result.iterations, expected);
    // One save at t = 0 plus the trailing one
    assert_eq!(sim.checkpoint().len(), 2);
}

/// Collects the `t` field of every "time step" diagnostic event.
#[derive(Clone, Default)]
struct DiagnosticTimes(Arc<Mutex<Vec<f64>>>);

#[derive(Default)]
struct TimeStepVisitor {
    is_diagnostic: bool,
    t: Option<f64>,
}

impl Visit for TimeStepVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "t" {
            self.t = Some(value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.is_diagnostic = format!("{:?}", value) == "time step";
        }
    }
}

impl<S: Subscriber> Layer<S> for DiagnosticTimes {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = TimeStepVisitor::default();
        event.record(&mut visitor);
        if let (true, Some(t)) = (visitor.is_diagnostic, visitor.t) {
            self.0.lock().unwrap().push(t);
        }
    }
}

#[test]
fn test_diagnostics_fire_on_log_cadence() {
    let g = grid();
    let mut u = gas_at_rest(&g);
    let log_frequency = 2;
    let times = DiagnosticTimes::default();
    let subscriber = tracing_subscriber::registry().with(times.clone());

    let mut sim = Simulation::new(limiter(g), frozen, MemoryCheckpoint::new())
        .with_tend(0.25)
        .with_save_freq(1.0)
        .with_log_frequency(log_frequency);
    let result = tracing::subscriber::with_default(subscriber, || sim.run(&mut u)).unwrap();

    // Constant dt, so the cycle index is t / dt
    let dt = result.dt_max;
    let fired: Vec<usize> = times
        .0
        .lock()
        .unwrap()
        .iter()
        .map(|t| (t / dt).round() as usize)
        .collect();
    let expected: Vec<usize> = (0..result.iterations).step_by(log_frequency + 1).collect();

    assert!(result.iterations > 2 * (log_frequency + 1));
    assert_eq!(fired, expected);
}

#[test]
fn test_extreme_velocity_mid_run_aborts_with_one_trailing_checkpoint() {
    let g = grid();
    let mut u = gas_at_rest(&g);
    // rho = 1, u = 1e10 with positive pressure: finite but tiny dt
    let blow_up = |_: &mut FieldArray, u_new: &mut FieldArray, _: f64, it: Iteration| {
        if it.get() == 3 {
            u_new.set(4, 4, IU, 1e10);
            u_new.set(4, 4, IE, 0.5e20 + 1e10);
        }
    };
    let mut sim = Simulation::new(limiter(g), blow_up, MemoryCheckpoint::new())
        .with_tend(10.0)
        .with_save_freq(1e-3);

    let result = sim.run(&mut u).unwrap();

    let RunStatus::AbortedUnstable { dt } = result.status else {
        panic!("expected an unstable abort, got {}", result.status);
    };
    assert!(dt.is_finite() && dt < 1e-10);
    assert_eq!(result.status.exit_code(), 2);
    assert_eq!(result.iterations, 4);

    // One save per completed cycle, none on the aborted one, then the trailing one
    let records = sim.checkpoint().records();
    assert_eq!(records.len(), 5);
    let trailing = records.last().unwrap();
    assert_eq!(trailing.t, result.final_time);
    assert_eq!(trailing.dt, dt);
    assert_relative_eq!(trailing.snapshot.get(4, 4, IU), 1e10, max_relative = 1e-12);
}

#[test]
fn test_negative_pressure_aborts_before_first_step() {
    let g = grid();
    let eos = IdealGas::default();
    let mut q = FieldArray::new(&g, N_HYDRO);
    for (i, j) in g.interior_cells() {
        q.set_primitive(i, j, &PrimitiveState::at_rest(1.0, 1.0));
    }
    q.set_primitive(5, 3, &PrimitiveState::at_rest(1.0, -0.5));
    let mut u = FieldArray::new(&g, N_HYDRO);
    eos.prim_to_cons(&q, &mut u);

    let mut sim = Simulation::new(limiter(g), frozen, MemoryCheckpoint::new());
    let result = sim.run(&mut u).unwrap();

    assert!(matches!(result.status, RunStatus::AbortedUnstable { dt } if dt.is_nan()));
    assert_eq!(result.iterations, 0);
    assert_eq!(result.final_time, 0.0);
    assert_eq!(sim.checkpoint().len(), 1);
}

#[test]
fn test_sod_run_writes_vtk_series() {
    let dir = tempfile::tempdir().unwrap();
    let config = SimulationConfig::default()
        .with_resolution(32, 4)
        .with_run(0.05, 0.01)
        .with_problem(InitialCondition::SodX);
    let g = config.grid();
    let eos = config.eos();
    let boundaries = SideBoundaries::new(
        BoundaryKind::Reflecting,
        BoundaryKind::Transmissive,
        BoundaryKind::Reflecting,
        BoundaryKind::Transmissive,
    );

    let mut u = config.problem.conserved(&g, &eos, &boundaries, N_HYDRO + 1);
    let mass_before: f64 = u.interior_values(&g, IR).iter().sum();

    let writer = VtkCheckpointWriter::new(dir.path(), "sod", g).unwrap();
    let mut sim = Simulation::new(
        StabilityLimiter::new(CartesianGeometry::new(g), eos, config.stability_params()),
        GodunovUpdate::new(g, eos, boundaries),
        writer,
    )
    .with_params(config.run_params());

    let result = sim.run(&mut u).unwrap();
    assert!(result.is_success());
    assert!(u.interior_is_finite(&g));

    // Waves have not reached the x ends yet
    let mass_after: f64 = u.interior_values(&g, IR).iter().sum();
    assert_relative_eq!(mass_after, mass_before, max_relative = 1e-10);

    let pvd = std::fs::read_to_string(dir.path().join("sod.pvd")).unwrap();
    assert_eq!(pvd.matches("<DataSet").count(), result.checkpoints_written);
    assert!(dir.path().join("sod_0000.vti").exists());

    let mut q = FieldArray::new(&g, N_HYDRO + 1);
    eos.cons_to_prim(&u, &mut q);
    // Far ends lie outside the domain of dependence
    assert_relative_eq!(q.get(g.ibeg(), g.jbeg(), N_HYDRO), 1.0, max_relative = 1e-12);
    assert_eq!(q.get(g.iend() - 1, g.jbeg(), N_HYDRO), 0.0);
}
