//! Thrust curve engine for a pressurised water rocket motor.
//!
//! The model has two phases. During the water phase the trapped air expands
//! adiabatically while water is pushed through the nozzle; the water volume is
//! depleted linearly over a closed-form duration estimate. When requested, a
//! short residual-air phase follows in which the remaining compressed air
//! vents through the same nozzle, choked while the pressure ratio stays high.

mod curve;

pub use curve::{Phase, ThrustCurve};

use thiserror::Error;
use warms_core::constants::{CD, GAMMA, P_ATM, R_AIR, RHO_AIR_SEA_LEVEL, RHO_WATER, T_AIR};
use warms_core::{ParameterError, SimulationRun};

/// Samples taken across the water-expulsion phase.
pub const WATER_PHASE_SAMPLES: usize = 500;
/// Samples taken across the residual-air phase.
pub const AIR_PHASE_SAMPLES: usize = 300;
/// Empirical duration of the residual-air blowdown (s).
pub const AIR_PHASE_DURATION_S: f64 = 0.1;
/// Empirical derate applied to air-phase thrust.
pub const AIR_PHASE_EFFICIENCY: f64 = 0.7;
/// Growth of the virtual volume ratio over the air phase (ratio goes 1 -> 3).
pub const AIR_VOLUME_GROWTH: f64 = 2.0;
/// Upstream/ambient pressure ratio above which the nozzle is choked.
pub const CHOKED_PRESSURE_RATIO: f64 = 1.89;

/// Errors surfaced by the thrust engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThrustError {
    #[error("invalid motor parameters: {0}")]
    InvalidParameter(#[from] ParameterError),
    #[error("simulation is degenerate (water-phase duration {duration_s} s)")]
    Degenerate { duration_s: f64 },
}

/// Simulate the thrust-time curve of one run.
///
/// Identical runs always produce identical curves.
pub fn simulate(run: &SimulationRun) -> Result<ThrustCurve, ThrustError> {
    let duration_s = water_phase_duration_s(run)?;
    let (mut times_ms, mut thrust_n) = water_phase(run, duration_s);
    let water_samples = times_ms.len();

    if run.operating.include_air_phase {
        let start_pa = air_phase_start_pressure_pa(run);
        if start_pa > P_ATM {
            let (air_times, air_thrust) = air_phase(run, start_pa, duration_s);
            times_ms.extend(air_times);
            thrust_n.extend(air_thrust);
        }
    }

    if thrust_n.iter().any(|f| !f.is_finite()) {
        return Err(ThrustError::Degenerate { duration_s });
    }
    Ok(ThrustCurve::new(
        times_ms,
        thrust_n,
        duration_s * 1_000.0,
        water_samples,
    ))
}

/// Closed-form estimate of how long the water takes to leave the bottle (s).
///
/// Water volume enters in the litre figure the caller supplied while the
/// nozzle area is in square metres; curves and exported motor files are
/// calibrated against this mix.
pub fn water_phase_duration_s(run: &SimulationRun) -> Result<f64, ThrustError> {
    run.validate()?;
    let gauge_pa = run.operating.absolute_pressure_pa() - P_ATM;
    let area = run.geometry.nozzle_area_m2();
    let duration_s =
        0.5 * run.water_volume_l() / (CD * area * (2.0 * RHO_WATER * gauge_pa).sqrt());
    if !duration_s.is_finite() || duration_s <= 0.0 {
        return Err(ThrustError::Degenerate { duration_s });
    }
    Ok(duration_s)
}

/// Bottle pressure once all water is gone, from adiabatic expansion of the initial air (Pa).
pub fn air_phase_start_pressure_pa(run: &SimulationRun) -> f64 {
    let p0 = run.operating.absolute_pressure_pa();
    p0 * (run.initial_air_volume_l() / run.geometry.bottle_volume_l).powf(GAMMA)
}

fn water_phase(run: &SimulationRun, duration_s: f64) -> (Vec<f64>, Vec<f64>) {
    let water_l = run.water_volume_l();
    let air0_l = run.initial_air_volume_l();
    let bottle_l = run.geometry.bottle_volume_l;
    let p0 = run.operating.absolute_pressure_pa();
    let area = run.geometry.nozzle_area_m2();

    let mut times_ms = Vec::with_capacity(WATER_PHASE_SAMPLES + AIR_PHASE_SAMPLES);
    let mut thrust_n = Vec::with_capacity(WATER_PHASE_SAMPLES + AIR_PHASE_SAMPLES);
    for t in linspace(duration_s, WATER_PHASE_SAMPLES) {
        let remaining_l = (water_l * (1.0 - t / duration_s)).max(0.0);
        let air_l = bottle_l - remaining_l;
        let pressure = p0 * (air0_l / air_l).powf(GAMMA);

        let thrust = if remaining_l > 0.0 && pressure > P_ATM {
            let dp = pressure - P_ATM;
            let exit_velocity = CD * (2.0 * dp / RHO_WATER).sqrt();
            let mass_flow = CD * area * (2.0 * RHO_WATER * dp).sqrt();
            mass_flow * exit_velocity
        } else {
            0.0
        };
        times_ms.push(t * 1_000.0);
        thrust_n.push(thrust);
    }
    (times_ms, thrust_n)
}

fn air_phase(run: &SimulationRun, start_pa: f64, offset_s: f64) -> (Vec<f64>, Vec<f64>) {
    let area = run.geometry.nozzle_area_m2();
    let mut times_ms = Vec::with_capacity(AIR_PHASE_SAMPLES);
    let mut thrust_n = Vec::with_capacity(AIR_PHASE_SAMPLES);
    let mut vented = false;

    for tau in linspace(AIR_PHASE_DURATION_S, AIR_PHASE_SAMPLES) {
        times_ms.push((offset_s + tau) * 1_000.0);

        let volume_ratio = 1.0 + (tau / AIR_PHASE_DURATION_S) * AIR_VOLUME_GROWTH;
        let pressure = start_pa * (1.0 / volume_ratio).powf(GAMMA);
        vented = vented || pressure <= P_ATM;
        if vented {
            thrust_n.push(0.0);
            continue;
        }

        let exit_velocity = air_exit_velocity(pressure);
        let exit_density = RHO_AIR_SEA_LEVEL * pressure / P_ATM;
        let mass_flow = CD * area * exit_density * exit_velocity;
        thrust_n.push(mass_flow * exit_velocity * AIR_PHASE_EFFICIENCY);
    }
    (times_ms, thrust_n)
}

/// Nozzle exit velocity for venting air at bottle pressure `pressure` (m/s).
fn air_exit_velocity(pressure: f64) -> f64 {
    if pressure / P_ATM > CHOKED_PRESSURE_RATIO {
        (GAMMA * R_AIR * T_AIR).sqrt()
    } else {
        let exponent = (GAMMA - 1.0) / GAMMA;
        (2.0 * GAMMA / (GAMMA - 1.0) * R_AIR * T_AIR * (1.0 - (P_ATM / pressure).powf(exponent)))
            .sqrt()
    }
}

/// `n` evenly spaced points over `[0, stop]`, the last one landing exactly on `stop`.
fn linspace(stop: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 { stop / (n - 1) as f64 } else { 0.0 };
    (0..n).map(move |i| if i + 1 == n { stop } else { i as f64 * step })
}
