//! Energy drift of the undamped double pendulum for several step sizes.
//!
//! Starts both rods horizontal at rest, integrates ten seconds of simulated
//! time with RK4 and reports how far total energy wandered from its initial
//! value. The error should shrink roughly 16× for every halving of `dt`
//! until the motion becomes too chaotic to compare.
//!
//! Run with:
//!   cargo run --example energy_drift

use double_pendulum::{integrator, total_energy, AngularState, PhysicalParams, Rk4};
use std::f64::consts::FRAC_PI_2;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

fn main() {
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(LevelFilter::WARN)
            .finish(),
    )
    .unwrap();

    let horizon: f64 = 10.0;
    let start = AngularState::at_rest(FRAC_PI_2, FRAC_PI_2);

    println!("Undamped double pendulum, unit rods and masses, g = 9.81");
    println!("  Horizon: {horizon} time units");
    println!();
    println!("      dt      steps   max |ΔE|        final |ΔE|");

    for dt in [0.04, 0.02, 0.01, 0.005, 0.0025] {
        let params = PhysicalParams {
            dt,
            ..PhysicalParams::default()
        };
        let e0 = total_energy(&params, &start);
        let steps = (horizon / dt).round() as u64;

        let mut state = start;
        let mut max_drift: f64 = 0.0;
        for _ in 0..steps {
            state = integrator::step(&params, &state);
            max_drift = max_drift.max((total_energy(&params, &state) - e0).abs());
        }
        let final_drift = (total_energy(&params, &state) - e0).abs();

        println!("  {dt:<8} {steps:>7}   {max_drift:<14.3e}  {final_drift:.3e}");
    }

    // The generic stepper drives the same system when no damping is needed
    let params = PhysicalParams::default();
    let mut solver = Rk4::new();
    match solver.integrate(&params, 0.0, &start.to_array(), params.dt, 1000) {
        Ok((t, y)) => {
            let state = AngularState::from_array(y);
            println!();
            println!("Generic RK4 to t = {t:.2}:");
            println!("  θ1 = {:.6}, θ2 = {:.6}", state.theta1, state.theta2);
            println!("  Function evals: {}", solver.stats.fn_evals);
        }
        Err(err) => eprintln!("Integration failed: {err}"),
    }
}
