//! Sensitivity to initial conditions.
//!
//! Runs two pendulums whose starting angles differ by 1e-9 rad and prints
//! how quickly their trajectories separate. The separation grows roughly
//! exponentially until it saturates at the size of the configuration space.
//!
//! Run with:
//!   cargo run --example chaos_divergence

use double_pendulum::{integrator, AngularState, IntegrationError, PhysicalParams};
use std::f64::consts::FRAC_PI_2;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

fn separation(a: &AngularState, b: &AngularState) -> f64 {
    let d1 = a.theta1 - b.theta1;
    let d2 = a.theta2 - b.theta2;
    (d1 * d1 + d2 * d2).sqrt()
}

fn main() -> Result<(), IntegrationError> {
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(LevelFilter::WARN)
            .finish(),
    )
    .unwrap();

    let params = PhysicalParams {
        dt: 0.002,
        ..PhysicalParams::default()
    };
    let mut a = AngularState::at_rest(FRAC_PI_2, FRAC_PI_2);
    let mut b = AngularState::at_rest(FRAC_PI_2 + 1e-9, FRAC_PI_2);

    let report_every = 500;
    println!("    t      separation [rad]");
    for report in 1..=20 {
        a = integrator::advance(&params, &a, report_every)?;
        b = integrator::advance(&params, &b, report_every)?;
        let t = (report * report_every) as f64 * params.dt;
        println!("  {t:5.1}    {:.3e}", separation(&a, &b));
    }

    Ok(())
}
