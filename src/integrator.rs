//! Damped RK4 step for the double pendulum
//!
//! One call advances the simulation by exactly `params.dt`: a classic RK4
//! step of the first-order system [θ1, θ2, θ1', θ2'] followed by scaling both
//! angular velocities by `params.damping`. Angles are never wrapped, so they
//! may grow without bound over a long run.

use tracing::warn;

use crate::dynamics::{AngularState, PhysicalParams};
use crate::solver::{IntegrationError, Rk4};

/// Advance the state by one damped RK4 step
///
/// Deterministic and side-effect free. Numerical blow-up (singular
/// dynamics, or a `dt` too large for stability) propagates silently as
/// non-finite state; use [`try_step`] to detect it.
pub fn step(params: &PhysicalParams, state: &AngularState) -> AngularState {
    let mut solver = Rk4::<4>::new();
    let y = solver.step(params, 0.0, &state.to_array(), params.dt);

    AngularState {
        theta1: y[0],
        theta2: y[1],
        theta1_dot: y[2] * params.damping,
        theta2_dot: y[3] * params.damping,
    }
}

/// Checked variant of [`step`]
///
/// Returns `IntegrationError::NonFiniteState` instead of a non-finite state.
/// The reported `t` is relative to `state`, so it is always one `dt` and
/// `step` is always 1; callers tracking absolute time add their own offset.
pub fn try_step(
    params: &PhysicalParams,
    state: &AngularState,
) -> Result<AngularState, IntegrationError> {
    let next = step(params, state);
    if next.is_finite() {
        Ok(next)
    } else {
        Err(IntegrationError::NonFiniteState {
            t: params.dt,
            step: 1,
        })
    }
}

/// Apply `steps` checked steps, stopping at the first divergence
///
/// The error reports the elapsed simulated time and the index of the step
/// that diverged, counted from `state`.
pub fn advance(
    params: &PhysicalParams,
    state: &AngularState,
    steps: u64,
) -> Result<AngularState, IntegrationError> {
    let mut current = *state;
    for n in 1..=steps {
        current = step(params, &current);
        if !current.is_finite() {
            let t = n as f64 * params.dt;
            warn!(step = n, t, "double pendulum state diverged");
            return Err(IntegrationError::NonFiniteState { t, step: n });
        }
    }
    Ok(current)
}
