//! Double pendulum equations of motion
//!
//! Two point masses on massless rigid rods, rod 2 hanging from the bob of
//! rod 1. Angles are measured from the downward vertical. The closed-form
//! accelerations come from the Lagrangian of the system.

use thiserror::Error;
use tracing::debug;

use crate::solver::OdeSystem;

/// Physical parameters of a double pendulum
///
/// Immutable for the lifetime of a simulation and passed explicitly to
/// every dynamics and integrator call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    /// Length of rod 1
    pub length1: f64,
    /// Length of rod 2
    pub length2: f64,
    /// Point mass at the end of rod 1
    pub mass1: f64,
    /// Point mass at the end of rod 2
    pub mass2: f64,
    /// Gravitational acceleration magnitude
    pub gravity: f64,
    /// Multiplicative velocity decay applied after each step, in (0, 1]
    pub damping: f64,
    /// Fixed integration time step
    pub dt: f64,
}

impl Default for PhysicalParams {
    /// Unit rods and masses under standard gravity, undamped, dt = 0.01
    fn default() -> Self {
        Self {
            length1: 1.0,
            length2: 1.0,
            mass1: 1.0,
            mass2: 1.0,
            gravity: 9.81,
            damping: 1.0,
            dt: 0.01,
        }
    }
}

/// Angular state of both joints
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AngularState {
    /// Angle of rod 1 from vertical [rad]
    pub theta1: f64,
    /// Angle of rod 2 from vertical [rad]
    pub theta2: f64,
    /// Angular velocity of rod 1
    pub theta1_dot: f64,
    /// Angular velocity of rod 2
    pub theta2_dot: f64,
}

impl AngularState {
    /// Create a state from the two angles and angular velocities
    pub fn new(theta1: f64, theta2: f64, theta1_dot: f64, theta2_dot: f64) -> Self {
        Self {
            theta1,
            theta2,
            theta1_dot,
            theta2_dot,
        }
    }

    /// Both rods at rest at the given angles
    pub fn at_rest(theta1: f64, theta2: f64) -> Self {
        Self::new(theta1, theta2, 0.0, 0.0)
    }

    /// State vector layout used by the integrator: [θ1, θ2, θ1', θ2']
    pub fn to_array(self) -> [f64; 4] {
        [self.theta1, self.theta2, self.theta1_dot, self.theta2_dot]
    }

    /// Inverse of [`AngularState::to_array`]
    pub fn from_array(y: [f64; 4]) -> Self {
        Self::new(y[0], y[1], y[2], y[3])
    }

    /// True when all four components are finite
    pub fn is_finite(&self) -> bool {
        self.theta1.is_finite()
            && self.theta2.is_finite()
            && self.theta1_dot.is_finite()
            && self.theta2_dot.is_finite()
    }
}

/// The dynamics produced a non-finite acceleration
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DynamicsError {
    /// Denominator vanished or the input state was already non-finite
    #[error("singular dynamics at state {state:?}: accelerations = ({theta1_ddot}, {theta2_ddot})")]
    Singular {
        /// State at which the evaluation failed
        state: AngularState,
        /// Raw acceleration of joint 1
        theta1_ddot: f64,
        /// Raw acceleration of joint 2
        theta2_ddot: f64,
    },
}

/// Angular accelerations (θ1'', θ2'') at the given state
///
/// No guard is applied to the denominators: at a singular configuration
/// the result is ±∞ or NaN. Use [`try_accelerations`] to detect that.
pub fn accelerations(params: &PhysicalParams, state: &AngularState) -> (f64, f64) {
    let PhysicalParams {
        length1: l1,
        length2: l2,
        mass1: m1,
        mass2: m2,
        gravity: g,
        ..
    } = *params;
    let AngularState {
        theta1: t1,
        theta2: t2,
        theta1_dot: w1,
        theta2_dot: w2,
    } = *state;

    let delta = t1 - t2;
    let mass_term = 2.0 * m1 + m2 - m2 * (2.0 * t1 - 2.0 * t2).cos();

    let gravity1 = -g * (2.0 * m1 + m2) * t1.sin();
    let gravity2 = -m2 * g * (t1 - 2.0 * t2).sin();
    let coupling1 = -2.0 * delta.sin() * m2 * (w2 * w2 * l2 + w1 * w1 * l1 * delta.cos());
    let theta1_ddot = (gravity1 + gravity2 + coupling1) / (l1 * mass_term);

    let coupling2 = w1 * w1 * l1 * (m1 + m2)
        + g * (m1 + m2) * t1.cos()
        + w2 * w2 * l2 * m2 * delta.cos();
    let theta2_ddot = 2.0 * delta.sin() * coupling2 / (l2 * mass_term);

    (theta1_ddot, theta2_ddot)
}

/// Checked variant of [`accelerations`]
pub fn try_accelerations(
    params: &PhysicalParams,
    state: &AngularState,
) -> Result<(f64, f64), DynamicsError> {
    let (theta1_ddot, theta2_ddot) = accelerations(params, state);
    if theta1_ddot.is_finite() && theta2_ddot.is_finite() {
        Ok((theta1_ddot, theta2_ddot))
    } else {
        debug!(?state, theta1_ddot, theta2_ddot, "singular dynamics");
        Err(DynamicsError::Singular {
            state: *state,
            theta1_ddot,
            theta2_ddot,
        })
    }
}

/// Total mechanical energy (kinetic + potential)
///
/// Potential energy is measured from the pivot with height pointing up,
/// so the hanging rest state has energy -(m1 + m2)·g·l1 - m2·g·l2.
pub fn total_energy(params: &PhysicalParams, state: &AngularState) -> f64 {
    let PhysicalParams {
        length1: l1,
        length2: l2,
        mass1: m1,
        mass2: m2,
        gravity: g,
        ..
    } = *params;
    let AngularState {
        theta1: t1,
        theta2: t2,
        theta1_dot: w1,
        theta2_dot: w2,
    } = *state;

    let kinetic = 0.5 * (m1 + m2) * l1 * l1 * w1 * w1
        + 0.5 * m2 * l2 * l2 * w2 * w2
        + m2 * l1 * l2 * w1 * w2 * (t1 - t2).cos();
    let potential = -(m1 + m2) * g * l1 * t1.cos() - m2 * g * l2 * t2.cos();

    kinetic + potential
}

/// First-order form over [θ1, θ2, θ1', θ2']
impl OdeSystem<4> for PhysicalParams {
    fn rhs(&self, _t: f64, y: &[f64; 4], dydt: &mut [f64; 4]) {
        let (theta1_ddot, theta2_ddot) = accelerations(self, &AngularState::from_array(*y));
        dydt[0] = y[2];
        dydt[1] = y[3];
        dydt[2] = theta1_ddot;
        dydt[3] = theta2_ddot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_hanging_rest_is_equilibrium() {
        let params = PhysicalParams::default();
        let (a1, a2) = accelerations(&params, &AngularState::default());
        assert_eq!(a1, 0.0);
        assert_eq!(a2, 0.0);
    }

    #[test]
    fn test_horizontal_start_matches_closed_form() {
        // θ1 = θ2 = π/2, at rest, unit rods and masses:
        // den = 1·(2 + 1 - cos 0) = 2
        // θ1'' = (-3g·sin(π/2) - g·sin(-π/2)) / 2 = -g
        // θ2'' = 2·sin(0)·(...) / 2 = 0
        let params = PhysicalParams::default();
        let state = AngularState::at_rest(FRAC_PI_2, FRAC_PI_2);
        let (a1, a2) = accelerations(&params, &state);
        assert_relative_eq!(a1, -9.81, epsilon = 1e-12);
        assert_relative_eq!(a2, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_asymmetric_state_matches_hand_evaluation() {
        // θ1 = π/2, θ2 = 0, at rest, unit rods and masses:
        // den = 3 - cos(π) = 4
        // θ1'' = (-3g - g·sin(π/2)) / 4 - 0 = -g
        // θ2'' = 2·sin(π/2)·(g·2·cos(π/2)) / 4 ≈ 0
        let params = PhysicalParams::default();
        let state = AngularState::at_rest(FRAC_PI_2, 0.0);
        let (a1, a2) = accelerations(&params, &state);
        assert_relative_eq!(a1, -9.81, epsilon = 1e-12);
        assert_relative_eq!(a2, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_pendulum_limit() {
        // A negligible second mass leaves rod 1 as a simple pendulum: θ1'' = -(g/l1)·sin θ1
        let params = PhysicalParams {
            length1: 2.0,
            mass2: 1e-12,
            ..PhysicalParams::default()
        };
        let state = AngularState::at_rest(0.3, 0.3);
        let (a1, _) = accelerations(&params, &state);
        assert_relative_eq!(a1, -(9.81 / 2.0) * 0.3_f64.sin(), max_relative = 1e-9);
    }

    #[test]
    fn test_accelerations_are_odd_under_mirroring() {
        let params = PhysicalParams::default();
        let state = AngularState::new(0.7, -1.2, 0.4, 2.0);
        let mirrored = AngularState::new(-0.7, 1.2, -0.4, -2.0);
        let (a1, a2) = accelerations(&params, &state);
        let (b1, b2) = accelerations(&params, &mirrored);
        assert_relative_eq!(a1, -b1, epsilon = 1e-12);
        assert_relative_eq!(a2, -b2, epsilon = 1e-12);
    }

    #[test]
    fn test_try_accelerations_flags_non_finite_state() {
        let params = PhysicalParams::default();
        let state = AngularState::new(f64::NAN, 0.0, 0.0, 0.0);
        let result = try_accelerations(&params, &state);
        assert!(matches!(result, Err(DynamicsError::Singular { .. })));
    }

    #[test]
    fn test_try_accelerations_flags_vanishing_denominator() {
        // With m1 = 0 the denominator 2·m1 + m2 - m2·cos(2Δθ) vanishes at Δθ = 0
        let params = PhysicalParams {
            mass1: 0.0,
            ..PhysicalParams::default()
        };
        let state = AngularState::at_rest(0.5, 0.5);
        assert!(try_accelerations(&params, &state).is_err());
    }

    #[test]
    fn test_try_accelerations_passes_regular_state() {
        let params = PhysicalParams::default();
        let state = AngularState::new(1.0, 2.0, -0.5, 0.25);
        assert_eq!(
            try_accelerations(&params, &state).unwrap(),
            accelerations(&params, &state)
        );
    }

    #[test]
    fn test_energy_of_hanging_rest() {
        let params = PhysicalParams::default();
        let e = total_energy(&params, &AngularState::default());
        assert_relative_eq!(e, -3.0 * 9.81, epsilon = 1e-12);
    }

    #[test]
    fn test_energy_of_inverted_rest() {
        let params = PhysicalParams::default();
        let e = total_energy(&params, &AngularState::at_rest(PI, PI));
        assert_relative_eq!(e, 3.0 * 9.81, epsilon = 1e-12);
    }

    #[test]
    fn test_energy_of_rigid_rotation_without_gravity() {
        // Both rods aligned and spinning together at ω: bob speeds ω·l1 and ω·(l1 + l2)
        let params = PhysicalParams {
            gravity: 0.0,
            ..PhysicalParams::default()
        };
        let omega = 1.5;
        let e = total_energy(&params, &AngularState::new(0.4, 0.4, omega, omega));
        let expected = 0.5 * omega * omega + 0.5 * (2.0 * omega) * (2.0 * omega);
        assert_relative_eq!(e, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_ode_rhs_layout() {
        let params = PhysicalParams::default();
        let state = AngularState::new(0.2, -0.3, 1.1, -0.7);
        let mut dydt = [0.0; 4];
        params.rhs(0.0, &state.to_array(), &mut dydt);
        let (a1, a2) = accelerations(&params, &state);
        assert_eq!(dydt, [1.1, -0.7, a1, a2]);
    }

    #[test]
    fn test_state_array_round_trip() {
        let state = AngularState::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(AngularState::from_array(state.to_array()), state);
        assert!(state.is_finite());
        assert!(!AngularState::new(0.0, f64::INFINITY, 0.0, 0.0).is_finite());
    }
}
