//! Fixed-step Runge-Kutta 4 Integrator
//!
//! A four-stage explicit RK4 stepper for first-order ODE systems.
//! There is no error estimate and no step-size control: every call
//! advances the solution by exactly the step it is given.

use thiserror::Error;

use crate::coefficients::{A, B, C, STAGES};

/// System of ordinary differential equations: dy/dt = f(t, y)
pub trait OdeSystem<const N: usize> {
    /// Evaluate the right-hand side of the ODE system
    ///
    /// # Arguments
    /// * `t` - Current time
    /// * `y` - Current state vector
    /// * `dydt` - Output: derivative dy/dt
    fn rhs(&self, t: f64, y: &[f64; N], dydt: &mut [f64; N]);
}

/// Integration statistics for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total number of right-hand side evaluations
    pub fn_evals: u64,
    /// Number of steps taken
    pub steps: u64,
}

/// Classic fixed-step Runge-Kutta 4 integrator
///
/// # Type Parameters
/// * `N` - Dimension of the state vector
///
/// # Example
/// ```
/// use double_pendulum::{OdeSystem, Rk4};
///
/// struct HarmonicOscillator { omega: f64 }
///
/// impl OdeSystem<2> for HarmonicOscillator {
///     fn rhs(&self, _t: f64, y: &[f64; 2], dydt: &mut [f64; 2]) {
///         dydt[0] = y[1];
///         dydt[1] = -self.omega * self.omega * y[0];
///     }
/// }
///
/// let sys = HarmonicOscillator { omega: 1.0 };
/// let mut solver = Rk4::new();
/// let (t, y) = solver.integrate(&sys, 0.0, &[1.0, 0.0], 0.01, 100).unwrap();
/// assert!((t - 1.0).abs() < 1e-12);
/// assert!((y[0] - 1.0_f64.cos()).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Rk4<const N: usize> {
    /// Stage evaluations (pre-allocated workspace)
    k: [[f64; N]; STAGES],
    /// Integration statistics
    pub stats: Stats,
}

impl<const N: usize> Default for Rk4<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Rk4<N> {
    /// Create a new RK4 stepper with zeroed statistics
    pub fn new() -> Self {
        Self {
            k: [[0.0; N]; STAGES],
            stats: Stats::default(),
        }
    }

    /// Advance `y` from `t` to `t + h` with one RK4 step
    ///
    /// No validation is performed: non-finite inputs or a singular
    /// right-hand side produce non-finite output.
    pub fn step<S: OdeSystem<N>>(&mut self, sys: &S, t: f64, y: &[f64; N], h: f64) -> [f64; N] {
        self.compute_stages(sys, t, y, h);
        let y_new = self.compute_solution(y, h);

        self.stats.fn_evals += STAGES as u64;
        self.stats.steps += 1;

        y_new
    }

    /// Integrate `steps` fixed steps of size `h` starting at (t0, y0)
    ///
    /// # Returns
    /// * `Ok((t_final, y_final))` on success
    /// * `Err(IntegrationError::NonFiniteState)` as soon as a step leaves
    ///   the state non-finite
    pub fn integrate<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        t0: f64,
        y0: &[f64; N],
        h: f64,
        steps: u64,
    ) -> Result<(f64, [f64; N]), IntegrationError> {
        validate_inputs(t0, y0, h)?;

        let mut y = *y0;
        let mut t = t0;
        for step in 0..steps {
            y = self.step(sys, t, &y, h);
            t = t0 + (step + 1) as f64 * h;
            if !is_finite(&y) {
                return Err(IntegrationError::NonFiniteState { t, step: step + 1 });
            }
        }

        Ok((t, y))
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = Stats::default();
    }

    /// Compute all four stages
    #[allow(clippy::needless_range_loop)]
    fn compute_stages<S: OdeSystem<N>>(&mut self, sys: &S, t: f64, y: &[f64; N], h: f64) {
        let mut y_temp = [0.0; N];

        sys.rhs(t, y, &mut self.k[0]);

        for i in 1..STAGES {
            // y_temp = y + h * sum_{j<i} a[i][j] * k[j]
            for n in 0..N {
                let mut sum = 0.0;
                for j in 0..i {
                    sum += A[i][j] * self.k[j][n];
                }
                y_temp[n] = y[n] + h * sum;
            }

            sys.rhs(t + C[i] * h, &y_temp, &mut self.k[i]);
        }
    }

    #[allow(clippy::needless_range_loop)]
    fn compute_solution(&self, y: &[f64; N], h: f64) -> [f64; N] {
        let mut y_new = [0.0; N];

        for n in 0..N {
            let mut sum = 0.0;
            for i in 0..STAGES {
                sum += B[i] * self.k[i][n];
            }
            y_new[n] = y[n] + h * sum;
        }

        y_new
    }
}

/// True when every component of `y` is finite
pub fn is_finite<const N: usize>(y: &[f64; N]) -> bool {
    y.iter().all(|v| v.is_finite())
}

fn validate_inputs<const N: usize>(t0: f64, y0: &[f64; N], h: f64) -> Result<(), IntegrationError> {
    if !t0.is_finite() || !h.is_finite() {
        return Err(IntegrationError::InvalidInput {
            message: "t0 and h must be finite".to_string(),
        });
    }
    if h == 0.0 {
        return Err(IntegrationError::InvalidInput {
            message: "h must be non-zero".to_string(),
        });
    }
    for (i, &val) in y0.iter().enumerate() {
        if !val.is_finite() {
            return Err(IntegrationError::InvalidInput {
                message: format!("y0[{}] is not finite", i),
            });
        }
    }
    Ok(())
}

/// Errors that can occur during integration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    /// Invalid input parameters
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the invalid input
        message: String,
    },
    /// Non-finite state detected during integration
    #[error("Non-finite state detected at t = {t} (step {step})")]
    NonFiniteState {
        /// Time at which non-finite state was detected
        t: f64,
        /// Number of steps taken when the state diverged
        step: u64,
    },
}
