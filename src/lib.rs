//! # Double Pendulum: fixed-step RK4 simulation
//!
//! Two point masses on massless rigid rods, integrated with the classic
//! fourth-order Runge-Kutta method at a fixed step and drawn in real time.
//!
//! ## Features
//!
//! - Closed-form Lagrangian equations of motion ([`accelerations`])
//! - Generic fixed-step RK4 for any [`OdeSystem`], with the Butcher tableau
//!   kept in [`coefficients`]
//! - Damped pendulum step ([`integrator::step`]) plus checked variants that
//!   report divergence instead of returning NaN
//! - Loop driver with pluggable input and rendering ([`Simulation`])
//! - JSON configuration with full defaults ([`Config`])
//!
//! ## Basic Usage
//!
//! ```rust
//! use double_pendulum::{integrator, AngularState, PhysicalParams};
//! use std::f64::consts::FRAC_PI_2;
//!
//! let params = PhysicalParams { dt: 0.001, ..PhysicalParams::default() };
//! let mut state = AngularState::at_rest(FRAC_PI_2, FRAC_PI_2);
//!
//! for _ in 0..1000 {
//!     state = integrator::step(&params, &state);
//! }
//! assert!(state.is_finite());
//! ```
//!
//! ## Driving a Simulation
//!
//! ```rust
//! use double_pendulum::{Config, NullRenderer, Point, Simulation, Tick};
//!
//! let config = Config::default();
//! let mut sim = Simulation::from_config(&config, Point::new(500.0, 300.0)).unwrap();
//!
//! let mut frames = 0;
//! let mut input = || { frames += 1; frames > 120 };
//! let steps = sim.run(&mut input, &mut NullRenderer);
//! assert_eq!(steps, 120);
//! assert_eq!(sim.lower().pivot(), sim.upper().endpoint());
//! ```
//!
//! ## Step Size and Stability
//!
//! The step is deliberately decoupled from wall-clock time. The default
//! `dt = 0.28` with pixel-sized rods (length ≈ 100) keeps per-step rotation
//! small, but with unit-length rods the same `dt` is far outside the RK4
//! stability region. Numerical energy growth and outright divergence are
//! then expected; [`integrator::try_step`] and [`integrator::advance`]
//! surface the latter as [`IntegrationError::NonFiniteState`].
//!
//! RK4 is not symplectic: even with `damping = 1` the total energy drifts
//! slowly. Over short horizons with small steps the drift stays tiny, which
//! [`total_energy`] makes easy to check.
//!
//! ## References
//!
//! 1. Hairer, E., Nørsett, S.P., & Wanner, G. (1993). "Solving
//!    Ordinary Differential Equations I: Nonstiff Problems".
//!    Springer.
//!
//! 2. Goldstein, H., Poole, C., & Safko, J. (2002). "Classical Mechanics",
//!    3rd ed., Addison-Wesley.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod coefficients;
pub mod config;
pub mod driver;
pub mod dynamics;
pub mod integrator;
pub mod rod;
pub mod solver;
pub mod trail;

pub use config::{Config, ConfigError, DisplayConfig, PhysicsConfig, RodConfig, TrailConfig};
pub use driver::{InputSource, NullRenderer, Renderer, Simulation, Tick};
pub use dynamics::{
    accelerations, total_energy, try_accelerations, AngularState, DynamicsError, PhysicalParams,
};
pub use rod::{Point, Rgb, Rod};
pub use solver::{IntegrationError, OdeSystem, Rk4, Stats};
pub use trail::Trail;
