//! Simulation loop driver
//!
//! Owns both rods, the shared angular state and the trail, and wires them to
//! the outside world through two narrow traits: [`InputSource`] for the stop
//! signal and [`Renderer`] for drawing. One [`Simulation::tick`] is one frame:
//!
//! 1. poll the input for a termination request,
//! 2. advance the physics by exactly one fixed `dt`,
//! 3. move rod 1, then re-anchor rod 2 on rod 1's new endpoint and move it,
//! 4. record rod 2's endpoint in the trail,
//! 5. hand everything to the renderer.
//!
//! Simulated time is decoupled from wall-clock time: a tick always advances
//! by `dt`, however long the frame took.

use tracing::{debug, trace, warn};

use crate::config::{Config, ConfigError};
use crate::dynamics::{total_energy, AngularState, PhysicalParams};
use crate::integrator;
use crate::rod::{Point, Rgb, Rod};
use crate::trail::Trail;

/// Source of the external stop signal, polled once per tick
pub trait InputSource {
    /// True when the user asked to quit
    fn terminate_requested(&mut self) -> bool;
}

impl<F: FnMut() -> bool> InputSource for F {
    fn terminate_requested(&mut self) -> bool {
        self()
    }
}

/// Drawing primitives the driver needs
pub trait Renderer {
    /// Called once before anything is drawn for a frame
    fn begin_frame(&mut self) {}

    /// Straight line of the given width
    fn draw_segment(&mut self, from: Point, to: Point, width: f64, color: Rgb);

    /// Filled circle
    fn draw_bob(&mut self, center: Point, radius: f64, color: Rgb);

    /// Filled square with its top-left corner at `at`
    fn draw_trail_point(&mut self, at: Point, size: f64, color: Rgb);

    /// Called once after everything is drawn for a frame
    fn end_frame(&mut self) {}
}

/// Renderer that draws nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_segment(&mut self, _from: Point, _to: Point, _width: f64, _color: Rgb) {}
    fn draw_bob(&mut self, _center: Point, _radius: f64, _color: Rgb) {}
    fn draw_trail_point(&mut self, _at: Point, _size: f64, _color: Rgb) {}
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// A step was taken and a frame rendered
    Continue,
    /// Termination was requested; nothing was stepped or drawn
    Stop,
}

impl Tick {
    /// True for [`Tick::Stop`]
    pub fn is_stop(self) -> bool {
        self == Tick::Stop
    }
}

/// A running double pendulum
#[derive(Debug, Clone)]
pub struct Simulation {
    params: PhysicalParams,
    state: AngularState,
    upper: Rod,
    lower: Rod,
    trail: Option<Trail>,
    bob_radius: f64,
    trail_point_size: f64,
    steps: u64,
    diverged: bool,
}

impl Simulation {
    /// Pendulum anchored at `origin`, white rods, no trail
    pub fn new(params: PhysicalParams, state: AngularState, origin: Point) -> Self {
        let upper = Rod::new(params.length1, params.mass1, state.theta1, origin);
        let lower = Rod::new(params.length2, params.mass2, state.theta2, upper.endpoint());
        let mut sim = Self {
            params,
            state,
            upper,
            lower,
            trail: None,
            bob_radius: 1.0,
            trail_point_size: 1.0,
            steps: 0,
            diverged: false,
        };
        sim.sync_rods();
        sim
    }

    /// Validate `config` and build the pendulum it describes
    pub fn from_config(config: &Config, origin: Point) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut sim = Self::new(config.physical_params(), config.initial_state(), origin)
            .with_bob_radius(config.display.bob_radius);
        sim.upper = sim
            .upper
            .with_style(config.rod1.stroke_width, config.rod1.color);
        sim.lower = sim
            .lower
            .with_style(config.rod2.stroke_width, config.rod2.color);
        if config.trail.enabled {
            sim = sim.with_trail(config.trail.capacity, config.trail.point_size);
        }

        debug!(
            params = ?sim.params,
            state = ?sim.state,
            trail = config.trail.enabled,
            "simulation created"
        );
        Ok(sim)
    }

    /// Record the last `capacity` endpoints of rod 2, drawn as `point_size` squares
    pub fn with_trail(mut self, capacity: usize, point_size: f64) -> Self {
        self.trail = Some(Trail::new(capacity));
        self.trail_point_size = point_size;
        self
    }

    /// Radius of the circle drawn at each rod's endpoint
    pub fn with_bob_radius(mut self, radius: f64) -> Self {
        self.bob_radius = radius;
        self
    }

    /// Poll, step, propagate and render one frame
    pub fn tick<I, R>(&mut self, input: &mut I, renderer: &mut R) -> Tick
    where
        I: InputSource + ?Sized,
        R: Renderer + ?Sized,
    {
        if input.terminate_requested() {
            debug!(steps = self.steps, "termination requested");
            return Tick::Stop;
        }

        self.advance();
        self.render(renderer);
        Tick::Continue
    }

    /// Tick until the input requests termination; returns the number of steps taken
    pub fn run<I, R>(&mut self, input: &mut I, renderer: &mut R) -> u64
    where
        I: InputSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let start = self.steps;
        while self.tick(input, renderer) == Tick::Continue {}
        self.steps - start
    }

    /// Step the physics once and update geometry and trail, without I/O
    pub fn advance(&mut self) {
        self.state = integrator::step(&self.params, &self.state);
        self.steps += 1;

        if !self.diverged && !self.state.is_finite() {
            self.diverged = true;
            warn!(
                steps = self.steps,
                state = ?self.state,
                "pendulum state diverged; rendering will no longer be meaningful"
            );
        }

        self.sync_rods();
        if let Some(trail) = self.trail.as_mut() {
            trail.push(self.lower.endpoint());
        }

        trace!(
            step = self.steps,
            theta1 = self.state.theta1,
            theta2 = self.state.theta2,
            "tick"
        );
    }

    /// Draw both rods, their bobs and the trail
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        renderer.begin_frame();
        for rod in [&self.upper, &self.lower] {
            renderer.draw_segment(rod.pivot(), rod.endpoint(), rod.stroke_width, rod.color);
            renderer.draw_bob(rod.endpoint(), self.bob_radius, rod.color);
        }
        if let Some(trail) = &self.trail {
            for &point in trail.iter() {
                renderer.draw_trail_point(point, self.trail_point_size, self.lower.color);
            }
        }
        renderer.end_frame();
    }

    /// Current angular state
    pub fn state(&self) -> &AngularState {
        &self.state
    }

    /// Physical parameters of the run
    pub fn params(&self) -> &PhysicalParams {
        &self.params
    }

    /// Upper rod, anchored at the origin
    pub fn upper(&self) -> &Rod {
        &self.upper
    }

    /// Lower rod, anchored at the upper rod's endpoint
    pub fn lower(&self) -> &Rod {
        &self.lower
    }

    /// Trail of the lower rod's endpoint, if enabled
    pub fn trail(&self) -> Option<&Trail> {
        self.trail.as_ref()
    }

    /// Number of steps taken
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated time elapsed: `steps · dt`
    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * self.params.dt
    }

    /// Total mechanical energy of the current state
    pub fn energy(&self) -> f64 {
        total_energy(&self.params, &self.state)
    }

    /// True once the state has become non-finite
    pub fn has_diverged(&self) -> bool {
        self.diverged
    }

    fn sync_rods(&mut self) {
        self.upper.update(self.state.theta1);
        self.upper.set_angular_velocity(self.state.theta1_dot);
        self.lower.set_pivot(self.upper.endpoint());
        self.lower.update(self.state.theta2);
        self.lower.set_angular_velocity(self.state.theta2_dot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[derive(Default)]
    struct Recorder {
        frames: usize,
        segments: Vec<(Point, Point, f64, Rgb)>,
        bobs: Vec<(Point, f64)>,
        trail_points: Vec<Point>,
    }

    impl Renderer for Recorder {
        fn begin_frame(&mut self) {
            self.frames += 1;
            self.segments.clear();
            self.bobs.clear();
            self.trail_points.clear();
        }
        fn draw_segment(&mut self, from: Point, to: Point, width: f64, color: Rgb) {
            self.segments.push((from, to, width, color));
        }
        fn draw_bob(&mut self, center: Point, radius: f64, _color: Rgb) {
            self.bobs.push((center, radius));
        }
        fn draw_trail_point(&mut self, at: Point, _size: f64, _color: Rgb) {
            self.trail_points.push(at);
        }
    }

    fn never() -> impl FnMut() -> bool {
        || false
    }

    fn sim() -> Simulation {
        Simulation::new(
            PhysicalParams::default(),
            AngularState::at_rest(FRAC_PI_2, FRAC_PI_2),
            Point::new(0.0, 0.0),
        )
    }

    #[test]
    fn test_initial_geometry_is_chained() {
        let sim = sim();
        assert_eq!(sim.lower().pivot(), sim.upper().endpoint());
        assert_relative_eq!(sim.lower().endpoint().x, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tick_propagates_post_step_pivot() {
        let mut sim = sim();
        let before = sim.upper().endpoint();
        let tick = sim.tick(&mut never(), &mut NullRenderer);
        assert_eq!(tick, Tick::Continue);

        let after = sim.upper().endpoint();
        assert_ne!(after, before);
        assert_eq!(sim.lower().pivot(), after);

        let expected = Rod::new(1.0, 1.0, sim.state().theta1, Point::default()).endpoint();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_tick_matches_integrator_step() {
        let mut sim = sim();
        let expected = integrator::step(sim.params(), sim.state());
        sim.tick(&mut never(), &mut NullRenderer);
        assert_eq!(*sim.state(), expected);
        assert_eq!(sim.upper().angle(), expected.theta1);
        assert_eq!(sim.lower().angular_velocity(), expected.theta2_dot);
    }

    #[test]
    fn test_stop_request_skips_step_and_render() {
        let mut sim = sim();
        let mut recorder = Recorder::default();
        let state = *sim.state();
        let tick = sim.tick(&mut (|| true), &mut recorder);
        assert_eq!(tick, Tick::Stop);
        assert_eq!(*sim.state(), state);
        assert_eq!(sim.steps(), 0);
        assert_eq!(recorder.frames, 0);
    }

    #[test]
    fn test_run_until_stop() {
        let mut sim = sim();
        let mut remaining = 25;
        let mut input = move || {
            if remaining == 0 {
                true
            } else {
                remaining -= 1;
                false
            }
        };
        let steps = sim.run(&mut input, &mut NullRenderer);
        assert_eq!(steps, 25);
        assert_eq!(sim.steps(), 25);
        assert_relative_eq!(sim.elapsed(), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_render_hands_off_both_rods() {
        let mut sim = sim().with_bob_radius(7.0);
        let mut recorder = Recorder::default();
        sim.tick(&mut never(), &mut recorder);

        assert_eq!(recorder.frames, 1);
        assert_eq!(recorder.segments.len(), 2);
        assert_eq!(recorder.segments[0].0, Point::new(0.0, 0.0));
        assert_eq!(recorder.segments[0].1, sim.upper().endpoint());
        assert_eq!(recorder.segments[1].0, sim.upper().endpoint());
        assert_eq!(recorder.segments[1].1, sim.lower().endpoint());
        assert_eq!(
            recorder.bobs,
            vec![(sim.upper().endpoint(), 7.0), (sim.lower().endpoint(), 7.0)]
        );
        assert!(recorder.trail_points.is_empty());
    }

    #[test]
    fn test_trail_records_lower_endpoint() {
        let mut sim = sim().with_trail(3, 2.0);
        let mut recorder = Recorder::default();
        let mut endpoints = Vec::new();
        for _ in 0..5 {
            sim.tick(&mut never(), &mut recorder);
            endpoints.push(sim.lower().endpoint());
        }
        let trail = sim.trail().unwrap();
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.iter().copied().collect::<Vec<_>>(), endpoints[2..]);
        assert_eq!(recorder.trail_points, endpoints[2..]);
    }

    #[test]
    fn test_from_config_applies_styles() {
        let mut config = Config::default();
        config.rod1.color = [10, 20, 30];
        config.trail.capacity = 4;
        let sim = Simulation::from_config(&config, Point::new(500.0, 300.0)).unwrap();
        assert_eq!(sim.upper().color, [10, 20, 30]);
        assert_eq!(sim.upper().stroke_width, 2.0);
        assert_eq!(sim.upper().pivot(), Point::new(500.0, 300.0));
        assert_eq!(sim.trail().map(Trail::capacity), Some(4));
    }

    #[test]
    fn test_from_config_without_trail() {
        let mut config = Config::default();
        config.trail.enabled = false;
        let sim = Simulation::from_config(&config, Point::default()).unwrap();
        assert!(sim.trail().is_none());
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = Config::default();
        config.physics.damping = 0.0;
        assert!(Simulation::from_config(&config, Point::default()).is_err());
    }

    #[test]
    fn test_divergence_is_flagged_and_ticking_continues() {
        let params = PhysicalParams {
            mass1: 0.0,
            ..PhysicalParams::default()
        };
        let mut sim = Simulation::new(params, AngularState::at_rest(0.5, 0.5), Point::default());
        assert!(!sim.has_diverged());
        assert_eq!(sim.tick(&mut never(), &mut NullRenderer), Tick::Continue);
        assert!(sim.has_diverged());
        assert_eq!(sim.tick(&mut never(), &mut NullRenderer), Tick::Continue);
        assert_eq!(sim.steps(), 2);
    }

    #[test]
    fn test_energy_tracks_state() {
        let sim = sim();
        assert_relative_eq!(sim.energy(), 0.0, epsilon = 1e-12);
    }
}
