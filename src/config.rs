//! Startup configuration
//!
//! Everything is fixed for the lifetime of a run. Every field has a
//! default, so a JSON file only needs to name the values it overrides:
//!
//! ```json
//! { "physics": { "damping": 0.999 }, "rod2": { "mass": 2.0 } }
//! ```

use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::dynamics::{AngularState, PhysicalParams};
use crate::rod::Rgb;

/// Rod length as a fraction of the window width
pub const BASE_LENGTH_RATIO: f64 = 0.1;
/// Rod stroke width as a fraction of the window width
pub const STROKE_WIDTH_RATIO: f64 = 0.002;
/// Bob radius as a fraction of the window width
pub const BOB_RADIUS_RATIO: f64 = 0.01;
/// Trail square size as a fraction of the window width
pub const TRAIL_POINT_RATIO: f64 = 0.005;

const DEFAULT_WIDTH: u32 = 1000;
/// Window width that configured pixel sizes refer to
pub const REFERENCE_WIDTH: f64 = DEFAULT_WIDTH as f64;
const DEFAULT_HEIGHT: u32 = 600;
const DEFAULT_FPS: u32 = 60;

/// Errors raised while loading or validating a [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {path}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid JSON for [`Config`]
    #[error("failed to parse config")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its allowed range
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Integration settings shared by both rods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational acceleration magnitude
    pub gravity: f64,
    /// Velocity decay per step, in (0, 1]
    pub damping: f64,
    /// Fixed step, in simulated time units per frame
    pub dt: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            damping: 1.0,
            dt: 0.28,
        }
    }
}

/// Geometry, mass, style and initial condition of one rod
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RodConfig {
    /// Rod length in pixels at [`REFERENCE_WIDTH`]
    pub length: f64,
    /// Point mass at the end of the rod
    pub mass: f64,
    /// Line width in pixels
    pub stroke_width: f64,
    /// Rod and bob colour
    pub color: Rgb,
    /// Starting angle from the downward vertical [rad]
    pub initial_angle: f64,
    /// Starting angular velocity
    pub initial_angular_velocity: f64,
}

impl Default for RodConfig {
    fn default() -> Self {
        let width = f64::from(DEFAULT_WIDTH);
        Self {
            length: (width * BASE_LENGTH_RATIO).floor(),
            mass: 1.0,
            stroke_width: (width * STROKE_WIDTH_RATIO).floor().max(1.0),
            color: [255, 255, 255],
            initial_angle: FRAC_PI_2,
            initial_angular_velocity: 0.0,
        }
    }
}

/// Window and frame pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target frames per second
    pub fps: u32,
    /// Open a fullscreen window instead of `width` × `height`
    pub fullscreen: bool,
    /// Windowed width in pixels
    pub width: u32,
    /// Windowed height in pixels
    pub height: u32,
    /// Background colour
    pub background: Rgb,
    /// Bob radius in pixels
    pub bob_radius: f64,
    /// Rescale lengths, stroke widths, bob radius and trail size from
    /// [`REFERENCE_WIDTH`] to the actual window width once it is known
    pub scale_to_width: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            fullscreen: false,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: [0, 0, 0],
            bob_radius: (f64::from(DEFAULT_WIDTH) * BOB_RADIUS_RATIO).floor(),
            scale_to_width: true,
        }
    }
}

/// History of rod 2's endpoint drawn behind the pendulum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Whether the trail is recorded and drawn
    pub enabled: bool,
    /// Side length of each trail square in pixels
    pub point_size: f64,
    /// Number of points kept
    pub capacity: usize,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            point_size: (f64::from(DEFAULT_WIDTH) * TRAIL_POINT_RATIO).floor(),
            capacity: 2 * DEFAULT_FPS as usize,
        }
    }
}

/// Complete startup configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Integration settings
    pub physics: PhysicsConfig,
    /// Upper rod, hanging from the world origin
    pub rod1: RodConfig,
    /// Lower rod, hanging from rod 1's bob
    pub rod2: RodConfig,
    /// Window settings
    pub display: DisplayConfig,
    /// Trail settings
    pub trail: TrailConfig,
}

impl Config {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Pretty-printed JSON for this configuration
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        check(
            "physics.gravity",
            physics.gravity.is_finite() && physics.gravity >= 0.0,
            || format!("must be finite and non-negative, got {}", physics.gravity),
        )?;
        check(
            "physics.damping",
            physics.damping > 0.0 && physics.damping <= 1.0,
            || format!("must be in (0, 1], got {}", physics.damping),
        )?;
        check(
            "physics.dt",
            physics.dt.is_finite() && physics.dt > 0.0,
            || format!("must be finite and positive, got {}", physics.dt),
        )?;

        let rods = [
            (&self.rod1, ["rod1.length", "rod1.mass", "rod1.stroke_width", "rod1.initial_angle"]),
            (&self.rod2, ["rod2.length", "rod2.mass", "rod2.stroke_width", "rod2.initial_angle"]),
        ];
        for (rod, [length_field, mass_field, stroke_field, angle_field]) in rods {
            positive(length_field, rod.length)?;
            positive(mass_field, rod.mass)?;
            positive(stroke_field, rod.stroke_width)?;
            check(
                angle_field,
                rod.initial_angle.is_finite() && rod.initial_angular_velocity.is_finite(),
                || "initial angle and angular velocity must be finite".to_string(),
            )?;
        }

        let display = &self.display;
        check("display.fps", display.fps > 0, || "must be positive".to_string())?;
        check("display.width", display.width > 0, || "must be positive".to_string())?;
        check("display.height", display.height > 0, || "must be positive".to_string())?;
        positive("display.bob_radius", display.bob_radius)?;

        check("trail.capacity", self.trail.capacity > 0, || {
            "must be positive".to_string()
        })?;
        positive("trail.point_size", self.trail.point_size)?;

        Ok(())
    }

    /// Copy with pixel sizes rescaled from the reference width to `width`
    ///
    /// Lengths, stroke widths, the bob radius and trail squares are all
    /// authored against a window [`REFERENCE_WIDTH`] pixels wide and are
    /// multiplied by `width / REFERENCE_WIDTH`, truncated to whole pixels.
    /// With the defaults that gives rods at 10 % of the width, strokes at
    /// 0.2 %, bobs at 1 % and trail squares at 0.5 %.
    pub fn scaled_to_width(&self, width: f64) -> Self {
        let scale = |size: f64| (size * width / REFERENCE_WIDTH).floor().max(1.0);

        let mut scaled = self.clone();
        for rod in [&mut scaled.rod1, &mut scaled.rod2] {
            rod.length = scale(rod.length);
            rod.stroke_width = scale(rod.stroke_width);
        }
        scaled.display.bob_radius = scale(scaled.display.bob_radius);
        scaled.trail.point_size = scale(scaled.trail.point_size);
        scaled
    }

    /// Sizes for a window `width` pixels wide, honouring
    /// [`DisplayConfig::scale_to_width`]
    pub fn for_window_width(&self, width: f64) -> Self {
        if self.display.scale_to_width {
            self.scaled_to_width(width)
        } else {
            self.clone()
        }
    }

    /// Physical parameters for the dynamics and integrator
    pub fn physical_params(&self) -> PhysicalParams {
        PhysicalParams {
            length1: self.rod1.length,
            length2: self.rod2.length,
            mass1: self.rod1.mass,
            mass2: self.rod2.mass,
            gravity: self.physics.gravity,
            damping: self.physics.damping,
            dt: self.physics.dt,
        }
    }

    /// Angular state at the start of the run
    pub fn initial_state(&self) -> AngularState {
        AngularState::new(
            self.rod1.initial_angle,
            self.rod2.initial_angle,
            self.rod1.initial_angular_velocity,
            self.rod2.initial_angular_velocity,
        )
    }
}

fn check(
    field: &'static str,
    ok: bool,
    reason: impl FnOnce() -> String,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: reason(),
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    check(field, value.is_finite() && value > 0.0, || {
        format!("must be finite and positive, got {}", value)
    })
}
