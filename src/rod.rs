//! Per-rod kinematic state and derived geometry

use serde::{Deserialize, Serialize};

/// A point in screen space (x to the right, y downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate, increasing downward
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 8-bit RGB colour
pub type Rgb = [u8; 3];

/// One rigid rod with a point mass at its far end
///
/// The endpoint is derived from the pivot, length and angle and is
/// recomputed by [`Rod::update`]. A rod never owns the rod it hangs from:
/// chaining is done by the caller through [`Rod::set_pivot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rod {
    /// Rod length
    pub length: f64,
    /// Point mass at the endpoint
    pub mass: f64,
    /// Stroke width used when drawing the rod
    pub stroke_width: f64,
    /// Colour of the rod and its bob
    pub color: Rgb,
    angle: f64,
    angular_velocity: f64,
    pivot: Point,
    endpoint: Point,
}

impl Rod {
    /// Create a rod hanging from `pivot` at `angle`, at rest
    pub fn new(length: f64, mass: f64, angle: f64, pivot: Point) -> Self {
        let mut rod = Self {
            length,
            mass,
            stroke_width: 1.0,
            color: [255, 255, 255],
            angle,
            angular_velocity: 0.0,
            pivot,
            endpoint: pivot,
        };
        rod.update(angle);
        rod
    }

    /// Set the stroke width and colour used for drawing
    pub fn with_style(mut self, stroke_width: f64, color: Rgb) -> Self {
        self.stroke_width = stroke_width;
        self.color = color;
        self
    }

    /// Set the angle and recompute the endpoint from the current pivot
    pub fn update(&mut self, angle: f64) {
        self.angle = angle;
        self.endpoint = Point::new(
            self.pivot.x + self.length * angle.sin(),
            self.pivot.y + self.length * angle.cos(),
        );
    }

    /// Record the angular velocity reported by the integrator
    pub fn set_angular_velocity(&mut self, angular_velocity: f64) {
        self.angular_velocity = angular_velocity;
    }

    /// Move the pivot. The endpoint is stale until the next [`Rod::update`].
    pub fn set_pivot(&mut self, pivot: Point) {
        self.pivot = pivot;
    }

    /// Current angle from the downward vertical
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Last recorded angular velocity
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Attachment point
    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// Far end of the rod, where the mass sits
    pub fn endpoint(&self) -> Point {
        self.endpoint
    }
}
