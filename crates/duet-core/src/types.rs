//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Monotonic wall time in seconds.
    pub now: f32,
    /// Delta of the most recent tick in seconds.
    pub dt: f32,
}

/// One reading of the external frame clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    pub now: f32,
    pub dt: f32,
}

impl SimTime {
    /// Advance by one fixed tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.dt = dt.max(0.0);
        self.now += self.dt;
    }

    /// Adopt an external clock reading. Time never runs backwards.
    pub fn advance_to(&mut self, clock: FrameClock) {
        self.tick += 1;
        self.dt = clock.dt.max(0.0);
        self.now = clock.now.max(self.now);
    }
}

/// Axis-aligned rectangle, used for the arena and player bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Linear interpolation, unclamped.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Two circles overlap when their centres are closer than the summed radii.
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}
