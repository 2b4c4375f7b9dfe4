//! Desperation: how much faster a boss moves and attacks as it loses health.

use duet_core::constants::DESPERATION_CAP;

/// Linear curve over missing health, `base + slope * (1 - ratio)`, capped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesperationCurve {
    pub base: f32,
    pub slope: f32,
    pub cap: f32,
}

impl DesperationCurve {
    pub const fn new(base: f32, slope: f32) -> Self {
        Self {
            base,
            slope,
            cap: DESPERATION_CAP,
        }
    }

    /// Multiplier for the given health ratio. Ratios outside [0, 1] are clamped.
    pub fn at(&self, health_ratio: f32) -> f32 {
        let missing = 1.0 - health_ratio.clamp(0.0, 1.0);
        (self.base + self.slope * missing).min(self.cap)
    }
}
