//! Shared health / damage / death lifecycle for players and bosses.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Health pool of a combatant.
///
/// Invariant: `0 <= health <= max_health`, and `dead` flips to true exactly
/// once, when health reaches zero. Only [`Vitals::restore`] clears it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
}

/// Result of a damage attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Dropped: non-positive amount, already dead, or immune.
    Ignored,
    /// Health went down but stayed above zero.
    Hurt { dealt: f32 },
    /// Health reached zero.
    Killed { dealt: f32 },
}

impl DamageOutcome {
    pub fn is_lethal(&self) -> bool {
        matches!(self, DamageOutcome::Killed { .. })
    }

    /// Health actually removed.
    pub fn dealt(&self) -> f32 {
        match *self {
            DamageOutcome::Ignored => 0.0,
            DamageOutcome::Hurt { dealt } | DamageOutcome::Killed { dealt } => dealt,
        }
    }
}

impl Vitals {
    pub fn new(max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            health: max_health,
            max_health,
            dead: false,
        }
    }

    /// Current health over maximum health, in [0, 1].
    pub fn ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Subtract `amount`, saturating at zero.
    pub fn apply(&mut self, amount: f32) -> DamageOutcome {
        // `!(x > 0)` also rejects NaN.
        if !(amount > 0.0) || self.dead {
            return DamageOutcome::Ignored;
        }

        let before = self.health;
        self.health = (self.health - amount).max(0.0);
        let dealt = before - self.health;

        if self.health <= 0.0 {
            self.dead = true;
            DamageOutcome::Killed { dealt }
        } else {
            DamageOutcome::Hurt { dealt }
        }
    }

    /// Full health, alive again.
    pub fn restore(&mut self) {
        self.health = self.max_health;
        self.dead = false;
    }
}

/// Capability shared by every combat entity variant.
///
/// Variants override the hooks; the damage flow itself lives in the
/// provided methods so every variant resolves damage the same way.
pub trait Combatant {
    fn vitals(&self) -> &Vitals;

    fn vitals_mut(&mut self) -> &mut Vitals;

    /// Where [`Combatant::reset`] puts the entity back.
    fn spawn_point(&self) -> Vec2;

    /// Gate evaluated before any state change. Rejected damage is dropped silently.
    fn accepts_damage(&self, _now: f32) -> bool {
        true
    }

    /// Called after non-lethal damage.
    fn on_damage(&mut self, _now: f32) {}

    /// Called once, on the lethal hit.
    fn on_death(&mut self) {}

    /// Restore full health and variant-specific starting state.
    /// The caller moves the entity to [`Combatant::spawn_point`].
    fn reset(&mut self);

    fn take_damage(&mut self, amount: f32, now: f32) -> DamageOutcome {
        if !self.accepts_damage(now) {
            return DamageOutcome::Ignored;
        }

        let outcome = self.vitals_mut().apply(amount);
        match outcome {
            DamageOutcome::Hurt { .. } => self.on_damage(now),
            DamageOutcome::Killed { .. } => self.on_death(),
            DamageOutcome::Ignored => {}
        }
        outcome
    }

    /// Returns true when this hit killed the entity.
    fn damage(&mut self, amount: f32, now: f32) -> bool {
        self.take_damage(amount, now).is_lethal()
    }

    fn health_ratio(&self) -> f32 {
        self.vitals().ratio()
    }

    fn is_dead(&self) -> bool {
        self.vitals().dead
    }
}
