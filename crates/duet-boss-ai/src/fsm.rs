//! Boss phase scheduler.
//!
//! Accumulates the phase timer, decides when the current phase ends and
//! which phase follows. The phase bodies themselves live with the
//! simulation; the scheduler only reports which one should run this tick.

use log::debug;
use rand::Rng;

use duet_core::enums::{BossKind, BossPhase, PhaseRole};

use crate::profiles::{get_profile, BossProfile, CooldownRule, Opening};
use crate::selection::{select_next, SelectionState};

/// Output of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTick {
    pub phase: BossPhase,
    /// A new phase was drawn this tick. Per-attack cooldowns should be
    /// discarded.
    pub changed: bool,
    /// The phase body should run. False while an inter-phase cooldown is
    /// still counting up to zero.
    pub active: bool,
    pub desperation: f32,
}

/// Per-boss phase state machine.
#[derive(Debug, Clone)]
pub struct PhaseScheduler {
    profile: BossProfile,
    timer: f32,
    desperation: f32,
    selection: SelectionState,
}

impl PhaseScheduler {
    pub fn new<R: Rng + ?Sized>(kind: BossKind, rng: &mut R) -> Self {
        let profile = get_profile(kind);
        let first = profile.phases.first().map(|spec| spec.phase).unwrap_or(BossPhase::Jump);
        let mut scheduler = Self {
            profile,
            timer: 0.0,
            desperation: profile.desperation.at(1.0),
            selection: SelectionState {
                current: first,
                last_attack: None,
                attacks_since_movement: 0,
            },
        };
        scheduler.reset(rng);
        scheduler
    }

    /// Return to the boss's opening state. The last attack is kept, so the
    /// first draw after a retry still avoids it.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.desperation = self.profile.desperation.at(1.0);
        match self.profile.opening {
            Opening::Fixed {
                phase,
                timer,
                attacks_since_movement,
            } => {
                self.selection.current = phase;
                self.selection.attacks_since_movement = attacks_since_movement;
                self.timer = timer;
            }
            Opening::Draw => {
                self.selection.attacks_since_movement = 0;
                self.switch_phase(rng);
            }
        }
    }

    pub fn kind(&self) -> BossKind {
        self.profile.kind
    }

    pub fn profile(&self) -> &BossProfile {
        &self.profile
    }

    pub fn phase(&self) -> BossPhase {
        self.selection.current
    }

    pub fn role(&self) -> PhaseRole {
        self.profile.role(self.selection.current)
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Desperation as of the last [`advance`](Self::advance).
    pub fn desperation(&self) -> f32 {
        self.desperation
    }

    pub fn last_attack(&self) -> Option<BossPhase> {
        self.selection.last_attack
    }

    /// Pin the timer at zero so the current phase does not progress.
    pub fn hold(&mut self) {
        self.timer = 0.0;
    }

    /// Advance one tick. Desperation is recomputed from `health_ratio`.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        health_ratio: f32,
        rng: &mut R,
    ) -> PhaseTick {
        self.desperation = self.profile.desperation.at(health_ratio);
        self.timer += self.profile.timer_step(dt, self.desperation);

        let mut changed = false;
        if self.timer >= self.profile.threshold(self.selection.current) {
            changed = self.switch_phase(rng);
        }

        PhaseTick {
            phase: self.selection.current,
            changed,
            active: self.timer >= 0.0,
            desperation: self.desperation,
        }
    }

    fn switch_phase<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let previous_role = self.role();
        let Some(next) = select_next(
            &self.profile.selection,
            self.profile.attacks,
            &mut self.selection,
            rng,
        ) else {
            self.timer = 0.0;
            return false;
        };
        let next_role = self.profile.role(next);

        self.timer = match self.profile.cooldown {
            CooldownRule::None => 0.0,
            CooldownRule::Always(seconds) => self.profile.cooldown_offset(seconds),
            CooldownRule::BetweenAttacks(seconds)
                if previous_role == PhaseRole::Attack && next_role == PhaseRole::Attack =>
            {
                self.profile.cooldown_offset(seconds)
            }
            CooldownRule::BetweenAttacks(_) => 0.0,
        };

        debug!(
            "{:?} switches to {:?} (timer {:.2}, desperation {:.2})",
            self.profile.kind, next, self.timer, self.desperation
        );
        true
    }
}
