//! Boss component: shared combat vitals plus per-boss body state.

use rand::Rng;

use duet_boss_ai::fsm::PhaseScheduler;
use duet_core::combat::{Combatant, Vitals};
use duet_core::constants::*;
use duet_core::enums::BossKind;
use duet_core::types::Vec2;

/// Scratch state owned by each boss's phase bodies.
#[derive(Debug, Clone, PartialEq)]
pub enum BossBody {
    Slime {
        /// Jump index the slime is standing on.
        jump_from: usize,
        /// Jump index it is heading to; equal to `jump_from` when grounded.
        jump_to: usize,
        /// Slime balls alternate between aimed and random.
        aimed_last: bool,
    },
    Crab {
        move_timer: f32,
        sand_started: bool,
    },
    King {
        orbit_timer: f32,
    },
}

impl BossBody {
    pub fn new(kind: BossKind) -> Self {
        match kind {
            BossKind::ByleSlime => BossBody::Slime {
                jump_from: SLIME_HOME_JUMP,
                jump_to: SLIME_HOME_JUMP,
                aimed_last: false,
            },
            BossKind::GiantCrab => BossBody::Crab {
                move_timer: 0.0,
                sand_started: false,
            },
            BossKind::PossessedKing => BossBody::King { orbit_timer: 0.0 },
        }
    }
}

pub fn spawn_point(kind: BossKind) -> Vec2 {
    match kind {
        BossKind::ByleSlime => SLIME_SPAWN,
        BossKind::GiantCrab => CRAB_SPAWN,
        BossKind::PossessedKing => KING_SPAWN,
    }
}

pub fn radius(kind: BossKind) -> f32 {
    match kind {
        BossKind::ByleSlime => SLIME_RADIUS,
        BossKind::GiantCrab => CRAB_RADIUS,
        BossKind::PossessedKing => KING_RADIUS,
    }
}

/// The encounter's boss.
#[derive(Debug, Clone)]
pub struct BossState {
    pub kind: BossKind,
    pub vitals: Vitals,
    pub spawn: Vec2,
    pub scheduler: PhaseScheduler,
    /// Per-attack cooldown inside the current phase.
    pub next_attack_at: f32,
    pub body: BossBody,
}

impl BossState {
    pub fn new<R: Rng + ?Sized>(kind: BossKind, max_health: f32, rng: &mut R) -> Self {
        Self {
            kind,
            vitals: Vitals::new(max_health),
            spawn: spawn_point(kind),
            scheduler: PhaseScheduler::new(kind, rng),
            next_attack_at: 0.0,
            body: BossBody::new(kind),
        }
    }

    /// Full reset including the phase scheduler, which may need to draw.
    pub fn reset_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reset();
        self.scheduler.reset(rng);
    }
}

impl Combatant for BossState {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn spawn_point(&self) -> Vec2 {
        self.spawn
    }

    fn reset(&mut self) {
        self.vitals.restore();
        self.next_attack_at = 0.0;
        self.body = BossBody::new(self.kind);
    }
}
