//! Boss-specific behavioral profiles.
//!
//! Consolidates each boss's phase table, clock, selection and cooldown
//! rules so the scheduler itself stays boss-agnostic.

use duet_core::constants::*;
use duet_core::enums::{BossKind, BossPhase, PhaseRole};

use crate::desperation::DesperationCurve;
use crate::selection::SelectionRule;

/// One row of a boss's phase table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseSpec {
    pub phase: BossPhase,
    pub role: PhaseRole,
    /// Phase duration in seconds. Only read by [`PhaseClock::Seconds`].
    pub length: f32,
}

impl PhaseSpec {
    const fn movement(phase: BossPhase) -> Self {
        Self {
            phase,
            role: PhaseRole::Movement,
            length: 0.0,
        }
    }

    const fn attack(phase: BossPhase, length: f32) -> Self {
        Self {
            phase,
            role: PhaseRole::Attack,
            length,
        }
    }
}

/// How the phase timer is measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseClock {
    /// Timer runs 0..1 over one shared phase length.
    Normalized { phase_length: f32 },
    /// Timer runs in (desperation-scaled) seconds up to each phase's own length.
    Seconds,
}

/// Negative timer offset applied on a phase switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CooldownRule {
    None,
    /// Every switch waits this many seconds.
    Always(f32),
    /// Only an attack following another attack waits.
    BetweenAttacks(f32),
}

/// Scheduler state after a reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Opening {
    /// Start in a fixed phase with a fixed timer.
    Fixed {
        phase: BossPhase,
        timer: f32,
        attacks_since_movement: u32,
    },
    /// Start with a regular draw, cooldown included.
    Draw,
}

/// Everything the scheduler needs to know about one boss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossProfile {
    pub kind: BossKind,
    pub desperation: DesperationCurve,
    pub clock: PhaseClock,
    pub phases: &'static [PhaseSpec],
    pub attacks: &'static [BossPhase],
    pub selection: SelectionRule,
    pub cooldown: CooldownRule,
    pub opening: Opening,
}

impl BossProfile {
    pub fn spec(&self, phase: BossPhase) -> Option<&PhaseSpec> {
        self.phases.iter().find(|spec| spec.phase == phase)
    }

    pub fn role(&self, phase: BossPhase) -> PhaseRole {
        self.spec(phase)
            .map(|spec| spec.role)
            .unwrap_or(PhaseRole::Attack)
    }

    /// Timer value at which the current phase ends.
    pub fn threshold(&self, phase: BossPhase) -> f32 {
        match self.clock {
            PhaseClock::Normalized { .. } => 1.0,
            PhaseClock::Seconds => self.spec(phase).map(|spec| spec.length).unwrap_or(1.0),
        }
    }

    /// Timer increment for one tick.
    pub fn timer_step(&self, dt: f32, desperation: f32) -> f32 {
        match self.clock {
            PhaseClock::Normalized { phase_length } => dt * desperation / phase_length,
            PhaseClock::Seconds => dt * desperation,
        }
    }

    /// Convert a cooldown in seconds into timer units.
    pub fn cooldown_offset(&self, seconds: f32) -> f32 {
        match self.clock {
            PhaseClock::Normalized { phase_length } => -(seconds / phase_length),
            PhaseClock::Seconds => -seconds,
        }
    }
}

const SLIME_PHASES: [PhaseSpec; 4] = [
    PhaseSpec::movement(BossPhase::Jump),
    PhaseSpec::attack(BossPhase::SlimeBall, SLIME_PHASE_LENGTH),
    PhaseSpec::attack(BossPhase::Bubble, SLIME_PHASE_LENGTH),
    PhaseSpec::attack(BossPhase::BabySlime, SLIME_PHASE_LENGTH),
];
const SLIME_ATTACKS: [BossPhase; 3] =
    [BossPhase::SlimeBall, BossPhase::Bubble, BossPhase::BabySlime];

const CRAB_PHASES: [PhaseSpec; 4] = [
    PhaseSpec::movement(BossPhase::Walk),
    PhaseSpec::attack(BossPhase::Claw, CRAB_PHASE_LENGTH),
    PhaseSpec::attack(BossPhase::Water, CRAB_PHASE_LENGTH),
    PhaseSpec::attack(BossPhase::Sand, CRAB_PHASE_LENGTH),
];
const CRAB_ATTACKS: [BossPhase; 3] = [BossPhase::Claw, BossPhase::Water, BossPhase::Sand];

const KING_PHASES: [PhaseSpec; 3] = [
    PhaseSpec::attack(BossPhase::Crown, KING_CROWN_PHASE_LENGTH),
    PhaseSpec::attack(BossPhase::FalseHeavy, KING_FALSE_PHASE_LENGTH),
    PhaseSpec::attack(BossPhase::CoinBurst, KING_COIN_PHASE_LENGTH),
];
const KING_ATTACKS: [BossPhase; 3] =
    [BossPhase::Crown, BossPhase::FalseHeavy, BossPhase::CoinBurst];

/// Get the profile for a given boss.
pub fn get_profile(kind: BossKind) -> BossProfile {
    match kind {
        BossKind::ByleSlime => BossProfile {
            kind,
            desperation: DesperationCurve::new(1.0, 0.5),
            clock: PhaseClock::Normalized {
                phase_length: SLIME_PHASE_LENGTH,
            },
            phases: &SLIME_PHASES,
            attacks: &SLIME_ATTACKS,
            selection: SelectionRule::ForcedReposition {
                movement: BossPhase::Jump,
                after: SLIME_FORCED_JUMP_AFTER,
                chance: SLIME_JUMP_CHANCE,
            },
            cooldown: CooldownRule::BetweenAttacks(SLIME_PHASE_COOLDOWN),
            // Timer starts full so the first playing tick draws, and the
            // saturated counter makes that draw a jump.
            opening: Opening::Fixed {
                phase: BossPhase::Jump,
                timer: 1.0,
                attacks_since_movement: SLIME_FORCED_JUMP_AFTER,
            },
        },
        BossKind::GiantCrab => BossProfile {
            kind,
            desperation: DesperationCurve::new(1.0, 1.0),
            clock: PhaseClock::Normalized {
                phase_length: CRAB_PHASE_LENGTH,
            },
            phases: &CRAB_PHASES,
            attacks: &CRAB_ATTACKS,
            selection: SelectionRule::AlternateMovement {
                movement: BossPhase::Walk,
            },
            cooldown: CooldownRule::None,
            opening: Opening::Fixed {
                phase: BossPhase::Walk,
                timer: 0.0,
                attacks_since_movement: 0,
            },
        },
        BossKind::PossessedKing => BossProfile {
            kind,
            desperation: DesperationCurve::new(1.0, 0.5),
            clock: PhaseClock::Seconds,
            phases: &KING_PHASES,
            attacks: &KING_ATTACKS,
            selection: SelectionRule::NonRepeating,
            cooldown: CooldownRule::Always(KING_PHASE_COOLDOWN),
            opening: Opening::Draw,
        },
    }
}
