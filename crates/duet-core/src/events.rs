//! Cue events emitted by the simulation for animation, audio and UI layers.
//!
//! Cues are fire-and-forget: the simulation never waits on them.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Vec2;

/// A symbolic cue for the presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Cue {
    /// A new encounter was loaded.
    EncounterLoaded { boss: BossKind },
    /// Intro finished; play begins.
    FightStarted { boss: BossKind },
    /// Player fired a light or heavy attack.
    PlayerAttack { player: PlayerSlot, heavy: bool },
    /// Player began transferring resource to their partner.
    ExchangeStarted { player: PlayerSlot },
    /// Player stopped transferring resource.
    ExchangeStopped { player: PlayerSlot },
    /// Non-lethal damage landed.
    Hurt { target: Actor },
    /// Lethal damage landed.
    Death { target: Actor },
    /// Boss switched to a new phase.
    PhaseChanged { boss: BossKind, phase: BossPhase },
    /// Boss fired during a phase.
    BossAttack { boss: BossKind, phase: BossPhase },
    /// Slime took off for a jump.
    SlimeJump,
    /// Slime landed.
    SlimeLand,
    /// Intro animation begins.
    IntroAnimation { boss: BossKind },
    /// Intro "float" sound.
    IntroFloat,
    /// Intro laugh/noise sound.
    IntroNoise,
    /// Death explosion at a position.
    Explosion { position: Vec2 },
    /// Outcome text shown.
    Outcome { win: bool, final_encounter: bool },
}
