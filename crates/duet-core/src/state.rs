//! Encounter snapshot: the complete visible state handed to presentation layers each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::Cue;
use crate::types::{SimTime, Vec2};

/// Complete encounter state after one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterSnapshot {
    pub time: SimTime,
    pub state: SessionState,
    pub boss: BossView,
    pub players: Vec<PlayerView>,
    /// Active projectiles, plus a killing projectile frozen for the game-over sequence.
    pub projectiles: Vec<ProjectileView>,
    pub cues: Vec<Cue>,
    pub stats: StatsView,
    pub game_over: Option<GameOverView>,
    /// Set once the session asks the scene layer to move on.
    pub exit: Option<SessionExit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub kind: BossKind,
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub health_ratio: f32,
    pub dead: bool,
    pub phase: BossPhase,
    pub desperation: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub slot: PlayerSlot,
    pub active: bool,
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
    pub resource: f32,
    pub resource_ratio: f32,
    pub exchanging: bool,
    pub moving: bool,
    /// Inside the hurt-immunity window (drives the damage flash).
    pub hurt: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub pool: PoolKind,
    pub side: Side,
    pub position: Vec2,
    /// Held in place as the killing blow.
    pub frozen: bool,
}

/// End-of-encounter statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsView {
    /// Damage dealt to the boss, indexed by [`PlayerSlot::index`].
    pub damage_dealt: [f32; 2],
    /// Total resource received through exchanges.
    pub exchanged: f32,
    pub start_time: f32,
    pub end_time: Option<f32>,
    /// `end_time - start_time`, or time so far while playing.
    pub elapsed_secs: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOverView {
    pub stage: GameOverStage,
    pub win: bool,
    pub final_encounter: bool,
    pub dying: Actor,
    /// Seconds since the lethal hit.
    pub elapsed_secs: f32,
}
