//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Top-level session state for one encounter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Boss intro script is running; nothing simulates yet.
    #[default]
    Intro,
    /// Players and boss are live.
    Playing,
    /// Someone died; the time-keyed end sequence is running.
    GameOver,
    /// Stats view toggled from the outcome screen.
    Stats,
}

/// Which of the two players a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerSlot {
    Wizard,
    Warrior,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::Wizard, PlayerSlot::Warrior];

    /// Array index for per-player tables.
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::Wizard => 0,
            PlayerSlot::Warrior => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            PlayerSlot::Wizard
        } else {
            PlayerSlot::Warrior
        }
    }

    /// The partner slot.
    pub fn other(self) -> Self {
        match self {
            PlayerSlot::Wizard => PlayerSlot::Warrior,
            PlayerSlot::Warrior => PlayerSlot::Wizard,
        }
    }
}

/// The boss roster, in encounter order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    #[default]
    ByleSlime,
    GiantCrab,
    PossessedKing,
}

impl BossKind {
    pub const ORDER: [BossKind; 3] = [
        BossKind::ByleSlime,
        BossKind::GiantCrab,
        BossKind::PossessedKing,
    ];

    /// The encounter that follows this one, or `None` after the final boss.
    pub fn next(self) -> Option<BossKind> {
        match self {
            BossKind::ByleSlime => Some(BossKind::GiantCrab),
            BossKind::GiantCrab => Some(BossKind::PossessedKing),
            BossKind::PossessedKing => None,
        }
    }

    pub fn is_final(self) -> bool {
        self.next().is_none()
    }
}

/// Boss behavior phases. Each boss uses its own subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossPhase {
    // --- Byle Slime ---
    Jump,
    SlimeBall,
    Bubble,
    BabySlime,
    // --- Giant Crab ---
    Walk,
    Claw,
    Water,
    Sand,
    // --- Possessed King ---
    Crown,
    FalseHeavy,
    CoinBurst,
}

/// Whether a phase repositions the boss or attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseRole {
    /// Exempt from the non-repeat rule.
    Movement,
    Attack,
}

/// Which side fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Fired by a player; hurts the boss.
    Friendly,
    /// Fired by the boss; hurts players.
    Hostile,
}

impl Side {
    /// Default travel direction along x.
    pub fn forward(self) -> f32 {
        match self {
            Side::Friendly => 1.0,
            Side::Hostile => -1.0,
        }
    }
}

/// Projectile pools, one per attack type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PoolKind {
    WizardLight,
    WizardHeavy,
    WarriorLight,
    WarriorHeavy,
    AimedSlimeBall,
    RandomSlimeBall,
    Bubble,
    BabySlime,
    Claw,
    Water,
    Sand,
    Crown,
    FalseWizardHeavy,
    FalseWarriorHeavy,
    Coin,
}

/// Stages of the post-death sequence, keyed from the moment of death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameOverStage {
    /// Dying entity and killing projectile are frozen on screen.
    Frozen,
    /// Explosion played, dying entity hidden, projectile back in its pool.
    Exploded,
    /// Win/lose surfaced; waiting for continue / stats / quit.
    Outcome,
}

/// Request for the excluded scene layer once a session is finished with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionExit {
    NextEncounter(BossKind),
    GameComplete,
    Menu,
}

/// A combatant reference used in cues and views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Player(PlayerSlot),
    Boss(BossKind),
}
