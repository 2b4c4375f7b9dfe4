//! Inputs fed to the simulation each tick.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Discrete input snapshot for one player for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Held direction. Normalized by the simulation.
    pub movement: Vec2,
    /// Light attack held.
    pub light: bool,
    /// Heavy attack held.
    pub heavy: bool,
    /// Exchange key held.
    pub exchange: bool,
}

impl PlayerInput {
    pub fn idle() -> Self {
        Self::default()
    }
}

/// Session-level actions, queued and processed at the next tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    /// On the outcome screen: retry after a loss, advance after a win.
    Continue,
    /// Flip between the outcome screen and the stats view.
    ToggleStats,
    /// Abort to the top-level menu.
    Quit,
    /// Fast-forward the frozen part of the game-over sequence.
    Skip,
}
