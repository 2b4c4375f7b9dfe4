//! Application state shared between the control surface and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use duet_core::commands::{PlayerInput, SessionCommand};
use duet_core::enums::PlayerSlot;
use duet_core::state::EncounterSnapshot;

/// Commands sent from the control surface to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// Replace the held input for one player. Held until the next Input.
    Input(PlayerSlot, PlayerInput),
    /// A session command to forward to the encounter engine.
    Session(SessionCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Shared application state.
///
/// - `mpsc::Sender` is wrapped in `Mutex` (Sender is Send but not Sync)
/// - `Mutex<Option<...>>` holds the sender, which does not exist before start
/// - `Arc<Mutex<...>>` holds the latest snapshot, shared with the loop thread
pub struct AppState {
    /// Channel sender to forward commands to the game loop thread.
    /// `None` before the simulation is started.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Latest snapshot for synchronous polling.
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<EncounterSnapshot>>>,
    /// Whether the game loop is currently running.
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
