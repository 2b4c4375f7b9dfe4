//! Control surface for the game loop thread.
//!
//! Bridges a driver (CLI, autopilot, frontend) to the loop thread via channels.

use std::thread::JoinHandle;

use thiserror::Error;

use duet_core::commands::{PlayerInput, SessionCommand};
use duet_core::enums::PlayerSlot;
use duet_core::state::EncounterSnapshot;
use duet_sim::engine::SimConfig;

use crate::game_loop::{self, SnapshotSink};
use crate::state::{AppState, GameLoopCommand};

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("simulation already running")]
    AlreadyRunning,
    #[error("simulation not started")]
    NotStarted,
    #[error("game loop is gone")]
    Disconnected,
    #[error("shared state lock poisoned")]
    Poisoned,
    #[error("failed to spawn game loop: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Start the simulation. Spawns the game loop thread if not already running.
pub fn start_simulation(
    state: &AppState,
    config: SimConfig,
    sink: SnapshotSink,
) -> Result<JoinHandle<()>, ControlError> {
    let mut running = state.running.lock().map_err(|_| ControlError::Poisoned)?;
    if *running {
        return Err(ControlError::AlreadyRunning);
    }

    let (cmd_tx, handle) =
        game_loop::spawn_game_loop(config, state.latest_snapshot.clone(), sink)?;

    let mut tx_lock = state.command_tx.lock().map_err(|_| ControlError::Poisoned)?;
    *tx_lock = Some(cmd_tx);
    *running = true;

    Ok(handle)
}

fn send(state: &AppState, command: GameLoopCommand) -> Result<(), ControlError> {
    let tx_lock = state.command_tx.lock().map_err(|_| ControlError::Poisoned)?;
    match tx_lock.as_ref() {
        Some(tx) => tx.send(command).map_err(|_| ControlError::Disconnected),
        None => Err(ControlError::NotStarted),
    }
}

/// Send a session command to the simulation.
pub fn send_command(state: &AppState, command: SessionCommand) -> Result<(), ControlError> {
    send(state, GameLoopCommand::Session(command))
}

/// Replace one player's held input.
pub fn send_input(
    state: &AppState,
    slot: PlayerSlot,
    input: PlayerInput,
) -> Result<(), ControlError> {
    send(state, GameLoopCommand::Input(slot, input))
}

/// Ask the loop to stop and forget the sender.
pub fn stop_simulation(state: &AppState) -> Result<(), ControlError> {
    // A loop that already ended on its own is fine.
    let _ = send(state, GameLoopCommand::Shutdown);
    let mut tx_lock = state.command_tx.lock().map_err(|_| ControlError::Poisoned)?;
    *tx_lock = None;
    let mut running = state.running.lock().map_err(|_| ControlError::Poisoned)?;
    *running = false;
    Ok(())
}

/// Get the latest snapshot synchronously (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<EncounterSnapshot>, ControlError> {
    let lock = state
        .latest_snapshot
        .lock()
        .map_err(|_| ControlError::Poisoned)?;
    Ok(lock.clone())
}
