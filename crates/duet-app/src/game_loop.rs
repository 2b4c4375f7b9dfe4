//! Game loop thread: runs the encounter engine at 60Hz and publishes snapshots.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Commands arrive via `mpsc` channel. Snapshots go to the caller's sink
//! and are stored in shared state for synchronous polling.

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, info};

use duet_core::commands::PlayerInput;
use duet_core::constants::TICK_RATE;
use duet_core::enums::SessionExit;
use duet_core::state::EncounterSnapshot;
use duet_sim::engine::{EncounterEngine, SimConfig};

use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Receives every snapshot the loop produces.
pub type SnapshotSink = Box<dyn FnMut(&EncounterSnapshot) + Send>;

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the control surface and the thread handle.
pub fn spawn_game_loop(
    config: SimConfig,
    latest_snapshot: Arc<Mutex<Option<EncounterSnapshot>>>,
    sink: SnapshotSink,
) -> io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("duet-game-loop".into())
        .spawn(move || {
            run_game_loop(config, cmd_rx, &latest_snapshot, sink);
        })?;

    Ok((cmd_tx, handle))
}

/// Drain pending commands into the engine. Returns `false` on shutdown.
fn drain_commands(
    engine: &mut EncounterEngine,
    inputs: &mut [PlayerInput; 2],
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(GameLoopCommand::Input(slot, input)) => {
                inputs[slot.index()] = input;
            }
            Ok(GameLoopCommand::Session(command)) => {
                engine.queue_command(command);
            }
            Ok(GameLoopCommand::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

/// The game loop. Runs until Shutdown, channel disconnect, or the run ends.
fn run_game_loop(
    config: SimConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<EncounterSnapshot>>,
    mut sink: SnapshotSink,
) {
    let mut engine = EncounterEngine::new(config);
    let mut inputs = [PlayerInput::idle(); 2];
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Drain all pending commands
        if !drain_commands(&mut engine, &mut inputs, &cmd_rx) {
            info!("game loop shut down at tick {}", engine.time().tick);
            return;
        }

        // 2. Advance one tick
        let snapshot = engine.tick(inputs);

        // 3. Hand the snapshot to the sink
        sink(&snapshot);

        // 4. Store latest snapshot for synchronous polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot);
        }

        if let Some(exit @ (SessionExit::GameComplete | SessionExit::Menu)) = engine.exit() {
            info!("run ended with {exit:?}");
            return;
        }

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            debug!("game loop fell behind, resetting tick clock");
            next_tick_time = now;
        }
    }
}
