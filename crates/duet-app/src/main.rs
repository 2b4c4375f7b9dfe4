//! Command-line host: runs the encounters headless or on the 60Hz loop
//! thread, driven by the autopilot, and prints the final stats as JSON.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{error, info};
use serde::Serialize;
use thiserror::Error;

use duet_app::autopilot::Autopilot;
use duet_app::control::{self, ControlError};
use duet_app::state::AppState;
use duet_core::commands::PlayerInput;
use duet_core::config::{ConfigError, Tuning};
use duet_core::constants::TICK_RATE;
use duet_core::enums::{BossKind, PlayerSlot, SessionExit, SessionState};
use duet_core::state::{EncounterSnapshot, StatsView};
use duet_sim::engine::{EncounterEngine, SimConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BossArg {
    Slime,
    Crab,
    King,
}

impl From<BossArg> for BossKind {
    fn from(arg: BossArg) -> Self {
        match arg {
            BossArg::Slime => BossKind::ByleSlime,
            BossArg::Crab => BossKind::GiantCrab,
            BossArg::King => BossKind::PossessedKing,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SoloArg {
    Wizard,
    Warrior,
}

impl From<SoloArg> for PlayerSlot {
    fn from(arg: SoloArg) -> Self {
        match arg {
            SoloArg::Wizard => PlayerSlot::Wizard,
            SoloArg::Warrior => PlayerSlot::Warrior,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "duet")]
#[command(about = "Run the duet boss encounters under the autopilot")]
#[command(version)]
struct Args {
    /// First boss to fight
    #[arg(short, long, value_enum, default_value_t = BossArg::Slime)]
    boss: BossArg,

    /// RNG seed
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Play with one character only
    #[arg(long, value_enum)]
    solo: Option<SoloArg>,

    /// Simulated seconds before giving up
    #[arg(long, default_value_t = 300.0)]
    seconds: f32,

    /// JSON file overriding tuning values
    #[arg(short, long)]
    tuning: Option<PathBuf>,

    /// Retries the autopilot takes before quitting
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Run on the 60Hz loop thread instead of as fast as possible
    #[arg(long)]
    realtime: bool,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] io::Error),
    #[error("bad tuning: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Control(#[from] ControlError),
    #[error("game loop thread panicked")]
    LoopPanicked,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    last_boss: BossKind,
    state: SessionState,
    exit: Option<SessionExit>,
    ticks: u64,
    sim_seconds: f32,
    retries: u32,
    stats: StatsView,
}

impl RunSummary {
    fn new(snapshot: &EncounterSnapshot, exit: Option<SessionExit>, retries: u32) -> Self {
        Self {
            last_boss: snapshot.boss.kind,
            state: snapshot.state,
            exit,
            ticks: snapshot.time.tick,
            sim_seconds: snapshot.time.now,
            retries,
            stats: snapshot.stats.clone(),
        }
    }
}

fn load_tuning(path: Option<&Path>) -> Result<Tuning, AppError> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)?;
    Ok(Tuning::from_json(&json)?)
}

/// Tick the engine directly on this thread.
fn run_headless(config: SimConfig, args: &Args) -> Option<RunSummary> {
    let mut engine = EncounterEngine::new(config);
    let mut pilot = Autopilot::new(args.retries);
    let max_ticks = (args.seconds.max(0.0) * TICK_RATE as f32) as u64;
    let mut inputs = [PlayerInput::idle(); 2];
    let mut last = None;
    let mut exit = None;

    for _ in 0..max_ticks {
        let snapshot = engine.tick(inputs);
        if let Some(command) = pilot.session_command(&snapshot) {
            engine.queue_command(command);
        }
        inputs = pilot.inputs(&snapshot);
        if snapshot.exit.is_some() {
            info!("exit: {:?}", snapshot.exit);
            exit = snapshot.exit;
        }
        last = Some(snapshot);
        if engine.exit().is_some() {
            break;
        }
    }

    last.map(|snapshot| RunSummary::new(&snapshot, exit, pilot.retries()))
}

/// Drive the loop thread through the control surface, polling snapshots.
fn run_realtime(config: SimConfig, args: &Args) -> Result<Option<RunSummary>, AppError> {
    let state = AppState::new();
    let handle = control::start_simulation(&state, config, Box::new(|_| {}))?;
    let mut pilot = Autopilot::new(args.retries);
    let polls = (args.seconds.max(0.0) * TICK_RATE as f32) as u64;
    let mut exit = None;

    for _ in 0..polls {
        std::thread::sleep(Duration::from_millis(1000 / TICK_RATE as u64));
        if handle.is_finished() {
            break;
        }
        let Some(snapshot) = control::get_snapshot(&state)? else {
            continue;
        };
        if snapshot.exit.is_some() {
            exit = snapshot.exit;
        }
        // The loop stops on its own once the run ends; sends may race that.
        if let Some(command) = pilot.session_command(&snapshot) {
            let _ = control::send_command(&state, command);
        }
        for (slot, input) in PlayerSlot::ALL.into_iter().zip(pilot.inputs(&snapshot)) {
            let _ = control::send_input(&state, slot, input);
        }
    }

    control::stop_simulation(&state)?;
    if handle.join().is_err() {
        return Err(AppError::LoopPanicked);
    }
    let last = control::get_snapshot(&state)?;
    Ok(last.map(|snapshot| {
        let exit = exit.or(snapshot.exit);
        RunSummary::new(&snapshot, exit, pilot.retries())
    }))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let tuning = match load_tuning(args.tuning.as_deref()) {
        Ok(tuning) => tuning,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let config = SimConfig {
        seed: args.seed,
        boss: args.boss.into(),
        solo: args.solo.map(Into::into),
        tuning,
    };
    info!("starting run: {config:?}");

    let summary = if args.realtime {
        match run_realtime(config, &args) {
            Ok(summary) => summary,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        run_headless(config, &args)
    };

    let Some(summary) = summary else {
        error!("no ticks were simulated");
        return ExitCode::FAILURE;
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("failed to serialize summary: {e}");
            ExitCode::FAILURE
        }
    }
}
