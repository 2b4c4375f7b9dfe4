//! Encounter engine, the core of the game.
//!
//! `EncounterEngine` owns the hecs ECS world, processes session commands,
//! runs all systems, and produces `EncounterSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use duet_boss_ai::intro::IntroPlayer;
use duet_core::commands::{PlayerInput, SessionCommand};
use duet_core::config::Tuning;
use duet_core::constants::{DT, GAME_OVER_EXPLODE_DELAY};
use duet_core::enums::{BossKind, PlayerSlot, SessionExit, SessionState};
use duet_core::events::Cue;
use duet_core::state::EncounterSnapshot;
use duet_core::types::{FrameClock, SimTime};

use crate::pool::Pools;
use crate::session::Session;
use crate::systems;
use crate::world_setup::{self, EncounterEntities};

/// Configuration for starting a new run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// First encounter to load.
    pub boss: BossKind,
    /// Only this player is active. `None` is co-op.
    pub solo: Option<PlayerSlot>,
    pub tuning: Tuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            boss: BossKind::ByleSlime,
            solo: None,
            tuning: Tuning::default(),
        }
    }
}

/// The encounter engine. Owns the ECS world and all session state.
pub struct EncounterEngine {
    world: World,
    time: SimTime,
    solo: Option<PlayerSlot>,
    tuning: Tuning,
    boss_kind: BossKind,
    rng: ChaCha8Rng,
    session: Session,
    intro: IntroPlayer,
    entities: EncounterEntities,
    command_queue: VecDeque<SessionCommand>,
    cues: Vec<Cue>,
    /// Exit raised this tick, reported in the next snapshot only.
    pending_exit: Option<SessionExit>,
    /// Terminal exit; once set the run accepts no more commands.
    finished: Option<SessionExit>,
}

impl EncounterEngine {
    /// Create a new engine and load the configured encounter.
    ///
    /// Tuning that fails validation is replaced by the defaults, so no
    /// encounter starts with a zero-health entity.
    pub fn new(mut config: SimConfig) -> Self {
        if let Err(e) = config.tuning.validate() {
            warn!("invalid tuning ({e}), using defaults");
            config.tuning = Tuning::default();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = World::new();
        let entities = world_setup::setup_encounter(
            &mut world,
            config.boss,
            config.solo,
            &config.tuning,
            &mut rng,
        );
        info!(
            "encounter loaded: {:?} (seed {}, solo {:?})",
            config.boss, config.seed, config.solo
        );

        Self {
            world,
            time: SimTime::default(),
            solo: config.solo,
            tuning: config.tuning,
            boss_kind: config.boss,
            rng,
            session: Session::new(),
            intro: IntroPlayer::new(config.boss),
            entities,
            command_queue: VecDeque::new(),
            cues: vec![Cue::EncounterLoaded { boss: config.boss }],
            pending_exit: None,
            finished: None,
        }
    }

    /// Queue a session command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SessionCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance by one fixed tick and return the resulting snapshot.
    pub fn tick(&mut self, inputs: [PlayerInput; 2]) -> EncounterSnapshot {
        self.time.advance(DT);
        self.step(&inputs)
    }

    /// Advance to an external clock reading.
    pub fn tick_at(&mut self, clock: FrameClock, inputs: [PlayerInput; 2]) -> EncounterSnapshot {
        self.time.advance_to(clock);
        self.step(&inputs)
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn boss_kind(&self) -> BossKind {
        self.boss_kind
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn pools(&self) -> &Pools {
        &self.entities.pools
    }

    pub fn player_entity(&self, slot: PlayerSlot) -> Entity {
        self.entities.players[slot.index()]
    }

    pub fn boss_entity(&self) -> Entity {
        self.entities.boss
    }

    /// The terminal exit, once the run has ended.
    pub fn exit(&self) -> Option<SessionExit> {
        self.finished
    }

    /// Fire one projectile from `kind`'s pool, bypassing attack rules.
    #[cfg(test)]
    pub fn fire_test_projectile(
        &mut self,
        kind: duet_core::enums::PoolKind,
        shooter: Entity,
        at: duet_core::types::Vec2,
    ) -> Option<Entity> {
        let shot = crate::projectile::Shot {
            shooter: Some(shooter),
            position: at,
            aim_at: None,
        };
        self.entities
            .pools
            .fire(&mut self.world, kind, shot, self.time.now, &mut self.rng)
    }

    fn step(&mut self, inputs: &[PlayerInput; 2]) -> EncounterSnapshot {
        self.process_commands();

        match self.session.state {
            SessionState::Intro => systems::intro::run(
                &mut self.intro,
                self.boss_kind,
                &mut self.session,
                &self.time,
                &mut self.cues,
            ),
            SessionState::GameOver | SessionState::Stats => systems::game_over::run(
                &mut self.world,
                &mut self.session,
                &self.time,
                self.boss_kind.is_final(),
                &mut self.cues,
            ),
            SessionState::Playing => {}
        }

        if self.session.state == SessionState::Playing {
            self.run_systems(inputs);
        }

        let cues = std::mem::take(&mut self.cues);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.boss_kind,
            &self.session,
            cues,
            self.pending_exit.take(),
        )
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single session command.
    fn handle_command(&mut self, command: SessionCommand) {
        if let Some(exit) = self.finished {
            warn!("{command:?} ignored, run already ended with {exit:?}");
            return;
        }
        match command {
            SessionCommand::Continue => {
                let Some(win) = self
                    .session
                    .game_over
                    .as_ref()
                    .filter(|_| self.session.awaiting_choice())
                    .map(|sequence| sequence.win)
                else {
                    warn!("continue ignored in {:?}", self.session.state);
                    return;
                };
                if win {
                    self.advance_encounter();
                } else {
                    self.retry();
                }
            }
            SessionCommand::ToggleStats => {
                self.session.toggle_stats();
            }
            SessionCommand::Quit => {
                if self.session.awaiting_choice() {
                    info!("quit to menu");
                    self.end_run(SessionExit::Menu);
                } else {
                    warn!("quit ignored in {:?}", self.session.state);
                }
            }
            SessionCommand::Skip => match self.session.state {
                SessionState::Intro => self.intro.finish(),
                SessionState::GameOver => {
                    if !self.session.skip(self.time.now, GAME_OVER_EXPLODE_DELAY) {
                        warn!("skip ignored at {:?}", self.session.stage());
                    }
                }
                state => warn!("skip ignored in {state:?}"),
            },
        }
    }

    /// Same boss, full health, fresh stats.
    fn retry(&mut self) {
        systems::game_over::reset_encounter(
            &mut self.world,
            self.entities.players,
            self.entities.boss,
            &self.entities.pools,
            &mut self.rng,
        );
        self.session.retry(self.time.now);
        self.cues.push(Cue::FightStarted {
            boss: self.boss_kind,
        });
    }

    /// Load the next boss after a win, or finish the run.
    fn advance_encounter(&mut self) {
        let Some(next) = self.boss_kind.next() else {
            info!("final encounter cleared");
            self.end_run(SessionExit::GameComplete);
            return;
        };

        self.world = World::new();
        self.entities = world_setup::setup_encounter(
            &mut self.world,
            next,
            self.solo,
            &self.tuning,
            &mut self.rng,
        );
        self.boss_kind = next;
        self.session = Session::new();
        self.intro = IntroPlayer::new(next);
        self.cues.push(Cue::EncounterLoaded { boss: next });
        self.pending_exit = Some(SessionExit::NextEncounter(next));
        info!("encounter loaded: {next:?}");
    }

    fn end_run(&mut self, exit: SessionExit) {
        self.finished = Some(exit);
        self.pending_exit = Some(exit);
    }

    /// Run all gameplay systems in order.
    fn run_systems(&mut self, inputs: &[PlayerInput; 2]) {
        // 1. Players: movement, exchange, attacks
        systems::player::run(
            &mut self.world,
            self.entities.players,
            inputs,
            &self.entities.pools,
            &mut self.session,
            &self.time,
            &mut self.rng,
            &mut self.cues,
        );
        // 2. Boss: phase scheduler and phase bodies
        systems::bosses::run(
            &mut self.world,
            self.entities.boss,
            self.entities.players,
            &self.entities.pools,
            &self.time,
            &mut self.rng,
            &mut self.cues,
        );
        // 3. Projectile motion and lifetime
        systems::projectiles::run(&mut self.world, &self.time);
        // 4. Collision, damage and the game-over hand-off
        systems::collision::run(&mut self.world, &mut self.session, &self.time, &mut self.cues);
    }
}
