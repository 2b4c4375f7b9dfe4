//! Session data model: top-level state, run statistics and the
//! game-over sequence bookkeeping.
//!
//! Stored in `EncounterEngine`, NOT as ECS entities.

use hecs::Entity;
use log::{info, warn};

use duet_core::enums::{Actor, GameOverStage, PlayerSlot, SessionState};

/// The killing blow and its aftermath.
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverSequence {
    pub started_at: f32,
    pub dying: Entity,
    pub dying_actor: Actor,
    /// Projectile that landed the blow; held frozen until the explosion.
    pub projectile: Option<Entity>,
    pub win: bool,
    pub stage: GameOverStage,
    /// Explode on the next tick regardless of elapsed time.
    pub skipped: bool,
}

impl GameOverSequence {
    pub fn elapsed(&self, now: f32) -> f32 {
        (now - self.started_at).max(0.0)
    }
}

/// One encounter's session state.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: SessionState,
    pub start_time: f32,
    pub end_time: Option<f32>,
    /// Health removed from the boss, per player.
    pub damage_dealt: [f32; 2],
    /// Resource received by partners through exchanges.
    pub exchanged: f32,
    pub game_over: Option<GameOverSequence>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intro → Playing. Ignored from any other state.
    pub fn begin_playing(&mut self, now: f32) -> bool {
        if self.state != SessionState::Intro {
            return false;
        }
        self.state = SessionState::Playing;
        self.start_time = now;
        self.end_time = None;
        info!("session playing at {now:.2}s");
        true
    }

    /// Playing → GameOver. A second trigger, even in the same tick, is ignored.
    pub fn enter_game_over(
        &mut self,
        now: f32,
        dying: Entity,
        dying_actor: Actor,
        projectile: Option<Entity>,
    ) -> bool {
        if self.state != SessionState::Playing || self.game_over.is_some() {
            return false;
        }
        let win = matches!(dying_actor, Actor::Boss(_));
        self.state = SessionState::GameOver;
        self.end_time = Some(now);
        self.game_over = Some(GameOverSequence {
            started_at: now,
            dying,
            dying_actor,
            projectile,
            win,
            stage: GameOverStage::Frozen,
            skipped: false,
        });
        info!("game over at {now:.2}s: {dying_actor:?} died, win={win}");
        true
    }

    pub fn stage(&self) -> Option<GameOverStage> {
        self.game_over.as_ref().map(|sequence| sequence.stage)
    }

    /// The outcome has been surfaced and the session is waiting for input.
    pub fn awaiting_choice(&self) -> bool {
        matches!(self.state, SessionState::GameOver | SessionState::Stats)
            && self.stage() == Some(GameOverStage::Outcome)
    }

    /// GameOver ⇄ Stats. View-only; nothing else changes.
    pub fn toggle_stats(&mut self) -> bool {
        if !self.awaiting_choice() {
            warn!("stats toggle ignored in {:?}", self.state);
            return false;
        }
        self.state = match self.state {
            SessionState::Stats => SessionState::GameOver,
            _ => SessionState::Stats,
        };
        true
    }

    /// Bring the explosion forward to `now`. Only valid while frozen.
    pub fn skip(&mut self, now: f32, explode_delay: f32) -> bool {
        match self.game_over.as_mut() {
            Some(sequence) if sequence.stage == GameOverStage::Frozen => {
                let remaining = explode_delay - sequence.elapsed(now);
                if remaining > 0.0 {
                    sequence.started_at -= remaining;
                }
                sequence.skipped = true;
                true
            }
            _ => false,
        }
    }

    /// Back to Playing after a loss with fresh statistics.
    pub fn retry(&mut self, now: f32) {
        *self = Session {
            state: SessionState::Playing,
            start_time: now,
            ..Session::default()
        };
        info!("session retry at {now:.2}s");
    }

    pub fn record_damage(&mut self, slot: PlayerSlot, amount: f32) {
        if amount > 0.0 {
            self.damage_dealt[slot.index()] += amount;
        }
    }

    pub fn record_exchange(&mut self, amount: f32) {
        if amount > 0.0 {
            self.exchanged += amount;
        }
    }

    /// Seconds of play so far, or of the whole fight once it ended.
    pub fn elapsed(&self, now: f32) -> f32 {
        match self.state {
            SessionState::Intro => 0.0,
            _ => (self.end_time.unwrap_or(now) - self.start_time).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Entity {
        let mut world = hecs::World::new();
        world.spawn(())
    }

    #[test]
    fn test_begin_playing_only_from_intro() {
        let mut session = Session::new();
        assert!(session.begin_playing(1.0));
        assert!(!session.begin_playing(2.0));
        assert_eq!(session.start_time, 1.0);
    }

    #[test]
    fn test_enter_game_over_is_idempotent() {
        let mut session = Session::new();
        session.begin_playing(0.0);
        let dying = entity();
        assert!(session.enter_game_over(5.0, dying, Actor::Player(PlayerSlot::Wizard), None));
        let boss = Actor::Boss(duet_core::enums::BossKind::ByleSlime);
        assert!(!session.enter_game_over(5.0, dying, boss, None));
        let sequence = session.game_over.as_ref().unwrap();
        assert!(!sequence.win);
        assert_eq!(session.end_time, Some(5.0));
    }

    #[test]
    fn test_stats_toggle_needs_outcome() {
        let mut session = Session::new();
        session.begin_playing(0.0);
        assert!(!session.toggle_stats());
        session.enter_game_over(1.0, entity(), Actor::Player(PlayerSlot::Warrior), None);
        assert!(!session.toggle_stats());
        if let Some(sequence) = session.game_over.as_mut() {
            sequence.stage = GameOverStage::Outcome;
        }
        assert!(session.toggle_stats());
        assert_eq!(session.state, SessionState::Stats);
        assert!(session.toggle_stats());
        assert_eq!(session.state, SessionState::GameOver);
    }

    #[test]
    fn test_skip_only_while_frozen() {
        let mut session = Session::new();
        assert!(!session.skip(0.0, 2.0));
        session.begin_playing(0.0);
        session.enter_game_over(1.0, entity(), Actor::Player(PlayerSlot::Wizard), None);
        assert!(session.skip(1.5, 2.0));
        let sequence = session.game_over.as_ref().unwrap();
        assert!(sequence.skipped);
        assert!((sequence.elapsed(1.5) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_retry_clears_stats() {
        let mut session = Session::new();
        session.begin_playing(0.0);
        session.record_damage(PlayerSlot::Warrior, 12.0);
        session.record_exchange(3.0);
        session.enter_game_over(9.0, entity(), Actor::Player(PlayerSlot::Wizard), None);
        session.retry(20.0);
        assert_eq!(session.state, SessionState::Playing);
        assert_eq!(session.damage_dealt, [0.0, 0.0]);
        assert_eq!(session.exchanged, 0.0);
        assert_eq!(session.start_time, 20.0);
        assert!(session.game_over.is_none());
    }

    #[test]
    fn test_elapsed_stops_at_end() {
        let mut session = Session::new();
        session.begin_playing(2.0);
        session.enter_game_over(12.0, entity(), Actor::Player(PlayerSlot::Wizard), None);
        assert_eq!(session.elapsed(100.0), 10.0);
    }
}
