//! Scripted stand-in for two human players.
//!
//! Reads the latest snapshot and produces held inputs plus the occasional
//! session command. Used by the CLI for unattended runs and soak tests.

use glam::Vec2;

use duet_core::commands::{PlayerInput, SessionCommand};
use duet_core::enums::{GameOverStage, PlayerSlot, SessionState, Side};
use duet_core::state::{EncounterSnapshot, PlayerView};

/// Hostile projectiles closer than this are dodged.
const DODGE_RADIUS: f32 = 1.5;

/// Vertical slack before the player bothers lining up with the boss.
const ALIGN_SLACK: f32 = 0.3;

const HEAVY_ABOVE: f32 = 0.6;
const LIGHT_ABOVE: f32 = 0.15;

/// Give resource away when the partner is below this and we are above `SHARE_ABOVE`.
const STARVED_BELOW: f32 = 0.2;
const SHARE_ABOVE: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Retries allowed before giving up with Quit.
    pub max_retries: u32,
    retries: u32,
    /// Outcome already answered; cleared when the session leaves it.
    answered: bool,
}

impl Autopilot {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            retries: 0,
            answered: false,
        }
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Held inputs for both players.
    pub fn inputs(&self, snapshot: &EncounterSnapshot) -> [PlayerInput; 2] {
        if snapshot.state != SessionState::Playing {
            return [PlayerInput::idle(); 2];
        }
        PlayerSlot::ALL.map(|slot| {
            let (Some(me), Some(partner)) = (
                snapshot.players.get(slot.index()),
                snapshot.players.get(slot.other().index()),
            ) else {
                return PlayerInput::idle();
            };
            steer(snapshot, me, partner)
        })
    }

    /// Answer the outcome screen once per game over.
    pub fn session_command(&mut self, snapshot: &EncounterSnapshot) -> Option<SessionCommand> {
        let outcome = snapshot
            .game_over
            .as_ref()
            .filter(|g| g.stage == GameOverStage::Outcome);
        let Some(game_over) = outcome else {
            self.answered = false;
            return None;
        };
        if self.answered {
            return None;
        }
        self.answered = true;

        if game_over.win {
            return Some(SessionCommand::Continue);
        }
        if self.retries >= self.max_retries {
            return Some(SessionCommand::Quit);
        }
        self.retries += 1;
        Some(SessionCommand::Continue)
    }
}

fn steer(snapshot: &EncounterSnapshot, me: &PlayerView, partner: &PlayerView) -> PlayerInput {
    if !me.active || me.dead {
        return PlayerInput::idle();
    }

    let threat = snapshot
        .projectiles
        .iter()
        .filter(|p| p.side == Side::Hostile && !p.frozen)
        .map(|p| p.position)
        .filter(|at| at.distance(me.position) < DODGE_RADIUS)
        .min_by(|a, b| a.distance(me.position).total_cmp(&b.distance(me.position)));

    let dy = match threat {
        Some(at) if at.y >= me.position.y => -1.0,
        Some(_) => 1.0,
        None => {
            let gap = snapshot.boss.position.y - me.position.y;
            if gap.abs() > ALIGN_SLACK {
                gap.signum()
            } else {
                0.0
            }
        }
    };

    let exchange = partner.active
        && !partner.dead
        && partner.resource_ratio < STARVED_BELOW
        && me.resource_ratio > SHARE_ABOVE;

    PlayerInput {
        movement: Vec2::new(0.0, dy),
        heavy: !exchange && me.resource_ratio > HEAVY_ABOVE,
        light: !exchange && me.resource_ratio > LIGHT_ABOVE,
        exchange,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duet_sim::engine::{EncounterEngine, SimConfig};

    fn snapshot() -> EncounterSnapshot {
        let mut engine = EncounterEngine::new(SimConfig::default());
        engine.tick([PlayerInput::idle(); 2])
    }

    #[test]
    fn test_attacks_while_playing() {
        let snap = snapshot();
        let inputs = Autopilot::new(0).inputs(&snap);
        assert!(inputs.iter().all(|i| i.light && i.heavy && !i.exchange));
    }

    #[test]
    fn test_shares_with_starved_partner() {
        let mut snap = snapshot();
        snap.players[PlayerSlot::Warrior.index()].resource_ratio = 0.05;
        let inputs = Autopilot::new(0).inputs(&snap);
        assert!(inputs[PlayerSlot::Wizard.index()].exchange);
        assert!(!inputs[PlayerSlot::Wizard.index()].light);
        assert!(!inputs[PlayerSlot::Warrior.index()].exchange);
    }

    #[test]
    fn test_idle_outside_playing() {
        let mut snap = snapshot();
        snap.state = SessionState::Stats;
        let inputs = Autopilot::new(0).inputs(&snap);
        assert_eq!(inputs, [PlayerInput::idle(); 2]);
    }

    #[test]
    fn test_answers_outcome_once_then_quits() {
        let mut snap = snapshot();
        snap.game_over = Some(duet_core::state::GameOverView {
            stage: GameOverStage::Outcome,
            win: false,
            final_encounter: false,
            dying: duet_core::enums::Actor::Player(PlayerSlot::Wizard),
            elapsed_secs: 4.0,
        });
        let mut pilot = Autopilot::new(1);
        assert_eq!(pilot.session_command(&snap), Some(SessionCommand::Continue));
        assert_eq!(pilot.session_command(&snap), None);
        assert_eq!(pilot.retries(), 1);

        let cleared = snapshot();
        assert_eq!(pilot.session_command(&cleared), None);
        assert_eq!(pilot.session_command(&snap), Some(SessionCommand::Quit));
    }
}
