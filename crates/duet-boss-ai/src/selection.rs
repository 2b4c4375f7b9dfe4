//! Phase selection rules.
//!
//! Each boss configures its own rule. All of them share the same attack
//! draw: uniform over the boss's attack phases, rejecting the previous
//! attack so no attack plays twice in a row.

use rand::Rng;

use duet_core::enums::BossPhase;

/// Redraws before falling back to the first eligible attack.
const MAX_REDRAWS: usize = 16;

/// How a boss picks its next phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionRule {
    /// Every phase is an attack; never the same one twice in a row.
    NonRepeating,
    /// Movement and attack strictly alternate.
    AlternateMovement { movement: BossPhase },
    /// Movement is forced after `after` attacks without one, and otherwise
    /// taken with probability `chance`. Movement may chain.
    ForcedReposition {
        movement: BossPhase,
        after: u32,
        chance: f64,
    },
}

/// What selection needs to remember between draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionState {
    pub current: BossPhase,
    pub last_attack: Option<BossPhase>,
    pub attacks_since_movement: u32,
}

/// Uniform draw over `attacks` that never returns `last`.
///
/// Rejection sampling bounded by [`MAX_REDRAWS`]; with at most a handful of
/// phases the fallback is practically never taken. A table with a single
/// attack has to repeat it.
pub fn draw_attack<R: Rng + ?Sized>(
    attacks: &[BossPhase],
    last: Option<BossPhase>,
    rng: &mut R,
) -> Option<BossPhase> {
    if attacks.is_empty() {
        return None;
    }
    if attacks.len() == 1 {
        return Some(attacks[0]);
    }
    for _ in 0..MAX_REDRAWS {
        let candidate = attacks[rng.gen_range(0..attacks.len())];
        if Some(candidate) != last {
            return Some(candidate);
        }
    }
    attacks.iter().copied().find(|&phase| Some(phase) != last)
}

/// Choose the phase after `state.current` and update `state` to match.
///
/// Returns `None` only for a table with no attack phases, in which case the
/// state is left untouched.
pub fn select_next<R: Rng + ?Sized>(
    rule: &SelectionRule,
    attacks: &[BossPhase],
    state: &mut SelectionState,
    rng: &mut R,
) -> Option<BossPhase> {
    let next = match *rule {
        SelectionRule::NonRepeating => {
            let attack = draw_attack(attacks, state.last_attack, rng)?;
            state.last_attack = Some(attack);
            attack
        }
        SelectionRule::AlternateMovement { movement } => {
            if state.current != movement {
                movement
            } else {
                let attack = draw_attack(attacks, state.last_attack, rng)?;
                state.last_attack = Some(attack);
                attack
            }
        }
        SelectionRule::ForcedReposition {
            movement,
            after,
            chance,
        } => {
            if state.attacks_since_movement >= after || rng.gen_bool(chance) {
                state.attacks_since_movement = 0;
                movement
            } else {
                let attack = draw_attack(attacks, state.last_attack, rng)?;
                state.last_attack = Some(attack);
                state.attacks_since_movement += 1;
                attack
            }
        }
    };
    state.current = next;
    Some(next)
}
