//! Possessed King phase bodies: a constant orbit plus crown boomerangs,
//! false heavies and coin bursts.

use rand::Rng;

use duet_boss_ai::fsm::PhaseTick;
use duet_core::constants::*;
use duet_core::enums::{BossKind, BossPhase, PlayerSlot, PoolKind};
use duet_core::events::Cue;
use duet_core::types::{lerp, Vec2};

use super::{attack_ready, rearm, BossContext, ShotRequest};
use crate::boss::{BossBody, BossState};

pub fn run<R: Rng + ?Sized>(
    state: &mut BossState,
    position: &mut Vec2,
    tick: &PhaseTick,
    ctx: &BossContext,
    rng: &mut R,
    shots: &mut Vec<ShotRequest>,
    cues: &mut Vec<Cue>,
) {
    orbit(state, position, ctx);
    if !tick.active || !attack_ready(state, ctx) {
        return;
    }

    let (phase, interval) = match tick.phase {
        BossPhase::Crown => {
            shots.push(ShotRequest::single(PoolKind::Crown, *position, None));
            (BossPhase::Crown, KING_CROWN_INTERVAL)
        }
        BossPhase::FalseHeavy => {
            // A copy of the target's own heavy attack.
            let (slot, aim) = ctx.aim(rng);
            let pool = match slot {
                PlayerSlot::Wizard => PoolKind::FalseWizardHeavy,
                PlayerSlot::Warrior => PoolKind::FalseWarriorHeavy,
            };
            shots.push(ShotRequest::single(pool, *position, Some(aim)));
            (BossPhase::FalseHeavy, KING_FALSE_INTERVAL)
        }
        BossPhase::CoinBurst => {
            shots.push(ShotRequest {
                pool: PoolKind::Coin,
                count: KING_COIN_BURST,
                position: *position,
                aim_at: None,
            });
            (BossPhase::CoinBurst, KING_COIN_INTERVAL)
        }
        _ => return,
    };

    rearm(state, ctx, interval);
    cues.push(Cue::BossAttack {
        boss: BossKind::PossessedKing,
        phase,
    });
}

/// Ellipse over the right edge of the arena, faster when desperate.
fn orbit(state: &mut BossState, position: &mut Vec2, ctx: &BossContext) {
    if let BossBody::King { orbit_timer } = &mut state.body {
        *orbit_timer += ctx.dt * ctx.desperation * KING_MOVE_SPEED;
        *position = Vec2::new(
            lerp(KING_ORBIT_MIN.x, KING_ORBIT_MAX.x, (orbit_timer.cos() + 1.0) * 0.5),
            lerp(KING_ORBIT_MIN.y, KING_ORBIT_MAX.y, (orbit_timer.sin() + 1.0) * 0.5),
        );
    }
}
