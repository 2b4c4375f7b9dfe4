//! Byle Slime phase bodies: jump between three heights, slime balls,
//! bubbles and baby slimes.

use rand::Rng;

use duet_boss_ai::fsm::PhaseTick;
use duet_core::constants::*;
use duet_core::enums::{BossKind, BossPhase, PoolKind};
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
    if !tick.active {
        return;
    }
    let muzzle = *position + SLIME_MUZZLE_OFFSET;

    match tick.phase {
        BossPhase::Jump => jump(state, position, rng, cues),
        BossPhase::SlimeBall => {
            if !attack_ready(state, ctx) {
                return;
            }
            let BossBody::Slime { aimed_last, .. } = &mut state.body else {
                return;
            };
            let request = if *aimed_last {
                ShotRequest::single(PoolKind::RandomSlimeBall, muzzle, None)
            } else {
                let (_, aim) = ctx.aim(rng);
                ShotRequest::single(PoolKind::AimedSlimeBall, muzzle, Some(aim))
            };
            *aimed_last = !*aimed_last;
            shots.push(request);
            fired(state, ctx, cues, BossPhase::SlimeBall, SLIME_BALL_INTERVAL);
        }
        BossPhase::Bubble => {
            if attack_ready(state, ctx) {
                shots.push(ShotRequest::single(PoolKind::Bubble, muzzle, None));
                fired(state, ctx, cues, BossPhase::Bubble, SLIME_BUBBLE_INTERVAL);
            }
        }
        BossPhase::BabySlime => {
            if attack_ready(state, ctx) {
                let spawn = Vec2::new(
                    BABY_SLIME_SPAWN_X,
                    rng.gen_range(BABY_SLIME_MIN_Y..=BABY_SLIME_MAX_Y),
                );
                shots.push(ShotRequest::single(PoolKind::BabySlime, spawn, None));
                fired(state, ctx, cues, BossPhase::BabySlime, SLIME_BABY_INTERVAL);
            }
        }
        _ => {}
    }
}

fn fired(
    state: &mut BossState,
    ctx: &BossContext,
    cues: &mut Vec<Cue>,
    phase: BossPhase,
    interval: f32,
) {
    rearm(state, ctx, interval);
    cues.push(Cue::BossAttack {
        boss: BossKind::ByleSlime,
        phase,
    });
}

/// Take off early in the phase, glide over its first half, land at the
/// middle. Never lands where it started.
fn jump<R: Rng + ?Sized>(
    state: &mut BossState,
    position: &mut Vec2,
    rng: &mut R,
    cues: &mut Vec<Cue>,
) {
    let timer = state.scheduler.timer();
    let BossBody::Slime {
        jump_from, jump_to, ..
    } = &mut state.body
    else {
        return;
    };

    if *jump_from == *jump_to && timer < SLIME_TAKEOFF_WINDOW {
        let offset = rng.gen_range(1..SLIME_JUMP_POSITIONS);
        *jump_to = (*jump_from + offset) % SLIME_JUMP_POSITIONS;
        cues.push(Cue::SlimeJump);
    }

    position.y = lerp(
        *jump_from as f32 * SLIME_JUMP_STEP,
        *jump_to as f32 * SLIME_JUMP_STEP,
        (timer * 2.0).clamp(0.0, 1.0),
    );

    if timer >= SLIME_LAND_AT && *jump_from != *jump_to {
        *jump_from = *jump_to;
        cues.push(Cue::SlimeLand);
    }
}
