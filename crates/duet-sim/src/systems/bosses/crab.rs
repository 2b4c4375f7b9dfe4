//! Giant Crab phase bodies: sine-bob walking, claws, water and the
//! climbing sand attack.

use std::f32::consts::PI;

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
    if tick.changed {
        if let BossBody::Crab { sand_started, .. } = &mut state.body {
            *sand_started = false;
        }
    }
    if !tick.active {
        return;
    }
    let muzzle = *position + CRAB_MUZZLE_OFFSET;

    match tick.phase {
        BossPhase::Walk => walk(state, position, ctx),
        BossPhase::Claw => {
            if attack_ready(state, ctx) {
                let (_, aim) = ctx.aim(rng);
                shots.push(ShotRequest::single(PoolKind::Claw, muzzle, Some(aim)));
                fired(state, ctx, cues, BossPhase::Claw, CRAB_CLAW_INTERVAL);
            }
        }
        BossPhase::Water => {
            if let BossBody::Crab { move_timer, .. } = &mut state.body {
                *move_timer += ctx.dt * CRAB_MOVE_SPEED * CRAB_WATER_BOB;
            }
            walk(state, position, ctx);
            if attack_ready(state, ctx) {
                let spawn = Vec2::new(muzzle.x, rng.gen_range(CRAB_WATER_MIN_Y..=CRAB_WATER_MAX_Y));
                shots.push(ShotRequest::single(PoolKind::Water, spawn, None));
                fired(state, ctx, cues, BossPhase::Water, CRAB_WATER_INTERVAL);
            }
        }
        BossPhase::Sand => sand(state, position, ctx, rng, shots, cues),
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
        boss: BossKind::GiantCrab,
        phase,
    });
}

fn walk(state: &mut BossState, position: &mut Vec2, ctx: &BossContext) {
    if let BossBody::Crab { move_timer, .. } = &mut state.body {
        *move_timer += ctx.dt * CRAB_MOVE_SPEED * ctx.desperation;
        position.y = move_timer.sin() * CRAB_WALK_AMPLITUDE - CRAB_WALK_AMPLITUDE;
    }
}

/// Climb to the top with the phase clock held, then sink across the
/// phase firing sand bursts.
fn sand<R: Rng + ?Sized>(
    state: &mut BossState,
    position: &mut Vec2,
    ctx: &BossContext,
    rng: &mut R,
    shots: &mut Vec<ShotRequest>,
    cues: &mut Vec<Cue>,
) {
    let started = matches!(state.body, BossBody::Crab { sand_started: true, .. });
    if position.y <= CRAB_SAND_TOP_Y && !started {
        walk(state, position, ctx);
        state.scheduler.hold();
        return;
    }

    if let BossBody::Crab {
        move_timer,
        sand_started,
    } = &mut state.body
    {
        *sand_started = true;
        // Walking resumes from the bottom of the bob.
        *move_timer = 1.5 * PI;
    }
    position.y = lerp(0.0, CRAB_SAND_BOTTOM_Y, state.scheduler.timer());

    if !attack_ready(state, ctx) {
        return;
    }
    let muzzle = *position + CRAB_MUZZLE_OFFSET;
    if ctx.health_ratio <= FOCUS_FIRE_RATIO {
        shots.push(ShotRequest {
            pool: PoolKind::Sand,
            count: CRAB_SAND_BURST - 1,
            position: muzzle,
            aim_at: None,
        });
        let (_, aim) = ctx.aim(rng);
        shots.push(ShotRequest::single(PoolKind::Claw, muzzle, Some(aim)));
    } else {
        shots.push(ShotRequest {
            pool: PoolKind::Sand,
            count: CRAB_SAND_BURST,
            position: muzzle,
            aim_at: None,
        });
    }
    fired(state, ctx, cues, BossPhase::Sand, CRAB_SAND_INTERVAL);
}
