//! Boss system: advances the phase scheduler and runs the selected
//! phase body. Bodies queue shots; the system fires them once the boss
//! borrow is released.

pub mod crab;
pub mod king;
pub mod slime;

use hecs::{Entity, World};
use log::trace;
use rand::Rng;

use duet_boss_ai::targeting::pick_target;
use duet_core::combat::Combatant;
use duet_core::components::{PlayerState, Position};
use duet_core::enums::{BossKind, PlayerSlot, PoolKind};
use duet_core::events::Cue;
use duet_core::types::{SimTime, Vec2};

use crate::boss::BossState;
use crate::pool::Pools;
use crate::projectile::Shot;

/// What a boss knows about one player when aiming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Vec2,
    pub health: f32,
}

/// Read-only inputs shared by every phase body.
#[derive(Debug, Clone, Copy)]
pub struct BossContext {
    pub now: f32,
    pub dt: f32,
    pub desperation: f32,
    pub health_ratio: f32,
    pub targets: [Target; 2],
}

impl BossContext {
    /// Pick a target for one aimed shot.
    pub fn aim<R: Rng + ?Sized>(&self, rng: &mut R) -> (PlayerSlot, Vec2) {
        let health = self.targets.map(|target| target.health);
        let slot = pick_target(self.health_ratio, health, rng);
        (slot, self.targets[slot.index()].position)
    }
}

/// A shot (or burst) a phase body wants fired this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    pub pool: PoolKind,
    pub count: usize,
    pub position: Vec2,
    pub aim_at: Option<Vec2>,
}

impl ShotRequest {
    pub fn single(pool: PoolKind, position: Vec2, aim_at: Option<Vec2>) -> Self {
        Self {
            pool,
            count: 1,
            position,
            aim_at,
        }
    }
}

/// Per-attack cooldown check shared by the phase bodies.
pub fn attack_ready(state: &BossState, ctx: &BossContext) -> bool {
    ctx.now >= state.next_attack_at
}

/// Restart the per-attack cooldown; higher desperation shortens it.
pub fn rearm(state: &mut BossState, ctx: &BossContext, interval: f32) {
    state.next_attack_at = ctx.now + interval / ctx.desperation;
}

fn read_targets(world: &World, players: [Entity; 2]) -> [Target; 2] {
    players.map(|entity| {
        let state = world.get::<&PlayerState>(entity).ok();
        let position = world.get::<&Position>(entity).ok();
        match (state, position) {
            (Some(state), Some(position)) => Target {
                position: position.0,
                health: state.vitals.health,
            },
            _ => Target {
                position: Vec2::ZERO,
                health: 0.0,
            },
        }
    })
}

/// Run the boss system for one tick.
pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    boss: Entity,
    players: [Entity; 2],
    pools: &Pools,
    time: &SimTime,
    rng: &mut R,
    cues: &mut Vec<Cue>,
) {
    let targets = read_targets(world, players);
    let mut shots: Vec<ShotRequest> = Vec::new();

    {
        let Ok((state, position)) = world.query_one_mut::<(&mut BossState, &mut Position)>(boss)
        else {
            return;
        };
        // Death freezes phase timers and motion.
        if state.is_dead() {
            return;
        }
        let kind = state.kind;

        let health_ratio = state.health_ratio();
        let tick = state.scheduler.advance(time.dt, health_ratio, rng);
        if tick.changed {
            // A new draw discards the previous phase's attack cooldown.
            state.next_attack_at = time.now;
            cues.push(Cue::PhaseChanged {
                boss: kind,
                phase: tick.phase,
            });
        }

        let ctx = BossContext {
            now: time.now,
            dt: time.dt,
            desperation: tick.desperation,
            health_ratio,
            targets,
        };

        match kind {
            BossKind::ByleSlime => {
                slime::run(state, &mut position.0, &tick, &ctx, rng, &mut shots, cues)
            }
            BossKind::GiantCrab => {
                crab::run(state, &mut position.0, &tick, &ctx, rng, &mut shots, cues)
            }
            BossKind::PossessedKing => {
                king::run(state, &mut position.0, &tick, &ctx, rng, &mut shots, cues)
            }
        }
        trace!("{kind:?} phase {:?} timer {:.3}", tick.phase, state.scheduler.timer());
    }

    for request in shots {
        let shot = Shot {
            shooter: Some(boss),
            position: request.position,
            aim_at: request.aim_at,
        };
        if request.count == 1 {
            pools.fire(world, request.pool, shot, time.now, rng);
        } else {
            pools.fire_burst(world, request.pool, request.count, shot, time.now, rng);
        }
    }
}
