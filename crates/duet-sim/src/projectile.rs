//! Projectile component, per-pool specs and motion rules.
//!
//! Projectiles are pre-spawned pool slots. A slot is either active
//! (moving, collidable), frozen (held on screen during the game-over
//! sequence) or parked off-stage.

use hecs::{Entity, World};
use log::trace;
use rand::Rng;

use duet_core::components::Position;
use duet_core::constants::*;
use duet_core::enums::{PoolKind, Side};
use duet_core::types::{lerp, Vec2};

/// Type-specific movement on top of (or instead of) straight travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionRule {
    Straight,
    /// Direction set toward a point at activation.
    Aimed,
    /// Direction `(forward, U(-spread, spread))`, normalized.
    RandomAngle { spread: f32 },
    /// Speed grows by `rate` per second; restored on deactivate.
    Accelerate { rate: f32 },
    /// Vertical sine wave around the launch height.
    Wave { amplitude: f32, frequency: f32 },
    /// Extra vertical travel that reflects at the arena's vertical bounds.
    WallBounce { vertical_speed: f32 },
    /// Flies to a random point on the far side, then back to the shooter.
    Boomerang,
}

/// Fixed properties of every slot in a pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub capacity: usize,
    pub side: Side,
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub lifetime: f32,
    pub destroy_on_hit: bool,
    pub motion: MotionRule,
}

/// Get the spec for a given pool.
pub fn spec_for(kind: PoolKind) -> ProjectileSpec {
    use MotionRule::*;

    let (capacity, side, speed, damage, radius, destroy_on_hit, motion) = match kind {
        PoolKind::WizardLight => (8, Side::Friendly, 14.0, 2.0, 0.2, true, Straight),
        PoolKind::WizardHeavy => (
            3,
            Side::Friendly,
            9.0,
            6.0,
            0.45,
            true,
            Wave {
                amplitude: 0.75,
                frequency: 8.0,
            },
        ),
        PoolKind::WarriorLight => (8, Side::Friendly, 12.0, 2.5, 0.25, true, Straight),
        PoolKind::WarriorHeavy => (3, Side::Friendly, 6.0, 5.0, 0.5, false, Accelerate { rate: 10.0 }),
        PoolKind::AimedSlimeBall => (6, Side::Hostile, 8.0, 1.0, 0.3, true, Aimed),
        PoolKind::RandomSlimeBall => (6, Side::Hostile, 8.0, 1.0, 0.3, true, RandomAngle { spread: 0.33 }),
        PoolKind::Bubble => (
            6,
            Side::Hostile,
            5.0,
            1.0,
            0.35,
            true,
            Wave {
                amplitude: 2.0,
                frequency: 4.0,
            },
        ),
        PoolKind::BabySlime => (
            8,
            Side::Hostile,
            4.0,
            1.0,
            0.4,
            true,
            WallBounce {
                vertical_speed: 6.0,
            },
        ),
        PoolKind::Claw => (6, Side::Hostile, 10.0, 1.0, 0.35, true, Aimed),
        PoolKind::Water => (12, Side::Hostile, 4.0, 1.0, 0.3, true, Accelerate { rate: 8.0 }),
        PoolKind::Sand => (15, Side::Hostile, 7.0, 1.0, 0.25, true, RandomAngle { spread: 0.5 }),
        PoolKind::Crown => (3, Side::Hostile, 2.0, 1.0, 0.5, false, Boomerang),
        PoolKind::FalseWizardHeavy | PoolKind::FalseWarriorHeavy => {
            (6, Side::Hostile, 9.0, 1.0, 0.45, true, Aimed)
        }
        PoolKind::Coin => (16, Side::Hostile, 7.0, 1.0, 0.25, true, RandomAngle { spread: 0.6 }),
    };

    ProjectileSpec {
        capacity,
        side,
        speed,
        damage,
        radius,
        lifetime: match motion {
            Boomerang => BOOMERANG_LIFETIME,
            _ => PROJECTILE_LIFETIME,
        },
        destroy_on_hit,
        motion,
    }
}

/// Per-shot scratch for the motion rules that need it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MotionState {
    #[default]
    None,
    Wave {
        start_y: f32,
        position: f32,
    },
    Bounce {
        direction: f32,
    },
    Boomerang {
        target: Vec2,
        origin: Vec2,
        timer: f32,
        returning: bool,
    },
}

/// One pool slot.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pool: PoolKind,
    pub spec: ProjectileSpec,
    pub active: bool,
    /// Killing blow held on screen; not moving, not colliding, not free.
    pub frozen: bool,
    /// Weak reference used for attribution and boomerang returns.
    pub shooter: Option<Entity>,
    pub speed: f32,
    pub direction: Vec2,
    pub spawn_time: f32,
    pub motion: MotionState,
    /// Targets currently overlapped; each is hit once per entry.
    pub touching: Vec<Entity>,
}

impl Projectile {
    pub fn new(pool: PoolKind) -> Self {
        let spec = spec_for(pool);
        Self {
            pool,
            spec,
            active: false,
            frozen: false,
            shooter: None,
            speed: spec.speed,
            direction: Vec2::ZERO,
            spawn_time: 0.0,
            motion: MotionState::None,
            touching: Vec::new(),
        }
    }

    /// Free for [`activate`]: neither flying nor frozen.
    pub fn is_free(&self) -> bool {
        !self.active && !self.frozen
    }

    /// Park the slot off-stage. Idempotent.
    pub fn deactivate(&mut self, position: &mut Position) {
        self.active = false;
        self.frozen = false;
        self.speed = self.spec.speed;
        self.motion = MotionState::None;
        self.touching.clear();
        position.0 = OFF_STAGE;
    }

    /// Stop in place and stay visible.
    pub fn freeze(&mut self) {
        self.active = false;
        self.frozen = true;
        self.direction = Vec2::ZERO;
    }
}

/// Launch parameters for one projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub shooter: Option<Entity>,
    pub position: Vec2,
    /// Point that aimed projectiles head toward.
    pub aim_at: Option<Vec2>,
}

/// Activate a free slot. Returns `false` when the slot is missing or busy.
pub fn activate<R: Rng + ?Sized>(
    world: &mut World,
    slot: Entity,
    shot: Shot,
    now: f32,
    rng: &mut R,
) -> bool {
    let Ok((projectile, position)) = world.query_one_mut::<(&mut Projectile, &mut Position)>(slot)
    else {
        return false;
    };
    if !projectile.is_free() {
        return false;
    }

    let spec = projectile.spec;
    let forward = Vec2::new(spec.side.forward(), 0.0);

    projectile.active = true;
    projectile.frozen = false;
    projectile.shooter = shot.shooter;
    projectile.spawn_time = now;
    projectile.speed = spec.speed;
    projectile.touching.clear();
    projectile.direction = forward;
    projectile.motion = MotionState::None;
    position.0 = shot.position;

    match spec.motion {
        MotionRule::Straight | MotionRule::Accelerate { .. } => {}
        MotionRule::Aimed => {
            if let Some(target) = shot.aim_at {
                let aimed = (target - shot.position).normalize_or_zero();
                if aimed != Vec2::ZERO {
                    projectile.direction = aimed;
                }
            }
        }
        MotionRule::RandomAngle { spread } => {
            let dy = rng.gen_range(-spread..=spread);
            projectile.direction = Vec2::new(forward.x, dy).normalize_or_zero();
        }
        MotionRule::Wave {
            amplitude,
            frequency,
        } => {
            let wave_position = rng.gen_range(0.0..1.0_f32);
            projectile.motion = MotionState::Wave {
                start_y: shot.position.y - (wave_position * frequency).sin() * amplitude,
                position: wave_position,
            };
        }
        MotionRule::WallBounce { .. } => {
            projectile.motion = MotionState::Bounce {
                direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            };
        }
        MotionRule::Boomerang => {
            projectile.direction = Vec2::ZERO;
            projectile.motion = MotionState::Boomerang {
                target: Vec2::new(
                    BOOMERANG_REACH_X * forward.x,
                    rng.gen_range(BOOMERANG_MIN_Y..=BOOMERANG_MAX_Y),
                ),
                origin: shot.position,
                timer: 0.0,
                returning: false,
            };
        }
    }

    trace!("{:?} activated at {:?}", projectile.pool, shot.position);
    true
}

/// Advance one active projectile by `dt`.
///
/// `shooter_position` is the shooter's current position, if it still exists.
/// Returns `true` when the motion rule itself finished the flight.
pub fn step(
    projectile: &mut Projectile,
    position: &mut Vec2,
    dt: f32,
    shooter_position: Option<Vec2>,
) -> bool {
    *position += projectile.direction * projectile.speed * dt;

    match (projectile.spec.motion, &mut projectile.motion) {
        (MotionRule::Accelerate { rate }, _) => {
            projectile.speed += rate * dt;
        }
        (
            MotionRule::Wave {
                amplitude,
                frequency,
            },
            MotionState::Wave {
                start_y,
                position: wave,
            },
        ) => {
            position.y = *start_y + (*wave * frequency).sin() * amplitude;
            *wave += dt;
        }
        (MotionRule::WallBounce { vertical_speed }, MotionState::Bounce { direction }) => {
            position.y += *direction * vertical_speed * dt;
            if position.y >= ARENA.max.y {
                position.y = ARENA.max.y;
                *direction = -1.0;
            } else if position.y <= ARENA.min.y {
                position.y = ARENA.min.y;
                *direction = 1.0;
            }
        }
        (
            MotionRule::Boomerang,
            MotionState::Boomerang {
                target,
                origin,
                timer,
                returning,
            },
        ) => {
            if *returning || position.distance(*target) <= BOOMERANG_ARRIVE_DISTANCE {
                *returning = true;
                if let Some(anchor) = shooter_position {
                    *origin = anchor;
                }
            }
            let t = ((*timer).cos() + 1.0) * 0.5;
            *position = Vec2::new(lerp(target.x, origin.x, t), lerp(target.y, origin.y, t));
            *timer += dt * projectile.speed;

            if *returning && position.distance(*origin) <= BOOMERANG_ARRIVE_DISTANCE {
                return true;
            }
        }
        _ => {}
    }
    false
}

/// Whether the projectile has outlived its lifetime at `now`.
pub fn expired(projectile: &Projectile, now: f32) -> bool {
    now >= projectile.spawn_time + projectile.spec.lifetime
}
