//! Simulation constants and tuning parameters.
//!
//! Units: world units for distance (the arena spans roughly 20 x 8),
//! seconds for time.

use crate::types::{Bounds, Vec2};

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Arena ---

/// Playable area. Wall-bouncing projectiles reflect off its vertical bounds.
pub const ARENA: Bounds = Bounds::new(Vec2::new(-10.0, -5.5), Vec2::new(10.0, 2.5));

/// Players are confined to the left part of the arena.
pub const PLAYER_BOUNDS: Bounds = Bounds::new(Vec2::new(-9.5, -5.0), Vec2::new(2.0, 2.0));

/// Where inactive projectiles are parked.
pub const OFF_STAGE: Vec2 = Vec2::new(0.0, 1000.0);

// --- Players ---

pub const PLAYER_MAX_HEALTH: f32 = 5.0;

/// Hit-invulnerability window after taking damage (seconds).
pub const PLAYER_HURT_COOLDOWN: f32 = 2.0;

pub const PLAYER_MOVE_SPEED: f32 = 6.0;

/// How quickly velocity follows the held direction.
pub const PLAYER_DIRECTION_TIME: f32 = 22.0;

pub const PLAYER_RADIUS: f32 = 0.4;

/// Offset from the player centre where its projectiles appear.
pub const PLAYER_MUZZLE_OFFSET: Vec2 = Vec2::new(0.6, 0.0);

pub const WIZARD_SPAWN: Vec2 = Vec2::new(-7.0, 0.0);
pub const WARRIOR_SPAWN: Vec2 = Vec2::new(-7.0, -3.0);

// --- Player resource economy ---

pub const PLAYER_MAX_RESOURCE: f32 = 100.0;

/// Passive resource gain per second.
pub const RESOURCE_REGEN_PER_SEC: f32 = 10.0;

pub const LIGHT_ATTACK_COST: f32 = 10.0;
pub const HEAVY_ATTACK_COST: f32 = 33.3;

/// Cooldown between light attacks (seconds).
pub const LIGHT_FIRE_RATE: f32 = 0.25;

/// Cooldown between heavy attacks (seconds).
pub const HEAVY_FIRE_RATE: f32 = 0.75;

/// Resource drained per second while exchanging.
pub const EXCHANGE_SPEED: f32 = 10.0;

/// Multiplier applied to drained resource before the partner receives it.
pub const EXCHANGE_RATE: f32 = 1.5;

// --- Bosses (shared) ---

/// Upper bound on any boss desperation multiplier.
pub const DESPERATION_CAP: f32 = 2.0;

/// At or below this health ratio aimed attacks focus the weaker player.
pub const FOCUS_FIRE_RATIO: f32 = 0.5;

pub const BYLE_SLIME_MAX_HEALTH: f32 = 150.0;
pub const GIANT_CRAB_MAX_HEALTH: f32 = 200.0;
pub const POSSESSED_KING_MAX_HEALTH: f32 = 250.0;

// --- Byle Slime ---

pub const SLIME_SPAWN: Vec2 = Vec2::new(8.0, -2.5);
pub const SLIME_RADIUS: f32 = 1.5;
pub const SLIME_MUZZLE_OFFSET: Vec2 = Vec2::new(-1.0, 0.0);
pub const SLIME_PHASE_LENGTH: f32 = 2.0;
pub const SLIME_PHASE_COOLDOWN: f32 = 1.0;

/// Number of fixed jump heights.
pub const SLIME_JUMP_POSITIONS: usize = 3;

/// Vertical distance between adjacent jump heights.
pub const SLIME_JUMP_STEP: f32 = -2.5;

/// Jump index the slime starts from.
pub const SLIME_HOME_JUMP: usize = 1;

/// Attack phases allowed before a jump is forced.
pub const SLIME_FORCED_JUMP_AFTER: u32 = 3;

/// Chance of jumping anyway when a jump is not forced.
pub const SLIME_JUMP_CHANCE: f64 = 0.25;

/// Jump takeoff must happen before this phase-timer value.
pub const SLIME_TAKEOFF_WINDOW: f32 = 0.25;

/// Phase-timer value at which the slime lands.
pub const SLIME_LAND_AT: f32 = 0.5;

pub const SLIME_BALL_INTERVAL: f32 = 0.33;
pub const SLIME_BUBBLE_INTERVAL: f32 = 0.5;
pub const SLIME_BABY_INTERVAL: f32 = 0.66;

/// Baby slimes appear behind the boss, off the right edge.
pub const BABY_SLIME_SPAWN_X: f32 = 10.625;
pub const BABY_SLIME_MIN_Y: f32 = -4.75;
pub const BABY_SLIME_MAX_Y: f32 = 1.625;

// --- Giant Crab ---

pub const CRAB_SPAWN: Vec2 = Vec2::new(8.0, -1.5);
pub const CRAB_RADIUS: f32 = 1.75;
pub const CRAB_MUZZLE_OFFSET: Vec2 = Vec2::new(-1.25, 0.5);
pub const CRAB_PHASE_LENGTH: f32 = 2.0;
pub const CRAB_MOVE_SPEED: f32 = 1.5;

/// Vertical amplitude of the crab's walk bob.
pub const CRAB_WALK_AMPLITUDE: f32 = 1.5;

/// Extra bob speed during the water attack.
pub const CRAB_WATER_BOB: f32 = 3.0;

pub const CRAB_CLAW_INTERVAL: f32 = 0.33;
pub const CRAB_WATER_INTERVAL: f32 = 0.2;
pub const CRAB_SAND_INTERVAL: f32 = 0.49;
pub const CRAB_SAND_BURST: usize = 5;

pub const CRAB_WATER_MIN_Y: f32 = -6.0;
pub const CRAB_WATER_MAX_Y: f32 = 3.0;

/// The sand attack starts once the crab has climbed above this height.
pub const CRAB_SAND_TOP_Y: f32 = -0.05;

/// The sand attack descends to this height over the phase.
pub const CRAB_SAND_BOTTOM_Y: f32 = -3.0;

// --- Possessed King ---

pub const KING_SPAWN: Vec2 = Vec2::new(8.5, -1.5);
pub const KING_RADIUS: f32 = 1.25;
pub const KING_MOVE_SPEED: f32 = 1.0;
pub const KING_PHASE_COOLDOWN: f32 = 1.0;

pub const KING_ORBIT_MIN: Vec2 = Vec2::new(7.5, -5.0);
pub const KING_ORBIT_MAX: Vec2 = Vec2::new(9.5, 2.0);

pub const KING_CROWN_INTERVAL: f32 = 1.0;
pub const KING_CROWN_PHASE_LENGTH: f32 = 2.0;
pub const KING_FALSE_INTERVAL: f32 = 0.5;
pub const KING_FALSE_PHASE_LENGTH: f32 = 3.0;
pub const KING_COIN_INTERVAL: f32 = 0.5;
pub const KING_COIN_PHASE_LENGTH: f32 = 3.0;
pub const KING_COIN_BURST: usize = 4;

// --- Projectiles ---

/// Default time a projectile stays active (seconds).
pub const PROJECTILE_LIFETIME: f32 = 2.0;

/// Boomerangs get long enough to fly out and back.
pub const BOOMERANG_LIFETIME: f32 = 6.0;

/// Boomerang target x distance from the arena centre.
pub const BOOMERANG_REACH_X: f32 = 9.5;
pub const BOOMERANG_MIN_Y: f32 = -5.0;
pub const BOOMERANG_MAX_Y: f32 = 2.5;

/// Distance at which a boomerang counts as arrived.
pub const BOOMERANG_ARRIVE_DISTANCE: f32 = 0.1;

// --- Game over sequence ---

/// Seconds after death until the explosion.
pub const GAME_OVER_EXPLODE_DELAY: f32 = 2.0;

/// Seconds after death until the outcome is shown.
pub const GAME_OVER_OUTCOME_DELAY: f32 = 4.0;
