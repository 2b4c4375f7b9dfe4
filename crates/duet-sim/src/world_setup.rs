//! Entity spawn factories for setting up an encounter world.
//!
//! Creates the two players, the boss and every projectile pool slot.

use hecs::{Entity, World};
use rand::Rng;

use duet_core::components::*;
use duet_core::config::Tuning;
use duet_core::constants::*;
use duet_core::enums::{BossKind, PlayerSlot};

use crate::boss::{self, BossState};
use crate::pool::{boss_pools, player_pools, Pools};

/// Handles to everything an encounter spawns.
#[derive(Debug, Clone)]
pub struct EncounterEntities {
    pub players: [Entity; 2],
    pub boss: Entity,
    pub pools: Pools,
}

/// Spawn a fresh encounter. `solo` marks the one player that is active;
/// `None` is co-op.
pub fn setup_encounter<R: Rng + ?Sized>(
    world: &mut World,
    kind: BossKind,
    solo: Option<PlayerSlot>,
    tuning: &Tuning,
    rng: &mut R,
) -> EncounterEntities {
    let players = PlayerSlot::ALL.map(|slot| {
        let active = solo.map_or(true, |only| only == slot);
        spawn_player(world, slot, active, tuning)
    });
    let boss = spawn_boss(world, kind, tuning, rng);

    let mut kinds = Vec::new();
    for slot in PlayerSlot::ALL {
        let (light, heavy) = player_pools(slot);
        kinds.push(light);
        kinds.push(heavy);
    }
    kinds.extend_from_slice(boss_pools(kind));
    let pools = Pools::spawn(world, &kinds);

    EncounterEntities {
        players,
        boss,
        pools,
    }
}

pub fn player_spawn(slot: PlayerSlot) -> duet_core::types::Vec2 {
    match slot {
        PlayerSlot::Wizard => WIZARD_SPAWN,
        PlayerSlot::Warrior => WARRIOR_SPAWN,
    }
}

pub fn spawn_player(world: &mut World, slot: PlayerSlot, active: bool, tuning: &Tuning) -> Entity {
    let spawn = player_spawn(slot);
    world.spawn((
        PlayerState::new(slot, spawn, active, tuning),
        Position(spawn),
        Hitbox {
            radius: PLAYER_RADIUS,
        },
    ))
}

pub fn spawn_boss<R: Rng + ?Sized>(
    world: &mut World,
    kind: BossKind,
    tuning: &Tuning,
    rng: &mut R,
) -> Entity {
    let state = BossState::new(kind, tuning.boss_max_health(kind), rng);
    world.spawn((
        Position(state.spawn),
        Hitbox {
            radius: boss::radius(kind),
        },
        state,
    ))
}
