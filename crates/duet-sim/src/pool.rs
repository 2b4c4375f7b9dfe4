//! Fixed-capacity projectile pools, one per attack type.
//!
//! Slots are spawned once per encounter and never grow. Running out of
//! free slots is routine: the attack is skipped for that tick.

use std::collections::BTreeMap;

use hecs::{Entity, World};
use log::debug;
use rand::Rng;

use duet_core::components::{Hidden, Hitbox, Position};
use duet_core::constants::OFF_STAGE;
use duet_core::enums::{BossKind, PlayerSlot, PoolKind};

use crate::projectile::{activate, spec_for, Projectile, Shot};

/// Pool slots for one attack type, in scan order.
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    kind: PoolKind,
    slots: Vec<Entity>,
}

impl ProjectilePool {
    /// Spawn `spec_for(kind).capacity` parked slots.
    pub fn spawn(world: &mut World, kind: PoolKind) -> Self {
        let spec = spec_for(kind);
        let slots = (0..spec.capacity)
            .map(|_| {
                world.spawn((
                    Projectile::new(kind),
                    Position(OFF_STAGE),
                    Hitbox {
                        radius: spec.radius,
                    },
                ))
            })
            .collect();
        Self { kind, slots }
    }

    pub fn kind(&self) -> PoolKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Entity] {
        &self.slots
    }

    fn is_free(world: &World, slot: Entity) -> bool {
        world
            .get::<&Projectile>(slot)
            .map(|projectile| projectile.is_free())
            .unwrap_or(false)
    }

    /// First free slot in scan order.
    pub fn next_free(&self, world: &World) -> Option<Entity> {
        self.slots
            .iter()
            .copied()
            .find(|&slot| Self::is_free(world, slot))
    }

    /// Up to `count` free slots; fewer if the pool is short.
    pub fn next_free_batch(&self, world: &World, count: usize) -> Vec<Entity> {
        self.slots
            .iter()
            .copied()
            .filter(|&slot| Self::is_free(world, slot))
            .take(count)
            .collect()
    }

    /// Slots currently flying.
    pub fn active_count(&self, world: &World) -> usize {
        self.slots
            .iter()
            .filter(|&&slot| {
                world
                    .get::<&Projectile>(slot)
                    .map(|projectile| projectile.active)
                    .unwrap_or(false)
            })
            .count()
    }

    /// Park every slot, frozen ones included, and make them visible again.
    pub fn deactivate_all(&self, world: &mut World) {
        for &slot in &self.slots {
            if let Ok((projectile, position)) =
                world.query_one_mut::<(&mut Projectile, &mut Position)>(slot)
            {
                projectile.deactivate(position);
            }
            let _ = world.remove_one::<Hidden>(slot);
        }
    }
}

/// Every pool in the encounter.
#[derive(Debug, Clone, Default)]
pub struct Pools {
    pools: BTreeMap<PoolKind, ProjectilePool>,
}

impl Pools {
    pub fn spawn(world: &mut World, kinds: &[PoolKind]) -> Self {
        let pools = kinds
            .iter()
            .map(|&kind| (kind, ProjectilePool::spawn(world, kind)))
            .collect();
        Self { pools }
    }

    pub fn get(&self, kind: PoolKind) -> Option<&ProjectilePool> {
        self.pools.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectilePool> {
        self.pools.values()
    }

    pub fn active_total(&self, world: &World) -> usize {
        self.iter().map(|pool| pool.active_count(world)).sum()
    }

    pub fn deactivate_all(&self, world: &mut World) {
        for pool in self.pools.values() {
            pool.deactivate_all(world);
        }
    }

    /// Activate the first free slot of `kind`. Returns the slot, or `None`
    /// if the pool is missing or exhausted.
    pub fn fire<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        kind: PoolKind,
        shot: Shot,
        now: f32,
        rng: &mut R,
    ) -> Option<Entity> {
        let Some(slot) = self.get(kind).and_then(|pool| pool.next_free(world)) else {
            debug!("{kind:?} pool exhausted, shot skipped");
            return None;
        };
        activate(world, slot, shot, now, rng).then_some(slot)
    }

    /// Activate up to `count` slots of `kind` from the same shot.
    /// Returns how many were activated.
    pub fn fire_burst<R: Rng + ?Sized>(
        &self,
        world: &mut World,
        kind: PoolKind,
        count: usize,
        shot: Shot,
        now: f32,
        rng: &mut R,
    ) -> usize {
        let slots = self
            .get(kind)
            .map(|pool| pool.next_free_batch(world, count))
            .unwrap_or_default();
        if slots.len() < count {
            debug!("{kind:?} pool short: {} of {count} free", slots.len());
        }
        slots
            .into_iter()
            .filter(|&slot| activate(world, slot, shot, now, rng))
            .count()
    }
}

/// Pools a player uses for its light and heavy attacks.
pub fn player_pools(slot: PlayerSlot) -> (PoolKind, PoolKind) {
    match slot {
        PlayerSlot::Wizard => (PoolKind::WizardLight, PoolKind::WizardHeavy),
        PlayerSlot::Warrior => (PoolKind::WarriorLight, PoolKind::WarriorHeavy),
    }
}

/// Pools a boss draws from.
pub fn boss_pools(kind: BossKind) -> &'static [PoolKind] {
    match kind {
        BossKind::ByleSlime => &[
            PoolKind::AimedSlimeBall,
            PoolKind::RandomSlimeBall,
            PoolKind::Bubble,
            PoolKind::BabySlime,
        ],
        BossKind::GiantCrab => &[PoolKind::Claw, PoolKind::Water, PoolKind::Sand],
        BossKind::PossessedKing => &[
            PoolKind::Crown,
            PoolKind::FalseWizardHeavy,
            PoolKind::FalseWarriorHeavy,
            PoolKind::Coin,
        ],
    }
}
