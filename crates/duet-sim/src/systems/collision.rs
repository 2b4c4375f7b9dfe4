//! Collision system: projectile hits, damage resolution and the hand-off
//! to the game-over sequence.

use hecs::{Entity, World};
use log::debug;

use duet_core::combat::{Combatant, DamageOutcome};
use duet_core::components::{Hidden, Hitbox, PlayerState, Position};
use duet_core::enums::{Actor, PlayerSlot, SessionState, Side};
use duet_core::events::Cue;
use duet_core::types::{circles_overlap, SimTime, Vec2};

use crate::boss::BossState;
use crate::projectile::Projectile;
use crate::session::Session;
use crate::systems::game_over;

#[derive(Debug, Clone, Copy)]
struct Victim {
    entity: Entity,
    actor: Actor,
    position: Vec2,
    radius: f32,
}

#[derive(Debug, Clone, Copy)]
struct Flying {
    entity: Entity,
    side: Side,
    position: Vec2,
    radius: f32,
    damage: f32,
    shooter: Option<Entity>,
    destroy_on_hit: bool,
}

/// Players that can be hit: active, alive and on screen.
fn player_victims(world: &World) -> Vec<Victim> {
    world
        .query::<(&PlayerState, &Position, &Hitbox, Option<&Hidden>)>()
        .iter()
        .filter(|(_, (state, _, _, hidden))| state.active && !state.is_dead() && hidden.is_none())
        .map(|(entity, (state, position, hitbox, _))| Victim {
            entity,
            actor: Actor::Player(state.slot),
            position: position.0,
            radius: hitbox.radius,
        })
        .collect()
}

fn boss_victims(world: &World) -> Vec<Victim> {
    world
        .query::<(&BossState, &Position, &Hitbox, Option<&Hidden>)>()
        .iter()
        .filter(|(_, (state, _, _, hidden))| !state.is_dead() && hidden.is_none())
        .map(|(entity, (state, position, hitbox, _))| Victim {
            entity,
            actor: Actor::Boss(state.kind),
            position: position.0,
            radius: hitbox.radius,
        })
        .collect()
}

fn flying(world: &World) -> Vec<Flying> {
    world
        .query::<(&Projectile, &Position, &Hitbox)>()
        .iter()
        .filter(|(_, (projectile, _, _))| projectile.active)
        .map(|(entity, (projectile, position, hitbox))| Flying {
            entity,
            side: projectile.spec.side,
            position: position.0,
            radius: hitbox.radius,
            damage: projectile.spec.damage,
            shooter: projectile.shooter,
            destroy_on_hit: projectile.spec.destroy_on_hit,
        })
        .collect()
}

/// Track overlap for one projectile/victim pair. Returns `true` only on
/// the tick the overlap begins.
fn entered(world: &mut World, shot: Entity, victim: Entity, overlapping: bool) -> bool {
    let Ok(mut projectile) = world.get::<&mut Projectile>(shot) else {
        return false;
    };
    if !overlapping {
        projectile.touching.retain(|&entity| entity != victim);
        return false;
    }
    if projectile.touching.contains(&victim) {
        return false;
    }
    projectile.touching.push(victim);
    true
}

fn apply_damage(world: &mut World, victim: &Victim, amount: f32, now: f32) -> DamageOutcome {
    let outcome = match victim.actor {
        Actor::Player(_) => world
            .get::<&mut PlayerState>(victim.entity)
            .map(|mut state| state.take_damage(amount, now)),
        Actor::Boss(_) => world
            .get::<&mut BossState>(victim.entity)
            .map(|mut state| state.take_damage(amount, now)),
    };
    outcome.unwrap_or(DamageOutcome::Ignored)
}

fn shooter_slot(world: &World, shooter: Option<Entity>) -> Option<PlayerSlot> {
    let shooter = shooter?;
    world.get::<&PlayerState>(shooter).ok().map(|state| state.slot)
}

fn park(world: &mut World, shot: Entity) {
    if let Ok((projectile, position)) =
        world.query_one_mut::<(&mut Projectile, &mut Position)>(shot)
    {
        projectile.deactivate(position);
    }
}

/// Resolve every projectile against the opposing side.
pub fn run(world: &mut World, session: &mut Session, time: &SimTime, cues: &mut Vec<Cue>) {
    let players = player_victims(world);
    let bosses = boss_victims(world);

    for shot in flying(world) {
        if session.state != SessionState::Playing {
            return;
        }
        let victims = match shot.side {
            Side::Hostile => &players,
            Side::Friendly => &bosses,
        };

        for victim in victims {
            let overlapping =
                circles_overlap(shot.position, shot.radius, victim.position, victim.radius);
            if !entered(world, shot.entity, victim.entity, overlapping) {
                continue;
            }

            let outcome = apply_damage(world, victim, shot.damage, time.now);
            if shot.side == Side::Friendly {
                if let Some(slot) = shooter_slot(world, shot.shooter) {
                    session.record_damage(slot, outcome.dealt());
                }
            }
            match outcome {
                DamageOutcome::Hurt { .. } => cues.push(Cue::Hurt {
                    target: victim.actor,
                }),
                DamageOutcome::Killed { .. } => cues.push(Cue::Death {
                    target: victim.actor,
                }),
                DamageOutcome::Ignored => {}
            }

            if outcome.is_lethal()
                && session.enter_game_over(time.now, victim.entity, victim.actor, Some(shot.entity))
            {
                // The killing blow stays on screen for the sequence.
                if let Ok(mut projectile) = world.get::<&mut Projectile>(shot.entity) {
                    projectile.freeze();
                }
                game_over::hide_for_sequence(world, victim.entity, shot.entity);
                return;
            }
            if shot.destroy_on_hit {
                debug!("{:?} hit {:?}", shot.entity, victim.actor);
                park(world, shot.entity);
                break;
            }
        }
    }
}
