//! Player system: movement, attacks, resource exchange and regeneration.

use hecs::{Entity, World};
use rand::Rng;

use duet_core::combat::Combatant;
use duet_core::commands::PlayerInput;
use duet_core::components::{PlayerState, Position};
use duet_core::constants::{PLAYER_BOUNDS, PLAYER_MUZZLE_OFFSET};
use duet_core::events::Cue;
use duet_core::types::{SimTime, Vec2};

use crate::pool::{player_pools, Pools};
use crate::projectile::Shot;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attack {
    Light,
    Heavy,
}

/// Partner facts a player reads before updating itself.
#[derive(Debug, Clone, Copy)]
struct Partner {
    entity: Entity,
    position: Vec2,
    exchanging: bool,
    resource_ratio: f32,
}

fn partner_of(world: &World, entity: Entity) -> Option<Partner> {
    let mut query = world.query_one::<(&PlayerState, &Position)>(entity).ok()?;
    let (state, position) = query.get()?;
    Some(Partner {
        entity,
        position: position.0,
        exchanging: state.exchanging,
        resource_ratio: state.resource_ratio(),
    })
}

/// Run the player system for both players, in slot order.
#[allow(clippy::too_many_arguments)]
pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    players: [Entity; 2],
    inputs: &[PlayerInput; 2],
    pools: &Pools,
    session: &mut Session,
    time: &SimTime,
    rng: &mut R,
    cues: &mut Vec<Cue>,
) {
    for index in 0..2 {
        let entity = players[index];
        let Some(partner) = partner_of(world, players[1 - index]) else {
            continue;
        };
        update_player(
            world,
            entity,
            &partner,
            &inputs[index],
            pools,
            session,
            time,
            rng,
            cues,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn update_player<R: Rng + ?Sized>(
    world: &mut World,
    entity: Entity,
    partner: &Partner,
    input: &PlayerInput,
    pools: &Pools,
    session: &mut Session,
    time: &SimTime,
    rng: &mut R,
    cues: &mut Vec<Cue>,
) {
    let now = time.now;
    let dt = time.dt;

    // Movement, attack intent and exchange happen under one borrow; firing
    // and giving resource need the world back.
    let (slot, muzzle, attack, given) = {
        let Ok((state, position)) = world.query_one_mut::<(&mut PlayerState, &mut Position)>(entity)
        else {
            return;
        };

        if !state.active {
            // Solo mode: stand in for the partner so targeting stays defined.
            position.0 = partner.position;
            return;
        }
        if state.is_dead() {
            return;
        }

        steer(state, position, input, dt);
        let attack = choose_attack(state, input, now);
        let given = exchange(state, partner, input, dt, cues);
        if !state.exchanging {
            state.resource = (state.resource + state.resource_regen * dt).min(state.max_resource);
        }

        (state.slot, position.0 + PLAYER_MUZZLE_OFFSET, attack, given)
    };

    if given > 0.0 {
        if let Ok(mut other) = world.get::<&mut PlayerState>(partner.entity) {
            other.give_resource(given);
        }
        session.record_exchange(given);
    }

    let Some(attack) = attack else {
        return;
    };
    let (light_pool, heavy_pool) = player_pools(slot);
    let pool = match attack {
        Attack::Light => light_pool,
        Attack::Heavy => heavy_pool,
    };
    let shot = Shot {
        shooter: Some(entity),
        position: muzzle,
        aim_at: None,
    };
    // No free slot: no cost and no cooldown.
    if pools.fire(world, pool, shot, now, rng).is_none() {
        return;
    }
    if let Ok(mut state) = world.get::<&mut PlayerState>(entity) {
        match attack {
            Attack::Light => {
                state.resource -= state.light_cost;
                state.next_light_at = now + state.light_fire_rate;
            }
            Attack::Heavy => {
                state.resource -= state.heavy_cost;
                state.next_heavy_at = now + state.heavy_fire_rate;
            }
        }
        state.resource = state.resource.max(0.0);
    }
    cues.push(Cue::PlayerAttack {
        player: slot,
        heavy: attack == Attack::Heavy,
    });
}

/// Velocity follows the held direction; no movement while exchanging.
fn steer(state: &mut PlayerState, position: &mut Position, input: &PlayerInput, dt: f32) {
    let held = if state.exchanging {
        Vec2::ZERO
    } else {
        input.movement.normalize_or_zero()
    };
    state.moving = held != Vec2::ZERO;

    let follow = (state.direction_time * dt).min(1.0);
    state.velocity = state.velocity.lerp(held * state.move_speed, follow);
    position.0 = PLAYER_BOUNDS.clamp(position.0 + state.velocity * dt);
}

/// Light and heavy are mutually exclusive until both cooldowns elapse.
fn choose_attack(state: &mut PlayerState, input: &PlayerInput, now: f32) -> Option<Attack> {
    if state.exchanging {
        return None;
    }
    if input.light
        && state.resource >= state.light_cost
        && now >= state.next_light_at
        && !state.heavy_attacking
    {
        state.light_attacking = true;
        state.heavy_attacking = false;
        Some(Attack::Light)
    } else if input.heavy
        && state.resource >= state.heavy_cost
        && now >= state.next_heavy_at
        && !state.light_attacking
    {
        state.light_attacking = false;
        state.heavy_attacking = true;
        Some(Attack::Heavy)
    } else {
        if now >= state.next_light_at && now >= state.next_heavy_at {
            state.light_attacking = false;
            state.heavy_attacking = false;
        }
        None
    }
}

/// Drain own resource into the partner. Returns the amount given.
///
/// A fresh press starts an exchange; holding keeps it going. Once
/// interrupted the key has to be pressed again.
fn exchange(
    state: &mut PlayerState,
    partner: &Partner,
    input: &PlayerInput,
    dt: f32,
    cues: &mut Vec<Cue>,
) -> f32 {
    let pressed = input.exchange && !state.exchange_was_held;
    state.exchange_was_held = input.exchange;

    let allowed = !partner.exchanging && state.resource > 0.0 && partner.resource_ratio < 1.0;
    let wants = (input.exchange && state.exchanging) || (pressed && !state.exchanging);

    if allowed && wants {
        let taken = (dt * state.exchange_speed).min(state.resource);
        let given = taken * state.exchange_rate;
        state.resource -= taken;
        if !state.exchanging {
            cues.push(Cue::ExchangeStarted { player: state.slot });
        }
        state.exchanging = true;
        given
    } else {
        if state.exchanging {
            cues.push(Cue::ExchangeStopped { player: state.slot });
        }
        state.exchanging = false;
        0.0
    }
}
