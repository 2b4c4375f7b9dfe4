//! Game-over sequence: hide the stage, explode the dying entity, surface
//! the outcome, and reset everything for a retry.

use hecs::{Entity, World};
use log::info;
use rand::Rng;

use duet_core::combat::Combatant;
use duet_core::components::{Hidden, PlayerState, Position};
use duet_core::constants::{GAME_OVER_EXPLODE_DELAY, GAME_OVER_OUTCOME_DELAY};
use duet_core::enums::GameOverStage;
use duet_core::events::Cue;
use duet_core::types::SimTime;

use crate::boss::BossState;
use crate::pool::Pools;
use crate::projectile::Projectile;
use crate::session::Session;

/// Hide every gameplay object except the dying entity and the killing blow.
pub fn hide_for_sequence(world: &mut World, dying: Entity, projectile: Entity) {
    let mut hide: Vec<Entity> = Vec::new();
    hide.extend(world.query::<&PlayerState>().iter().map(|(entity, _)| entity));
    hide.extend(world.query::<&BossState>().iter().map(|(entity, _)| entity));
    hide.extend(world.query::<&Projectile>().iter().map(|(entity, _)| entity));

    for entity in hide {
        if entity != dying && entity != projectile {
            let _ = world.insert_one(entity, Hidden);
        }
    }
}

/// Advance the time-keyed sequence. Runs in both GameOver and Stats.
pub fn run(
    world: &mut World,
    session: &mut Session,
    time: &SimTime,
    final_encounter: bool,
    cues: &mut Vec<Cue>,
) {
    let Some(sequence) = session.game_over.as_mut() else {
        return;
    };
    let elapsed = sequence.elapsed(time.now);

    if sequence.stage == GameOverStage::Frozen
        && (sequence.skipped || elapsed >= GAME_OVER_EXPLODE_DELAY)
    {
        if let Ok(position) = world.get::<&Position>(sequence.dying) {
            cues.push(Cue::Explosion {
                position: position.0,
            });
        }
        if let Some(shot) = sequence.projectile {
            if let Ok((projectile, position)) =
                world.query_one_mut::<(&mut Projectile, &mut Position)>(shot)
            {
                projectile.deactivate(position);
            }
        }
        let _ = world.insert_one(sequence.dying, Hidden);
        sequence.stage = GameOverStage::Exploded;
        info!("game over: {:?} exploded", sequence.dying_actor);
    }

    if sequence.stage == GameOverStage::Exploded && elapsed >= GAME_OVER_OUTCOME_DELAY {
        sequence.stage = GameOverStage::Outcome;
        cues.push(Cue::Outcome {
            win: sequence.win,
            final_encounter,
        });
        info!("game over: outcome win={} final={final_encounter}", sequence.win);
    }
}

/// Put every combatant back at its spawn with full health, empty the
/// pools and show everything again.
pub fn reset_encounter<R: Rng + ?Sized>(
    world: &mut World,
    players: [Entity; 2],
    boss: Entity,
    pools: &Pools,
    rng: &mut R,
) {
    for entity in players {
        if let Ok((state, position)) =
            world.query_one_mut::<(&mut PlayerState, &mut Position)>(entity)
        {
            state.reset();
            position.0 = state.spawn_point();
        }
        let _ = world.remove_one::<Hidden>(entity);
    }

    if let Ok((state, position)) = world.query_one_mut::<(&mut BossState, &mut Position)>(boss) {
        state.reset_with(rng);
        position.0 = state.spawn_point();
    }
    let _ = world.remove_one::<Hidden>(boss);

    pools.deactivate_all(world);
}
