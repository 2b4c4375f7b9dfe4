//! Snapshot system: queries the ECS world and builds a complete EncounterSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use duet_core::combat::Combatant;
use duet_core::components::{Hidden, PlayerState, Position};
use duet_core::enums::{BossKind, BossPhase, SessionExit};
use duet_core::events::Cue;
use duet_core::state::*;
use duet_core::types::SimTime;

use crate::boss::BossState;
use crate::projectile::Projectile;
use crate::session::Session;

/// Build a complete EncounterSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    boss_kind: BossKind,
    session: &Session,
    cues: Vec<Cue>,
    exit: Option<SessionExit>,
) -> EncounterSnapshot {
    EncounterSnapshot {
        time: *time,
        state: session.state,
        boss: build_boss(world, boss_kind),
        players: build_players(world, time.now),
        projectiles: build_projectiles(world),
        cues,
        stats: build_stats(session, time.now),
        game_over: build_game_over(session, boss_kind, time.now),
        exit,
    }
}

fn build_boss(world: &World, kind: BossKind) -> BossView {
    world
        .query::<(&BossState, &Position, Option<&Hidden>)>()
        .iter()
        .next()
        .map(|(_, (boss, position, hidden))| BossView {
            kind: boss.kind,
            position: position.0,
            health: boss.vitals.health,
            max_health: boss.vitals.max_health,
            health_ratio: boss.health_ratio(),
            dead: boss.is_dead(),
            phase: boss.scheduler.phase(),
            desperation: boss.scheduler.desperation(),
            visible: hidden.is_none(),
        })
        .unwrap_or(BossView {
            kind,
            position: crate::boss::spawn_point(kind),
            health: 0.0,
            max_health: 0.0,
            health_ratio: 0.0,
            dead: true,
            phase: BossPhase::Walk,
            desperation: 1.0,
            visible: false,
        })
}

/// Both players, wizard first.
fn build_players(world: &World, now: f32) -> Vec<PlayerView> {
    let mut players: Vec<PlayerView> = world
        .query::<(&PlayerState, &Position, Option<&Hidden>)>()
        .iter()
        .map(|(_, (player, position, hidden))| PlayerView {
            slot: player.slot,
            active: player.active,
            position: position.0,
            health: player.vitals.health,
            max_health: player.vitals.max_health,
            dead: player.is_dead(),
            resource: player.resource,
            resource_ratio: player.resource_ratio(),
            exchanging: player.exchanging,
            moving: player.moving,
            hurt: player.is_hurt(now),
            visible: player.active && hidden.is_none(),
        })
        .collect();

    players.sort_by_key(|p| p.slot.index());
    players
}

/// Projectiles in flight plus a frozen killing blow. Hidden ones are omitted.
fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    world
        .query::<(&Projectile, &Position, Option<&Hidden>)>()
        .iter()
        .filter(|(_, (projectile, _, hidden))| {
            (projectile.active || projectile.frozen) && hidden.is_none()
        })
        .map(|(_, (projectile, position, _))| ProjectileView {
            pool: projectile.pool,
            side: projectile.spec.side,
            position: position.0,
            frozen: projectile.frozen,
        })
        .collect()
}

fn build_stats(session: &Session, now: f32) -> StatsView {
    StatsView {
        damage_dealt: session.damage_dealt,
        exchanged: session.exchanged,
        start_time: session.start_time,
        end_time: session.end_time,
        elapsed_secs: session.elapsed(now),
    }
}

fn build_game_over(session: &Session, boss_kind: BossKind, now: f32) -> Option<GameOverView> {
    let sequence = session.game_over.as_ref()?;
    Some(GameOverView {
        stage: sequence.stage,
        win: sequence.win,
        final_encounter: boss_kind.is_final(),
        dying: sequence.dying_actor,
        elapsed_secs: sequence.elapsed(now),
    })
}
