//! Tests for the encounter engine, projectile pools, collision and the session flow.

use hecs::World;

use duet_core::combat::Combatant;
use duet_core::commands::{PlayerInput, SessionCommand};
use duet_core::components::{PlayerState, Position};
use duet_core::config::Tuning;
use duet_core::constants::*;
use duet_core::enums::*;
use duet_core::events::Cue;
use duet_core::state::EncounterSnapshot;
use duet_core::types::{SimTime, Vec2};

use crate::boss::BossState;
use crate::engine::{EncounterEngine, SimConfig};
use crate::pool::Pools;
use crate::projectile::{Projectile, Shot};
use crate::systems::projectiles;

fn idle() -> [PlayerInput; 2] {
    [PlayerInput::idle(); 2]
}

fn engine_with(boss: BossKind, tuning: Tuning) -> EncounterEngine {
    EncounterEngine::new(SimConfig {
        boss,
        tuning,
        ..Default::default()
    })
}

fn position_of(engine: &EncounterEngine, entity: hecs::Entity) -> Vec2 {
    engine.world().get::<&Position>(entity).unwrap().0
}

fn player(engine: &EncounterEngine, slot: PlayerSlot) -> PlayerState {
    (*engine
        .world()
        .get::<&PlayerState>(engine.player_entity(slot))
        .unwrap())
    .clone()
}

fn boss(engine: &EncounterEngine) -> BossState {
    (*engine.world().get::<&BossState>(engine.boss_entity()).unwrap()).clone()
}

fn count_cues(snapshots: &[EncounterSnapshot], matches: impl Fn(&Cue) -> bool) -> usize {
    snapshots
        .iter()
        .flat_map(|snap| snap.cues.iter())
        .filter(|cue| matches(cue))
        .count()
}

/// Tick until the fight starts.
fn start_fight(engine: &mut EncounterEngine) -> Vec<EncounterSnapshot> {
    engine.queue_command(SessionCommand::Skip);
    let snap = engine.tick(idle());
    assert_eq!(snap.state, SessionState::Playing);
    vec![snap]
}

/// Fire one wizard heavy at the boss every tick until the session leaves Playing.
fn kill_boss(engine: &mut EncounterEngine) -> Vec<EncounterSnapshot> {
    let wizard = engine.player_entity(PlayerSlot::Wizard);
    let mut snapshots = Vec::new();
    for _ in 0..120 {
        if engine.state() != SessionState::Playing {
            break;
        }
        let at = position_of(engine, engine.boss_entity());
        engine.fire_test_projectile(PoolKind::WizardHeavy, wizard, at);
        snapshots.push(engine.tick(idle()));
    }
    snapshots
}

/// Fire one slime ball at the wizard every tick until the session leaves Playing.
fn kill_wizard(engine: &mut EncounterEngine) -> Vec<EncounterSnapshot> {
    let shooter = engine.boss_entity();
    let mut snapshots = Vec::new();
    for _ in 0..110 {
        if engine.state() != SessionState::Playing {
            break;
        }
        let at = position_of(engine, engine.player_entity(PlayerSlot::Wizard));
        engine.fire_test_projectile(PoolKind::AimedSlimeBall, shooter, at);
        snapshots.push(engine.tick(idle()));
    }
    snapshots
}

/// Tick through the game-over sequence until the outcome is shown.
fn run_to_outcome(engine: &mut EncounterEngine) -> Vec<EncounterSnapshot> {
    let mut snapshots = Vec::new();
    for _ in 0..(TICK_RATE * 6) {
        let snap = engine.tick(idle());
        let done = snap.game_over.as_ref().map(|g| g.stage) == Some(GameOverStage::Outcome);
        snapshots.push(snap);
        if done {
            break;
        }
    }
    snapshots
}

fn quick_hurt() -> Tuning {
    Tuning {
        hurt_cooldown: 0.25,
        ..Tuning::default()
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = EncounterEngine::new(config.clone());
    let mut engine_b = EncounterEngine::new(config);
    let inputs = [
        PlayerInput {
            movement: Vec2::new(0.0, 1.0),
            light: true,
            ..Default::default()
        },
        PlayerInput {
            heavy: true,
            ..Default::default()
        },
    ];

    for _ in 0..600 {
        let json_a = serde_json::to_string(&engine_a.tick(inputs)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(inputs)).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = EncounterEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = EncounterEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });

    let diverged = (0..900).any(|_| {
        let json_a = serde_json::to_string(&engine_a.tick(idle())).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(idle())).unwrap();
        json_a != json_b
    });
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Session start ----

#[test]
fn test_slime_fight_starts_on_first_tick() {
    let mut engine = EncounterEngine::new(SimConfig::default());
    let snap = engine.tick(idle());
    assert_eq!(snap.state, SessionState::Playing);
    assert!(snap.cues.contains(&Cue::EncounterLoaded {
        boss: BossKind::ByleSlime
    }));
    assert!(snap.cues.contains(&Cue::FightStarted {
        boss: BossKind::ByleSlime
    }));
    assert_eq!(snap.players.len(), 2);
    assert!(snap.players.iter().all(|p| p.visible && p.health == PLAYER_MAX_HEALTH));
}

#[test]
fn test_invalid_tuning_falls_back_to_defaults() {
    let tuning = Tuning::default().with_boss_max_health(BossKind::ByleSlime, 0.0);
    assert!(tuning.validate().is_err());

    let mut engine = engine_with(BossKind::ByleSlime, tuning);
    let snap = engine.tick(idle());
    assert_eq!(snap.state, SessionState::Playing);
    assert_eq!(snap.boss.health, BYLE_SLIME_MAX_HEALTH);
    assert!(!snap.boss.dead);
    assert!(!boss(&engine).is_dead());
}

#[test]
fn test_king_intro_holds_the_fight() {
    let mut engine = engine_with(BossKind::PossessedKing, Tuning::default());
    let first = engine.tick(idle());
    assert_eq!(first.state, SessionState::Intro);
    assert!(first.cues.contains(&Cue::IntroAnimation {
        boss: BossKind::PossessedKing
    }));

    let mut snapshots = vec![first];
    for _ in 0..(TICK_RATE * 5) {
        snapshots.push(engine.tick(idle()));
    }
    assert_eq!(engine.state(), SessionState::Intro);
    // Nothing moves while the intro plays.
    assert_eq!(position_of(&engine, engine.boss_entity()), KING_SPAWN);
    assert_eq!(engine.pools().active_total(engine.world()), 0);

    for _ in 0..(TICK_RATE * 6) {
        snapshots.push(engine.tick(idle()));
    }
    assert_eq!(engine.state(), SessionState::Playing);
    assert_eq!(
        count_cues(&snapshots, |c| matches!(c, Cue::FightStarted { .. })),
        1
    );
}

#[test]
fn test_skip_finishes_intro() {
    let mut engine = engine_with(BossKind::PossessedKing, Tuning::default());
    engine.tick(idle());
    let snapshots = start_fight(&mut engine);
    assert!(snapshots[0].cues.contains(&Cue::FightStarted {
        boss: BossKind::PossessedKing
    }));
    assert!(snapshots[0].cues.iter().all(|c| *c != Cue::IntroNoise));
}

#[test]
fn test_commands_ignored_while_playing() {
    let mut engine = EncounterEngine::new(SimConfig::default());
    engine.tick(idle());
    engine.queue_commands([
        SessionCommand::ToggleStats,
        SessionCommand::Continue,
        SessionCommand::Quit,
        SessionCommand::Skip,
    ]);
    let snap = engine.tick(idle());
    assert_eq!(snap.state, SessionState::Playing);
    assert!(snap.exit.is_none());
    assert!(engine.exit().is_none());
}

// ---- Pools and projectiles ----

#[test]
fn test_pool_exhaustion_skips_shot() {
    let mut engine = EncounterEngine::new(SimConfig::default());
    engine.tick(idle());
    let shooter = engine.boss_entity();
    let capacity = engine.pools().get(PoolKind::Bubble).unwrap().capacity();
    assert_eq!(capacity, 6);

    let fired = (0..=capacity)
        .filter(|_| {
            engine
                .fire_test_projectile(PoolKind::Bubble, shooter, Vec2::new(5.0, 0.0))
                .is_some()
        })
        .count();
    assert_eq!(fired, capacity);
    let pool = engine.pools().get(PoolKind::Bubble).unwrap();
    assert_eq!(pool.active_count(engine.world()), capacity);
}

#[test]
fn test_burst_takes_what_is_left() {
    let mut world = World::new();
    let pools = Pools::spawn(&mut world, &[PoolKind::Coin]);
    let mut rng = rand::rngs::mock::StepRng::new(0, 1);
    let shot = Shot {
        shooter: None,
        position: Vec2::new(8.0, 0.0),
        aim_at: None,
    };
    let capacity = pools.get(PoolKind::Coin).unwrap().capacity();
    assert_eq!(capacity, 16);

    let bursts: Vec<usize> = (0..3)
        .map(|_| pools.fire_burst(&mut world, PoolKind::Coin, 10, shot, 0.0, &mut rng))
        .collect();
    assert_eq!(bursts, vec![10, 6, 0]);
    assert_eq!(pools.active_total(&world), capacity);
}

#[test]
fn test_piercing_projectile_hits_once_per_overlap() {
    let mut engine = EncounterEngine::new(SimConfig::default());
    engine.tick(idle());
    let warrior = engine.player_entity(PlayerSlot::Warrior);
    let at = position_of(&engine, engine.boss_entity());
    let slot = engine
        .fire_test_projectile(PoolKind::WarriorHeavy, warrior, at)
        .unwrap();

    let first = engine.tick(idle());
    assert_eq!(first.boss.health, BYLE_SLIME_MAX_HEALTH - 5.0);
    assert_eq!(first.stats.damage_dealt[PlayerSlot::Warrior.index()], 5.0);

    // Still inside the boss: no second hit, and the projectile keeps flying.
    let second = engine.tick(idle());
    assert_eq!(second.boss.health, BYLE_SLIME_MAX_HEALTH - 5.0);
    assert!(engine.world().get::<&Projectile>(slot).unwrap().active);
}

#[test]
fn test_pool_reuses_first_free_slot() {
    let mut world = World::new();
    let pools = Pools::spawn(&mut world, &[PoolKind::WizardLight]);
    let mut rng = rand::rngs::mock::StepRng::new(0, 1);
    let shot = Shot {
        shooter: None,
        position: Vec2::ZERO,
        aim_at: None,
    };

    let first = pools.fire(&mut world, PoolKind::WizardLight, shot, 0.0, &mut rng).unwrap();
    let second = pools.fire(&mut world, PoolKind::WizardLight, shot, 0.0, &mut rng).unwrap();
    assert_ne!(first, second);

    {
        let (projectile, position) = world
            .query_one_mut::<(&mut Projectile, &mut Position)>(first)
            .unwrap();
        projectile.deactivate(position);
    }
    let third = pools.fire(&mut world, PoolKind::WizardLight, shot, 0.0, &mut rng).unwrap();
    assert_eq!(third, first);
}

#[test]
fn test_projectile_lifetime_expiry() {
    let mut world = World::new();
    let pools = Pools::spawn(&mut world, &[PoolKind::WizardLight]);
    let mut rng = rand::rngs::mock::StepRng::new(0, 1);
    let shot = Shot {
        shooter: None,
        position: Vec2::new(-9.0, 0.0),
        aim_at: None,
    };
    let slot = pools
        .fire(&mut world, PoolKind::WizardLight, shot, 0.0, &mut rng)
        .unwrap();

    let mut time = SimTime::default();
    for _ in 0..100 {
        time.advance(DT);
        projectiles::run(&mut world, &time);
    }
    assert!(world.get::<&Projectile>(slot).unwrap().active);
    assert!(world.get::<&Position>(slot).unwrap().0.x > -9.0);

    for _ in 0..30 {
        time.advance(DT);
        projectiles::run(&mut world, &time);
    }
    assert!(!world.get::<&Projectile>(slot).unwrap().active);
    assert_eq!(world.get::<&Position>(slot).unwrap().0, OFF_STAGE);
}

#[test]
fn test_player_light_attack_spends_resource() {
    let mut engine = EncounterEngine::new(SimConfig::default());
    let inputs = [
        PlayerInput {
            light: true,
            ..Default::default()
        },
        PlayerInput::idle(),
    ];
    let snap = engine.tick(inputs);
    assert!(snap.cues.contains(&Cue::PlayerAttack {
        player: PlayerSlot::Wizard,
        heavy: false
    }));
    let pool = engine.pools().get(PoolKind::WizardLight).unwrap();
    assert_eq!(pool.active_count(engine.world()), 1);
    assert!(player(&engine, PlayerSlot::Wizard).resource < PLAYER_MAX_RESOURCE);
}

// ---- Solo ----

#[test]
fn test_solo_partner_is_inert() {
    let mut engine = EncounterEngine::new(SimConfig {
        solo: Some(PlayerSlot::Wizard),
        tuning: quick_hurt(),
        ..Default::default()
    });
    let snap = engine.tick(idle());
    let warrior_view = &snap.players[PlayerSlot::Warrior.index()];
    assert!(!warrior_view.active);
    assert!(!warrior_view.visible);

    let wizard_at = position_of(&engine, engine.player_entity(PlayerSlot::Wizard));
    let warrior_at = position_of(&engine, engine.player_entity(PlayerSlot::Warrior));
    assert_eq!(wizard_at, warrior_at);

    // A shot at the shared spot only ever hurts the active player.
    let snapshots = kill_wizard(&mut engine);
    assert_eq!(engine.state(), SessionState::GameOver);
    assert_eq!(
        player(&engine, PlayerSlot::Warrior).vitals.health,
        PLAYER_MAX_HEALTH
    );
    assert_eq!(
        count_cues(&snapshots, |c| *c
            == Cue::Hurt {
                target: Actor::Player(PlayerSlot::Warrior)
            }),
        0
    );
}

// ---- Boss death: win ----

#[test]
fn test_boss_death_leads_to_win() {
    let tuning = Tuning::default().with_boss_max_health(BossKind::ByleSlime, 100.0);
    let mut engine = engine_with(BossKind::ByleSlime, tuning);
    engine.tick(idle());

    let snapshots = kill_boss(&mut engine);
    assert_eq!(engine.state(), SessionState::GameOver);
    assert_eq!(
        count_cues(&snapshots, |c| matches!(c, Cue::Death { target: Actor::Boss(_) })),
        1
    );
    assert!(boss(&engine).is_dead());
    assert_eq!(engine.session().damage_dealt, [100.0, 0.0]);

    let last = snapshots.last().unwrap();
    let game_over = last.game_over.as_ref().unwrap();
    assert!(game_over.win);
    assert_eq!(game_over.stage, GameOverStage::Frozen);
    assert_eq!(game_over.dying, Actor::Boss(BossKind::ByleSlime));
    // Only the dying boss and the killing blow stay on screen.
    assert!(last.boss.visible);
    assert!(last.players.iter().all(|p| !p.visible));
    assert_eq!(last.projectiles.len(), 1);
    assert!(last.projectiles[0].frozen);

    let sequence = run_to_outcome(&mut engine);
    assert_eq!(count_cues(&sequence, |c| matches!(c, Cue::Explosion { .. })), 1);
    assert_eq!(
        count_cues(&sequence, |c| *c
            == Cue::Outcome {
                win: true,
                final_encounter: false
            }),
        1
    );
    let last = sequence.last().unwrap();
    assert!(!last.boss.visible);
    assert!(last.projectiles.is_empty());
    // Explosion at +2 s, outcome at +4 s.
    let ticks = sequence.len() as i64;
    assert!((ticks - 240).abs() <= 2, "outcome after {ticks} ticks");
}

#[test]
fn test_lethal_hits_in_one_tick_end_once() {
    let tuning = Tuning::default().with_boss_max_health(BossKind::ByleSlime, 6.0);
    let mut engine = engine_with(BossKind::ByleSlime, tuning);
    engine.tick(idle());

    let wizard = engine.player_entity(PlayerSlot::Wizard);
    let at = position_of(&engine, engine.boss_entity());
    engine.fire_test_projectile(PoolKind::WizardHeavy, wizard, at);
    engine.fire_test_projectile(PoolKind::WizardHeavy, wizard, at);
    let snap = engine.tick(idle());

    assert_eq!(snap.state, SessionState::GameOver);
    assert_eq!(
        snap.cues
            .iter()
            .filter(|c| matches!(c, Cue::Death { .. }))
            .count(),
        1
    );
    assert_eq!(engine.session().damage_dealt[0], 6.0);
}

#[test]
fn test_win_advances_to_next_boss() {
    let tuning = Tuning::default().with_boss_max_health(BossKind::ByleSlime, 12.0);
    let mut engine = engine_with(BossKind::ByleSlime, tuning);
    engine.tick(idle());
    kill_boss(&mut engine);
    run_to_outcome(&mut engine);

    engine.queue_command(SessionCommand::Continue);
    let snap = engine.tick(idle());
    assert_eq!(snap.exit, Some(SessionExit::NextEncounter(BossKind::GiantCrab)));
    assert!(snap.cues.contains(&Cue::EncounterLoaded {
        boss: BossKind::GiantCrab
    }));
    assert_eq!(engine.boss_kind(), BossKind::GiantCrab);
    assert_eq!(snap.boss.kind, BossKind::GiantCrab);
    assert_eq!(snap.boss.health, GIANT_CRAB_MAX_HEALTH);
    assert!(snap.game_over.is_none());

    // The exit is reported once.
    let next = engine.tick(idle());
    assert!(next.exit.is_none());
    assert!(engine.exit().is_none());
}

#[test]
fn test_final_win_completes_the_run() {
    let tuning = Tuning::default().with_boss_max_health(BossKind::PossessedKing, 6.0);
    let mut engine = engine_with(BossKind::PossessedKing, tuning);
    engine.tick(idle());
    start_fight(&mut engine);
    kill_boss(&mut engine);
    let sequence = run_to_outcome(&mut engine);
    assert_eq!(
        count_cues(&sequence, |c| *c
            == Cue::Outcome {
                win: true,
                final_encounter: true
            }),
        1
    );

    engine.queue_command(SessionCommand::Continue);
    let snap = engine.tick(idle());
    assert_eq!(snap.exit, Some(SessionExit::GameComplete));
    assert_eq!(engine.exit(), Some(SessionExit::GameComplete));

    engine.queue_command(SessionCommand::Continue);
    let after = engine.tick(idle());
    assert!(after.exit.is_none());
    assert_eq!(engine.boss_kind(), BossKind::PossessedKing);
}

// ---- Player death: loss and retry ----

#[test]
fn test_player_death_leads_to_loss() {
    let mut engine = engine_with(BossKind::ByleSlime, quick_hurt());
    engine.tick(idle());

    let snapshots = kill_wizard(&mut engine);
    assert_eq!(engine.state(), SessionState::GameOver);
    let wizard_target = Actor::Player(PlayerSlot::Wizard);
    assert_eq!(
        count_cues(&snapshots, |c| *c == Cue::Hurt {
            target: wizard_target
        }),
        4
    );
    assert_eq!(
        count_cues(&snapshots, |c| *c == Cue::Death {
            target: wizard_target
        }),
        1
    );

    let game_over = snapshots.last().unwrap().game_over.clone().unwrap();
    assert!(!game_over.win);
    assert_eq!(game_over.dying, wizard_target);

    let sequence = run_to_outcome(&mut engine);
    assert_eq!(
        count_cues(&sequence, |c| *c
            == Cue::Outcome {
                win: false,
                final_encounter: false
            }),
        1
    );
}

#[test]
fn test_retry_resets_the_encounter() {
    let mut engine = engine_with(BossKind::ByleSlime, quick_hurt());
    engine.tick(idle());
    // Some boss damage first so the reset is visible.
    let wizard = engine.player_entity(PlayerSlot::Wizard);
    let at = position_of(&engine, engine.boss_entity());
    engine.fire_test_projectile(PoolKind::WizardHeavy, wizard, at);
    engine.tick(idle());
    assert!(boss(&engine).vitals.health < BYLE_SLIME_MAX_HEALTH);

    kill_wizard(&mut engine);
    run_to_outcome(&mut engine);
    engine.queue_command(SessionCommand::Continue);
    let snap = engine.tick(idle());

    assert_eq!(snap.state, SessionState::Playing);
    assert!(snap.exit.is_none());
    for slot in PlayerSlot::ALL {
        let state = player(&engine, slot);
        assert_eq!(state.vitals.health, PLAYER_MAX_HEALTH);
        assert!(!state.is_dead());
    }
    assert_eq!(
        position_of(&engine, engine.player_entity(PlayerSlot::Wizard)),
        WIZARD_SPAWN
    );
    assert_eq!(boss(&engine).vitals.health, BYLE_SLIME_MAX_HEALTH);
    assert_eq!(engine.pools().active_total(engine.world()), 0);
    assert!(snap.players.iter().all(|p| p.visible));
    assert!(snap.boss.visible);
    assert_eq!(snap.stats.damage_dealt, [0.0, 0.0]);
    assert!(snap.game_over.is_none());
}

// ---- Outcome screen ----

#[test]
fn test_stats_toggle_at_outcome() {
    let mut engine = engine_with(BossKind::ByleSlime, quick_hurt());
    engine.tick(idle());
    kill_wizard(&mut engine);

    // Too early: the outcome is not up yet.
    engine.queue_command(SessionCommand::ToggleStats);
    assert_eq!(engine.tick(idle()).state, SessionState::GameOver);

    run_to_outcome(&mut engine);
    engine.queue_command(SessionCommand::ToggleStats);
    let snap = engine.tick(idle());
    assert_eq!(snap.state, SessionState::Stats);
    assert!(snap.stats.end_time.is_some());

    engine.queue_command(SessionCommand::ToggleStats);
    assert_eq!(engine.tick(idle()).state, SessionState::GameOver);

    // Continue works from the stats view too.
    engine.queue_command(SessionCommand::ToggleStats);
    engine.tick(idle());
    engine.queue_command(SessionCommand::Continue);
    assert_eq!(engine.tick(idle()).state, SessionState::Playing);
}

#[test]
fn test_skip_brings_explosion_forward() {
    let mut engine = engine_with(BossKind::ByleSlime, quick_hurt());
    engine.tick(idle());
    kill_wizard(&mut engine);

    engine.queue_command(SessionCommand::Skip);
    let snap = engine.tick(idle());
    assert!(snap.cues.iter().any(|c| matches!(c, Cue::Explosion { .. })));
    assert_eq!(
        snap.game_over.as_ref().map(|g| g.stage),
        Some(GameOverStage::Exploded)
    );
    assert!(snap.players.iter().all(|p| !p.visible));
}

#[test]
fn test_quit_from_outcome_exits_to_menu() {
    let mut engine = engine_with(BossKind::ByleSlime, quick_hurt());
    engine.tick(idle());
    kill_wizard(&mut engine);
    run_to_outcome(&mut engine);

    engine.queue_command(SessionCommand::Quit);
    let snap = engine.tick(idle());
    assert_eq!(snap.exit, Some(SessionExit::Menu));
    assert_eq!(engine.exit(), Some(SessionExit::Menu));
}

#[test]
fn test_snapshot_serializes() {
    let mut engine = EncounterEngine::new(SimConfig::default());
    let snap = engine.tick(idle());
    let json = serde_json::to_string(&snap).unwrap();
    assert!(json.len() < 100 * 1024);
    let back: EncounterSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.state, SessionState::Playing);
    assert_eq!(back.boss.kind, BossKind::ByleSlime);
}
