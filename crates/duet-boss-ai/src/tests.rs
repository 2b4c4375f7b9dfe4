#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use duet_core::constants::*;
    use duet_core::enums::{BossKind, BossPhase, PhaseRole, PlayerSlot};
    use duet_core::events::Cue;

    use crate::fsm::PhaseScheduler;
    use crate::intro::{intro_script, IntroPlayer};
    use crate::profiles::get_profile;
    use crate::selection::{draw_attack, select_next, SelectionRule, SelectionState};
    use crate::targeting::pick_target;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    /// Run a scheduler at full health and collect every phase it switches to.
    fn collect_phases(kind: BossKind, ticks: usize, health_ratio: f32) -> Vec<BossPhase> {
        let mut rng = rng(7);
        let mut scheduler = PhaseScheduler::new(kind, &mut rng);
        let mut phases = vec![scheduler.phase()];
        for _ in 0..ticks {
            let tick = scheduler.advance(DT, health_ratio, &mut rng);
            if tick.changed {
                phases.push(tick.phase);
            }
        }
        phases
    }

    fn attacks_only(kind: BossKind, phases: &[BossPhase]) -> Vec<BossPhase> {
        let profile = get_profile(kind);
        phases
            .iter()
            .copied()
            .filter(|&p| profile.role(p) == PhaseRole::Attack)
            .collect()
    }

    // ---- Targeting ----

    #[test]
    fn test_targeting_uniform_above_half() {
        let mut rng = rng(1);
        let trials = 10_000;
        let wizard = (0..trials)
            .filter(|_| pick_target(0.8, [1.0, 5.0], &mut rng) == PlayerSlot::Wizard)
            .count();
        let share = wizard as f32 / trials as f32;
        assert!((0.45..0.55).contains(&share), "wizard share {share}");
    }

    #[test]
    fn test_targeting_focuses_weaker_at_half() {
        let mut rng = rng(2);
        for _ in 0..500 {
            assert_eq!(pick_target(0.5, [2.0, 4.0], &mut rng), PlayerSlot::Wizard);
            assert_eq!(pick_target(0.1, [5.0, 1.0], &mut rng), PlayerSlot::Warrior);
        }
    }

    #[test]
    fn test_targeting_tie_is_uniform() {
        let mut rng = rng(3);
        let trials = 10_000;
        let wizard = (0..trials)
            .filter(|_| pick_target(0.2, [3.0, 3.0], &mut rng) == PlayerSlot::Wizard)
            .count();
        let share = wizard as f32 / trials as f32;
        assert!((0.45..0.55).contains(&share), "wizard share {share}");
    }

    // ---- Selection ----

    #[test]
    fn test_draw_attack_never_repeats() {
        let mut rng = rng(4);
        let attacks = [BossPhase::Crown, BossPhase::FalseHeavy, BossPhase::CoinBurst];
        let mut last = None;
        for _ in 0..1000 {
            let next = draw_attack(&attacks, last, &mut rng).unwrap();
            assert_ne!(Some(next), last);
            last = Some(next);
        }
    }

    #[test]
    fn test_draw_attack_single_and_empty() {
        let mut rng = rng(5);
        assert_eq!(draw_attack(&[], None, &mut rng), None);
        assert_eq!(
            draw_attack(&[BossPhase::Claw], Some(BossPhase::Claw), &mut rng),
            Some(BossPhase::Claw)
        );
    }

    #[test]
    fn test_forced_reposition_after_three_attacks() {
        let mut rng = rng(6);
        let rule = SelectionRule::ForcedReposition {
            movement: BossPhase::Jump,
            after: 3,
            chance: 0.0,
        };
        let attacks = [BossPhase::SlimeBall, BossPhase::Bubble, BossPhase::BabySlime];
        let mut state = SelectionState {
            current: BossPhase::Jump,
            last_attack: None,
            attacks_since_movement: 0,
        };
        let drawn: Vec<_> = (0..8)
            .map(|_| select_next(&rule, &attacks, &mut state, &mut rng).unwrap())
            .collect();
        assert_eq!(drawn[3], BossPhase::Jump);
        assert_eq!(drawn[7], BossPhase::Jump);
        assert!(drawn[..3].iter().all(|&p| p != BossPhase::Jump));
    }

    #[test]
    fn test_alternate_movement() {
        let mut rng = rng(8);
        let rule = SelectionRule::AlternateMovement {
            movement: BossPhase::Walk,
        };
        let attacks = [BossPhase::Claw, BossPhase::Water, BossPhase::Sand];
        let mut state = SelectionState {
            current: BossPhase::Walk,
            last_attack: None,
            attacks_since_movement: 0,
        };
        for i in 0..20 {
            let next = select_next(&rule, &attacks, &mut state, &mut rng).unwrap();
            if i % 2 == 0 {
                assert_ne!(next, BossPhase::Walk);
            } else {
                assert_eq!(next, BossPhase::Walk);
            }
        }
    }

    // ---- Scheduler ----

    #[test]
    fn test_no_boss_repeats_an_attack() {
        for kind in BossKind::ORDER {
            let phases = collect_phases(kind, 60 * 120, 1.0);
            let attacks = attacks_only(kind, &phases);
            assert!(attacks.len() > 10, "{kind:?} drew only {} attacks", attacks.len());
            for pair in attacks.windows(2) {
                assert_ne!(pair[0], pair[1], "{kind:?} repeated {:?}", pair[0]);
            }
        }
    }

    #[test]
    fn test_slime_first_phase_is_jump() {
        let mut rng = rng(9);
        let mut scheduler = PhaseScheduler::new(BossKind::ByleSlime, &mut rng);
        let tick = scheduler.advance(DT, 1.0, &mut rng);
        assert!(tick.changed);
        assert_eq!(tick.phase, BossPhase::Jump);
        assert!(tick.active);
    }

    #[test]
    fn test_slime_jumps_at_least_every_fourth_phase() {
        let phases = collect_phases(BossKind::ByleSlime, 60 * 120, 1.0);
        let mut since_jump = 0;
        for phase in phases {
            if phase == BossPhase::Jump {
                since_jump = 0;
            } else {
                since_jump += 1;
                assert!(since_jump <= SLIME_FORCED_JUMP_AFTER);
            }
        }
    }

    #[test]
    fn test_crab_alternates_walk() {
        let phases = collect_phases(BossKind::GiantCrab, 60 * 60, 1.0);
        assert_eq!(phases[0], BossPhase::Walk);
        for (i, phase) in phases.iter().enumerate() {
            assert_eq!(*phase == BossPhase::Walk, i % 2 == 0, "index {i}: {phase:?}");
        }
    }

    #[test]
    fn test_crab_phase_length_at_full_health() {
        let mut rng = rng(10);
        let mut scheduler = PhaseScheduler::new(BossKind::GiantCrab, &mut rng);
        let mut first_change = None;
        for tick in 1..=200 {
            if scheduler.advance(DT, 1.0, &mut rng).changed {
                first_change = Some(tick);
                break;
            }
        }
        // One phase is two seconds at desperation 1.
        let tick = first_change.unwrap();
        assert!((119..=121).contains(&tick), "changed at tick {tick}");
    }

    #[test]
    fn test_desperation_shortens_phases() {
        let full = collect_phases(BossKind::GiantCrab, 60 * 30, 1.0).len();
        let low = collect_phases(BossKind::GiantCrab, 60 * 30, 0.0).len();
        assert!(low > full, "{low} phases at 0% vs {full} at 100%");
    }

    #[test]
    fn test_desperation_ranges() {
        for kind in BossKind::ORDER {
            let curve = get_profile(kind).desperation;
            assert_eq!(curve.at(1.0), 1.0);
            assert!(curve.at(0.0) <= DESPERATION_CAP);
        }
        assert_eq!(get_profile(BossKind::GiantCrab).desperation.at(0.0), 2.0);
        assert_eq!(get_profile(BossKind::ByleSlime).desperation.at(0.0), 1.5);
    }

    #[test]
    fn test_king_cooldown_gates_body() {
        let mut rng = rng(11);
        let mut scheduler = PhaseScheduler::new(BossKind::PossessedKing, &mut rng);
        assert!(scheduler.timer() < 0.0, "opening draw applies the cooldown");

        let mut inactive_ticks = 0;
        loop {
            let tick = scheduler.advance(DT, 1.0, &mut rng);
            if tick.active {
                break;
            }
            inactive_ticks += 1;
            assert!(inactive_ticks < 200);
        }
        // One second of cooldown at desperation 1.
        assert!((58..=61).contains(&inactive_ticks), "{inactive_ticks}");
    }

    #[test]
    fn test_king_switches_after_phase_length() {
        let mut rng = rng(12);
        let mut scheduler = PhaseScheduler::new(BossKind::PossessedKing, &mut rng);
        let first = scheduler.phase();
        let length = get_profile(BossKind::PossessedKing)
            .spec(first)
            .unwrap()
            .length;
        let expected = ((KING_PHASE_COOLDOWN + length) / DT).round() as i32;
        let mut ticks = 0;
        loop {
            ticks += 1;
            if scheduler.advance(DT, 1.0, &mut rng).changed {
                break;
            }
        }
        assert!((ticks - expected).abs() <= 1, "{ticks} vs {expected}");
        assert_ne!(scheduler.phase(), first);
    }

    #[test]
    fn test_hold_pins_timer() {
        let mut rng = rng(13);
        let mut scheduler = PhaseScheduler::new(BossKind::GiantCrab, &mut rng);
        for _ in 0..500 {
            scheduler.advance(DT, 1.0, &mut rng);
            scheduler.hold();
        }
        assert_eq!(scheduler.timer(), 0.0);
        assert_eq!(scheduler.phase(), BossPhase::Walk);
    }

    #[test]
    fn test_reset_restores_opening() {
        let mut rng = rng(14);
        let mut scheduler = PhaseScheduler::new(BossKind::ByleSlime, &mut rng);
        for _ in 0..1000 {
            scheduler.advance(DT, 0.3, &mut rng);
        }
        let last = scheduler.last_attack();
        assert!(last.is_some());
        scheduler.reset(&mut rng);
        assert_eq!(scheduler.phase(), BossPhase::Jump);
        assert_eq!(scheduler.timer(), 1.0);
        assert_eq!(scheduler.last_attack(), last);
        assert_eq!(scheduler.desperation(), 1.0);
    }

    #[test]
    fn test_king_reset_avoids_last_attack() {
        for seed in 0..20 {
            let mut rng = rng(seed);
            let mut scheduler = PhaseScheduler::new(BossKind::PossessedKing, &mut rng);
            for _ in 0..500 {
                scheduler.advance(DT, 1.0, &mut rng);
            }
            let last = scheduler.last_attack().unwrap();
            scheduler.reset(&mut rng);
            assert_ne!(scheduler.phase(), last);
            assert_eq!(scheduler.last_attack(), Some(scheduler.phase()));
        }
    }

    // ---- Intro ----

    #[test]
    fn test_slime_and_crab_skip_intro() {
        for kind in [BossKind::ByleSlime, BossKind::GiantCrab] {
            let mut player = IntroPlayer::new(kind);
            let mut cues = Vec::new();
            assert!(player.advance(DT, &mut cues));
            assert!(cues.is_empty());
        }
    }

    #[test]
    fn test_king_intro_timing() {
        let script = intro_script(BossKind::PossessedKing);
        assert_eq!(script.ends_at, 10.0);
        let noises = script
            .cues
            .iter()
            .filter(|(_, cue)| *cue == Cue::IntroNoise)
            .count();
        assert_eq!(noises, 13);

        let mut player = IntroPlayer::new(BossKind::PossessedKing);
        let mut cues = Vec::new();
        let mut finished_at = None;
        for tick in 0..(60 * 11) {
            if player.advance(DT, &mut cues) {
                finished_at = Some(tick);
                break;
            }
            if tick == 0 {
                assert_eq!(
                    cues,
                    vec![
                        Cue::IntroAnimation {
                            boss: BossKind::PossessedKing
                        },
                        Cue::IntroFloat
                    ]
                );
            }
        }
        let finished_at = finished_at.unwrap();
        assert!((599..=602).contains(&finished_at), "{finished_at}");
        assert_eq!(cues.len(), script.cues.len());
    }

    #[test]
    fn test_intro_finish_skips_remaining_cues() {
        let mut player = IntroPlayer::new(BossKind::PossessedKing);
        let mut cues = Vec::new();
        player.advance(DT, &mut cues);
        player.finish();
        cues.clear();
        assert!(player.advance(DT, &mut cues));
        assert!(cues.is_empty());
    }
}
