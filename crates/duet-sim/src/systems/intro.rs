//! Intro system: plays the boss's scripted intro, then starts the fight.

use log::info;

use duet_boss_ai::intro::IntroPlayer;
use duet_core::enums::BossKind;
use duet_core::events::Cue;
use duet_core::types::SimTime;

use crate::session::Session;

pub fn run(
    intro: &mut IntroPlayer,
    boss: BossKind,
    session: &mut Session,
    time: &SimTime,
    cues: &mut Vec<Cue>,
) {
    if intro.advance(time.dt, cues) && session.begin_playing(time.now) {
        info!("{boss:?} fight started");
        cues.push(Cue::FightStarted { boss });
    }
}
