//! Scripted boss intros: ordered `(time, cue)` lists played against an
//! elapsed-time counter.

use duet_core::enums::BossKind;
use duet_core::events::Cue;

/// Time-keyed cue list plus the moment the fight starts.
#[derive(Debug, Clone, PartialEq)]
pub struct IntroScript {
    pub cues: Vec<(f32, Cue)>,
    pub ends_at: f32,
}

/// The intro each boss plays before the fight.
pub fn intro_script(kind: BossKind) -> IntroScript {
    match kind {
        BossKind::ByleSlime | BossKind::GiantCrab => IntroScript {
            cues: Vec::new(),
            ends_at: 0.0,
        },
        BossKind::PossessedKing => {
            let mut cues = vec![
                (0.0, Cue::IntroAnimation { boss: kind }),
                (0.0, Cue::IntroFloat),
                (1.5, Cue::IntroFloat),
                (4.0, Cue::IntroNoise),
            ];
            // Laughs six times a second.
            for k in 0..12 {
                cues.push((5.0 + k as f32 / 6.0, Cue::IntroNoise));
            }
            cues.push((8.0, Cue::IntroFloat));
            cues.push((9.0, Cue::IntroFloat));
            IntroScript {
                cues,
                ends_at: 10.0,
            }
        }
    }
}

/// Plays an [`IntroScript`] forward one tick at a time.
#[derive(Debug, Clone)]
pub struct IntroPlayer {
    script: IntroScript,
    elapsed: f32,
    next: usize,
    started: bool,
}

impl IntroPlayer {
    pub fn new(kind: BossKind) -> Self {
        Self {
            script: intro_script(kind),
            elapsed: 0.0,
            next: 0,
            started: false,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Emit every cue whose time has come into `out`. The first call covers
    /// time zero. Returns `true` once the script has ended.
    pub fn advance(&mut self, dt: f32, out: &mut Vec<Cue>) -> bool {
        if self.started {
            self.elapsed += dt;
        } else {
            self.started = true;
        }
        while let Some(&(at, cue)) = self.script.cues.get(self.next) {
            if at > self.elapsed {
                break;
            }
            out.push(cue);
            self.next += 1;
        }
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.script.cues.len() && self.elapsed >= self.script.ends_at
    }

    /// Jump to the end, emitting nothing further.
    pub fn finish(&mut self) {
        self.started = true;
        self.next = self.script.cues.len();
        self.elapsed = self.elapsed.max(self.script.ends_at);
    }
}
