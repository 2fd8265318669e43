//! Sound cues
//!
//! The cores never play audio. They queue discrete cues that the driver hands
//! to whatever `AudioSink` the platform provides.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Player auto-fire (bullets or bombs)
    Shoot,
    /// Asteroid destroyed or bomb detonated
    Explosion,
    /// Player took a hit (shield or HP)
    PlayerHit,
    /// Support item collected
    PickupCollect,
    /// Tiles slid without merging
    TileSlide,
    /// At least one pair of tiles merged
    TileMerge,
    /// Winning tile reached
    Win,
    /// Run ended
    GameOver,
}

/// Audio collaborator
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every cue (tests, muted sessions)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Writes cues to the log instead of a speaker (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio {
    muted: bool,
    played: u64,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of cues played so far
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        self.played += 1;
        log::trace!("sound cue: {:?}", effect);
    }
}

/// Keeps every cue in order (assertions in tests)
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub cues: Vec<SoundEffect>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.cues.push(effect);
    }
}
