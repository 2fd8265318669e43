//! PixFuse - a two-mode arcade game core
//!
//! Core modules:
//! - `puzzle`: 2048-style sliding tile board and its game manager
//! - `arcade`: Asteroid shooter world (entities, spawning, collisions, player state)
//! - `driver`: Fixed-rate cooperative driver shared by both modes
//! - `audio`: Sound cues emitted by the cores for an external player
//! - `highscores`: High score persistence collaborators
//! - `settings`: Data-driven game balance
//!
//! Rendering, UI navigation and gesture decoding live outside this crate. The
//! cores only consume resolved input and hand back renderable snapshots.

pub mod arcade;
pub mod audio;
pub mod driver;
pub mod highscores;
pub mod puzzle;
pub mod settings;

pub use arcade::ArcadeWorld;
pub use audio::{AudioSink, SoundEffect};
pub use driver::Driver;
pub use highscores::{HighScoreStore, JsonFileStore, MemoryStore};
pub use puzzle::{Direction, GameManager};
pub use settings::{ArcadeSettings, PuzzleSettings, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the driver's target cadence)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta the driver will accept (stalled driver guard)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Largest delta a single tick will simulate
    pub const MAX_TICK_DT: f32 = 0.1;
}

/// Sanitize a tick delta: NaN and negative values become 0, large stalls are clamped.
#[inline]
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        0.0
    } else {
        dt.min(consts::MAX_TICK_DT)
    }
}

/// One simulation core as seen by the driver and the navigation layer.
///
/// Both game modes implement this. The driver calls `tick` sequentially at a
/// fixed cadence; input and snapshot reads happen between ticks.
pub trait GameCore {
    /// Resolved input (a swipe direction or a pointer position)
    type Input;
    /// Read-only view handed to the rendering collaborator
    type Snapshot;

    /// Advance the world by `dt` seconds.
    fn tick(&mut self, dt: f32);

    /// Apply one resolved input.
    fn handle_input(&mut self, input: Self::Input);

    /// Snapshot of everything the renderer needs.
    fn renderables(&self) -> Self::Snapshot;

    fn is_game_over(&self) -> bool;

    fn is_won(&self) -> bool;

    fn score(&self) -> u64;

    fn high_score(&self) -> u64;

    /// Seed the high score from persistence (never lowers it).
    fn restore_high_score(&mut self, high_score: u64);

    /// Storage key the high score is persisted under.
    fn high_score_key(&self) -> &'static str;

    /// Take the sound cues queued since the last drain.
    fn drain_sounds(&mut self) -> Vec<SoundEffect>;

    /// Stop simulating until `resume` is called.
    fn pause(&mut self);

    fn resume(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(-1.0), 0.0);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
        assert_eq!(clamp_dt(5.0), consts::MAX_TICK_DT);
        assert!((clamp_dt(0.016) - 0.016).abs() < f32::EPSILON);
    }
}
