//! Vertical shooter: dodge and shoot asteroids
//!
//! All gameplay logic lives here and is deterministic:
//! - Time comes only from `tick` deltas (world clock in ms)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod player;
pub mod state;
pub mod tick;

use glam::Vec2;

pub use entities::{
    ASTEROID_VARIANTS, Aabb, Asteroid, Bomb, Bullet, EnemyBullet, Laser, Ship, SupportItem,
    SupportKind, fan_offsets,
};
pub use player::{DamageOutcome, PlayerState};
pub use state::{ArcadePhase, ArcadeSnapshot, ArcadeWorld, HIGH_SCORE_KEY, recycle_asteroid};
pub use tick::tick;

use crate::GameCore;
use crate::audio::SoundEffect;

impl GameCore for ArcadeWorld {
    type Input = Vec2;
    type Snapshot = ArcadeSnapshot;

    fn tick(&mut self, dt: f32) {
        tick::tick(self, dt);
    }

    fn handle_input(&mut self, pointer: Vec2) {
        if self.is_playing() {
            self.move_ship(pointer);
        }
    }

    fn renderables(&self) -> ArcadeSnapshot {
        self.snapshot()
    }

    fn is_game_over(&self) -> bool {
        self.phase == ArcadePhase::GameOver
    }

    fn is_won(&self) -> bool {
        false
    }

    fn score(&self) -> u64 {
        self.player.score
    }

    fn high_score(&self) -> u64 {
        self.player.high_score
    }

    fn restore_high_score(&mut self, high_score: u64) {
        self.player.high_score = self.player.high_score.max(high_score);
    }

    fn high_score_key(&self) -> &'static str {
        HIGH_SCORE_KEY
    }

    fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }

    fn pause(&mut self) {
        if self.phase == ArcadePhase::Playing {
            self.phase = ArcadePhase::Paused;
            log::info!("Arcade: paused at {:.0} ms", self.now_ms);
        }
    }

    /// Resuming is a fresh start for transient entities; the player carries over
    fn resume(&mut self) {
        if self.phase != ArcadePhase::Paused {
            return;
        }
        self.reset_transients();
        self.phase = ArcadePhase::Playing;
        log::info!("Arcade: resumed, transient entities reset");
    }
}
