//! Arcade world state and spawners
//!
//! The world owns every entity collection plus the player. Asteroids form a
//! fixed pool: they are recycled to the top of the screen, never removed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{
    ASTEROID_VARIANTS, Asteroid, Bomb, Bullet, EnemyBullet, Laser, Ship, SupportItem, SupportKind,
    fan_offsets,
};
use super::player::PlayerState;
use crate::audio::SoundEffect;
use crate::settings::ArcadeSettings;

/// Storage key for the arcade high score
pub const HIGH_SCORE_KEY: &str = "arcade_high_score";

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcadePhase {
    Playing,
    Paused,
    GameOver,
}

/// Read-only view of one frame for the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArcadeSnapshot {
    pub screen: Vec2,
    pub background_offset: f32,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub lasers: Vec<Laser>,
    pub bombs: Vec<Bomb>,
    pub pickups: Vec<SupportItem>,
    pub player: PlayerState,
    pub game_over: bool,
}

/// Shooter mode simulation state
#[derive(Debug, Clone)]
pub struct ArcadeWorld {
    pub settings: ArcadeSettings,
    pub(crate) rng: Pcg32,
    /// World clock (ms), advanced only by ticks
    pub now_ms: f64,
    pub phase: ArcadePhase,
    /// Cosmetic background scroll, wraps at the texture height
    pub background_offset: f32,
    pub ship: Ship,
    pub player: PlayerState,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub lasers: Vec<Laser>,
    pub bombs: Vec<Bomb>,
    pub pickups: Vec<SupportItem>,
    /// Next auto-fire time
    pub next_fire_ms: f64,
    /// Next pickup spawn time
    pub next_pickup_ms: f64,
    pub(crate) sounds: Vec<SoundEffect>,
}

/// Uniform center x keeping an entity of `size` fully on a screen of `width`
fn random_x(rng: &mut Pcg32, width: f32, size: f32) -> f32 {
    let half = size / 2.0;
    rng.random_range(half..=(width - half).max(half))
}

/// Send an asteroid back above the top edge with a fresh x and no damage
pub fn recycle_asteroid(asteroid: &mut Asteroid, rng: &mut Pcg32, width: f32) {
    asteroid.pos.x = random_x(rng, width, asteroid.size);
    asteroid.pos.y = -asteroid.size / 2.0;
    asteroid.hit_count = 0;
}

impl ArcadeWorld {
    /// Create a world and run the initial asteroid burst
    pub fn new(settings: ArcadeSettings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let ship_size = settings.player_size();
        let ship = Ship {
            pos: Vec2::new(
                settings.screen_width / 2.0,
                settings.screen_height - ship_size * 1.5,
            ),
            size: ship_size,
        };
        let player = PlayerState::new(settings.starting_hp, settings.max_hp);
        let next_pickup_ms = settings.pickup_interval_ms;

        let mut world = Self {
            settings,
            rng: Pcg32::seed_from_u64(seed),
            now_ms: 0.0,
            phase: ArcadePhase::Playing,
            background_offset: 0.0,
            ship,
            player,
            asteroids: Vec::new(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            lasers: Vec::new(),
            bombs: Vec::new(),
            pickups: Vec::new(),
            next_fire_ms: 0.0,
            next_pickup_ms,
            sounds: Vec::new(),
        };
        world.spawn_initial_asteroids();
        world
    }

    /// World with no asteroids (tests place entities by hand)
    pub fn empty(settings: ArcadeSettings, seed: u64) -> Self {
        let mut world = Self::new(
            ArcadeSettings {
                initial_asteroids: 0,
                ..settings.clone()
            },
            seed,
        );
        world.settings = settings.sanitized();
        world
    }

    pub fn width(&self) -> f32 {
        self.settings.screen_width
    }

    pub fn height(&self) -> f32 {
        self.settings.screen_height
    }

    pub fn is_playing(&self) -> bool {
        self.phase == ArcadePhase::Playing
    }

    pub(crate) fn spawn_initial_asteroids(&mut self) {
        for _ in 0..self.settings.initial_asteroids {
            let asteroid = self.new_asteroid();
            self.asteroids.push(asteroid);
        }
        log::debug!("Spawned {} asteroids", self.asteroids.len());
    }

    /// Roll a new asteroid just above the top edge
    pub fn new_asteroid(&mut self) -> Asteroid {
        let size = self.settings.asteroid_size();
        let width = self.width();
        let x = random_x(&mut self.rng, width, size);
        let speed = self
            .rng
            .random_range(self.settings.asteroid_min_speed..=self.settings.asteroid_max_speed);
        let can_shoot = self.rng.random_bool(self.settings.shooter_chance);
        let variant = self.rng.random_range(0..ASTEROID_VARIANTS);
        Asteroid {
            pos: Vec2::new(x, -size),
            size,
            speed,
            hit_count: 0,
            can_shoot,
            last_shot_ms: self.now_ms,
            variant,
        }
    }

    /// Recycle the asteroid at `index`
    pub fn recycle(&mut self, index: usize) {
        let width = self.width();
        recycle_asteroid(&mut self.asteroids[index], &mut self.rng, width);
    }

    /// Spawn a random-kind pickup above the top edge
    pub fn spawn_pickup(&mut self) {
        let size = self.settings.pickup_size();
        let width = self.width();
        let x = random_x(&mut self.rng, width, size);
        let speed = self
            .rng
            .random_range(self.settings.pickup_min_speed..=self.settings.pickup_max_speed);
        let kind = SupportKind::ALL[self.rng.random_range(0..SupportKind::ALL.len())];
        log::debug!("Pickup spawned: {:?}", kind);
        self.pickups.push(SupportItem {
            pos: Vec2::new(x, -size),
            size,
            speed,
            kind,
        });
    }

    /// Fire the fan pattern for the current bullet level
    pub fn fire_pattern(&mut self) {
        let muzzle = self.muzzle();
        for &dx in fan_offsets(self.player.bullet_level) {
            self.bullets.push(Bullet {
                pos: Vec2::new(muzzle.x + dx, muzzle.y),
                speed: self.settings.bullet_speed,
                size: self.settings.bullet_size,
            });
        }
    }

    pub fn fire_big_bullet(&mut self) {
        let muzzle = self.muzzle();
        self.bullets.push(Bullet {
            pos: muzzle,
            speed: self.settings.big_bullet_speed,
            size: self.settings.big_bullet_size,
        });
    }

    pub fn fire_laser(&mut self) {
        self.lasers.push(Laser {
            pos: self.muzzle(),
            width: self.settings.laser_width,
            spawn_ms: self.now_ms,
            duration_ms: self.settings.laser_duration_ms,
        });
    }

    pub fn fire_bomb(&mut self) {
        self.bombs.push(Bomb {
            pos: self.ship.pos,
            size: self.settings.bomb_size,
            speed: self.settings.bomb_speed,
            is_exploded: false,
            explode_radius: 0.0,
            explode_ms: 0.0,
        });
    }

    /// Top-center of the ship
    fn muzzle(&self) -> Vec2 {
        Vec2::new(self.ship.pos.x, self.ship.pos.y - self.ship.size / 2.0)
    }

    /// Apply a collected pickup
    pub fn apply_pickup(&mut self, kind: SupportKind) {
        match kind {
            SupportKind::BulletUpgrade => self.player.upgrade_bullets(self.settings.max_bullet_level),
            SupportKind::BigBullet => self.fire_big_bullet(),
            SupportKind::Laser => self.fire_laser(),
            SupportKind::Bomb => self
                .player
                .activate_bomb_mode(self.now_ms, self.settings.bomb_mode_ms),
            SupportKind::Shield => self.player.activate_shield(self.settings.shield_charges),
            SupportKind::Heart => self.player.heal(1),
            SupportKind::Coin => self.player.add_coin(1),
        }
        self.sounds.push(SoundEffect::PickupCollect);
        log::debug!("Pickup collected: {:?}", kind);
    }

    /// Award points for an asteroid destroyed by a player weapon
    pub(crate) fn award_destroy(&mut self) {
        self.player.add_score(self.settings.asteroid_score);
        self.sounds.push(SoundEffect::Explosion);
    }

    /// Terminal transition; further ticks are no-ops
    pub fn end_run(&mut self) {
        if self.phase == ArcadePhase::GameOver {
            return;
        }
        self.phase = ArcadePhase::GameOver;
        self.sounds.push(SoundEffect::GameOver);
        log::info!(
            "Arcade: game over, score {} (kills {}, coins {})",
            self.player.score,
            self.player.kill_count,
            self.player.coin_count
        );
    }

    /// Move the ship to the pointer, kept fully on screen
    pub fn move_ship(&mut self, pointer: Vec2) {
        let half = self.ship.size / 2.0;
        self.ship.pos = Vec2::new(
            pointer.x.clamp(half, (self.width() - half).max(half)),
            pointer.y.clamp(half, (self.height() - half).max(half)),
        );
    }

    /// Drop transient entities and timers, then re-run the opening burst
    pub fn reset_transients(&mut self) {
        self.asteroids.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.lasers.clear();
        self.bombs.clear();
        self.pickups.clear();
        self.next_fire_ms = self.now_ms;
        self.next_pickup_ms = self.now_ms + self.settings.pickup_interval_ms;
        self.spawn_initial_asteroids();
    }

    pub fn snapshot(&self) -> ArcadeSnapshot {
        ArcadeSnapshot {
            screen: Vec2::new(self.width(), self.height()),
            background_offset: self.background_offset,
            ship: self.ship.clone(),
            asteroids: self.asteroids.clone(),
            bullets: self.bullets.clone(),
            enemy_bullets: self.enemy_bullets.clone(),
            lasers: self.lasers.clone(),
            bombs: self.bombs.clone(),
            pickups: self.pickups.clone(),
            player: self.player.clone(),
            game_over: self.phase == ArcadePhase::GameOver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_burst() {
        let settings = ArcadeSettings {
            screen_width: 800.0,
            screen_height: 1200.0,
            ..Default::default()
        };
        let world = ArcadeWorld::new(settings, 12345);
        assert_eq!(world.asteroids.len(), 5);
        for a in &world.asteroids {
            assert!((a.size - 120.0).abs() < 0.001);
            assert!(a.pos.x >= a.size / 2.0 && a.pos.x <= 800.0 - a.size / 2.0);
            assert_eq!(a.pos.y, -a.size);
            assert!((200.0..=400.0).contains(&a.speed));
            assert!(a.variant < ASTEROID_VARIANTS);
            assert_eq!(a.hit_count, 0);
        }
    }

    #[test]
    fn test_shooter_chance_extremes() {
        let never = ArcadeWorld::new(
            ArcadeSettings {
                shooter_chance: 0.0,
                ..Default::default()
            },
            1,
        );
        assert!(never.asteroids.iter().all(|a| !a.can_shoot));

        let always = ArcadeWorld::new(
            ArcadeSettings {
                shooter_chance: 1.0,
                ..Default::default()
            },
            1,
        );
        assert!(always.asteroids.iter().all(|a| a.can_shoot));
    }

    #[test]
    fn test_fan_pattern_level_three() {
        let mut world = ArcadeWorld::empty(ArcadeSettings::default(), 3);
        world.player.bullet_level = 3;
        world.fire_pattern();
        let mut offsets: Vec<f32> = world.bullets.iter().map(|b| b.pos.x - world.ship.pos.x).collect();
        offsets.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(offsets, vec![-30.0, 0.0, 30.0]);
    }

    #[test]
    fn test_pickup_effects() {
        let mut world = ArcadeWorld::empty(ArcadeSettings::default(), 3);
        world.player.current_hp = 2;

        world.apply_pickup(SupportKind::BulletUpgrade);
        world.apply_pickup(SupportKind::Heart);
        world.apply_pickup(SupportKind::Shield);
        world.apply_pickup(SupportKind::Coin);
        world.apply_pickup(SupportKind::Bomb);
        world.apply_pickup(SupportKind::BigBullet);
        world.apply_pickup(SupportKind::Laser);

        assert_eq!(world.player.bullet_level, 2);
        assert_eq!(world.player.current_hp, 3);
        assert_eq!(world.player.shield_count, 3);
        assert_eq!(world.player.coin_count, 1);
        assert!(world.player.bomb_mode);
        assert_eq!(world.player.bomb_mode_until_ms, 10_000.0);
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.bullets[0].size, world.settings.big_bullet_size);
        assert_eq!(world.lasers.len(), 1);
    }

    #[test]
    fn test_move_ship_clamps_to_screen() {
        let mut world = ArcadeWorld::empty(ArcadeSettings::default(), 3);
        world.move_ship(Vec2::new(-500.0, 99_999.0));
        let half = world.ship.size / 2.0;
        assert_eq!(world.ship.pos, Vec2::new(half, world.height() - half));
    }

    #[test]
    fn test_recycle_resets_position_and_hits() {
        let mut world = ArcadeWorld::new(ArcadeSettings::default(), 8);
        world.asteroids[0].pos.y = 700.0;
        world.asteroids[0].hit_count = 2;
        world.recycle(0);
        let a = &world.asteroids[0];
        assert_eq!(a.pos.y, -a.size / 2.0);
        assert_eq!(a.hit_count, 0);
        assert_eq!(world.asteroids.len(), 5);
    }

    #[test]
    fn test_reversed_speed_range_and_bad_chance_still_spawn() {
        let settings = ArcadeSettings {
            asteroid_min_speed: 500.0,
            shooter_chance: 2.0,
            max_bullet_level: 0,
            ..Default::default()
        };
        let world = ArcadeWorld::new(settings, 8);
        assert_eq!(world.asteroids.len(), 5);
        assert!(world.asteroids.iter().all(|a| (400.0..=500.0).contains(&a.speed)));
        assert!(world.asteroids.iter().all(|a| a.can_shoot));
        assert_eq!(world.settings.max_bullet_level, 1);
    }
}
