//! Game settings and balance
//!
//! Every tunable of both cores lives here. Files may be partial: missing
//! fields fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Puzzle mode tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleSettings {
    /// Board side length (N x N)
    pub board_size: usize,
    /// Tile value that wins the game
    pub win_value: u32,
    /// Probability a spawned tile is a 4 instead of a 2
    pub four_chance: f64,
    /// Slide/merge animation length (seconds)
    pub move_anim_duration: f32,
    /// Spawn pop-in animation length (seconds)
    pub spawn_anim_duration: f32,
    /// Tiles placed when a game starts
    pub starting_tiles: usize,
}

impl Default for PuzzleSettings {
    fn default() -> Self {
        Self {
            board_size: 4,
            win_value: 2048,
            four_chance: 0.1,
            move_anim_duration: 0.15,
            spawn_anim_duration: 0.25,
            starting_tiles: 2,
        }
    }
}

/// Arcade mode tuning. Times are milliseconds, speeds are px/s unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeSettings {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Player side length as a fraction of the shorter screen side
    pub player_size_ratio: f32,
    pub max_hp: i32,
    pub starting_hp: i32,

    // === Background ===
    pub background_scroll_speed: f32,
    /// Height of the background texture (scroll wraps here)
    pub background_height: f32,

    // === Player fire ===
    pub fire_interval_ms: f64,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    pub big_bullet_speed: f32,
    pub big_bullet_size: f32,
    pub laser_width: f32,
    pub laser_duration_ms: f64,
    pub bomb_size: f32,
    pub bomb_speed: f32,
    pub bomb_linger_ms: f64,

    // === Asteroids ===
    pub initial_asteroids: usize,
    /// Asteroid side length as a fraction of the shorter screen side
    pub asteroid_size_ratio: f32,
    pub asteroid_min_speed: f32,
    pub asteroid_max_speed: f32,
    pub shooter_chance: f64,
    /// Bullet hits an asteroid absorbs before it is destroyed
    pub asteroid_hits_to_kill: u32,
    pub asteroid_score: u64,
    /// An asteroid touching the bottom edge ends the run
    pub asteroid_breach_ends_run: bool,

    // === Enemy fire ===
    pub enemy_fire_interval_ms: f64,
    pub enemy_bullet_size: f32,
    /// Pixels per tick, not scaled by dt
    pub enemy_bullet_step: f32,

    // === Pickups ===
    pub pickup_interval_ms: f64,
    /// Pickup side length as a fraction of screen width
    pub pickup_size_ratio: f32,
    pub pickup_min_speed: f32,
    pub pickup_max_speed: f32,

    // === Buffs ===
    pub bomb_mode_ms: f64,
    pub invincible_ms: f64,
    pub shield_charges: u32,
    pub max_bullet_level: u8,
}

impl Default for ArcadeSettings {
    fn default() -> Self {
        Self {
            screen_width: 1080.0,
            screen_height: 1920.0,
            player_size_ratio: 0.12,
            max_hp: 5,
            starting_hp: 3,

            background_scroll_speed: 100.0,
            background_height: 1920.0,

            fire_interval_ms: 500.0,
            bullet_speed: 800.0,
            bullet_size: 20.0,
            big_bullet_speed: 1200.0,
            big_bullet_size: 60.0,
            laser_width: 20.0,
            laser_duration_ms: 300.0,
            bomb_size: 40.0,
            bomb_speed: 500.0,
            bomb_linger_ms: 400.0,

            initial_asteroids: 5,
            asteroid_size_ratio: 0.15,
            asteroid_min_speed: 200.0,
            asteroid_max_speed: 400.0,
            shooter_chance: 0.3,
            asteroid_hits_to_kill: 3,
            asteroid_score: 10,
            asteroid_breach_ends_run: true,

            enemy_fire_interval_ms: 1000.0,
            enemy_bullet_size: 20.0,
            enemy_bullet_step: 12.0,

            pickup_interval_ms: 3000.0,
            pickup_size_ratio: 0.1,
            pickup_min_speed: 150.0,
            pickup_max_speed: 250.0,

            bomb_mode_ms: 10_000.0,
            invincible_ms: 5_000.0,
            shield_charges: 3,
            max_bullet_level: 5,
        }
    }
}

impl PuzzleSettings {
    /// Copy with every field pulled back into a range the game can run with
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        adjust("puzzle", "board_size", &mut self.board_size, |v| v.max(2));
        adjust("puzzle", "four_chance", &mut self.four_chance, |v| probability(v, d.four_chance));
        adjust("puzzle", "move_anim_duration", &mut self.move_anim_duration, |v| {
            positive(v, d.move_anim_duration)
        });
        adjust("puzzle", "spawn_anim_duration", &mut self.spawn_anim_duration, |v| {
            positive(v, d.spawn_anim_duration)
        });
        self
    }
}

impl ArcadeSettings {
    /// Copy with every field pulled back into a range the game can run with
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        adjust("arcade", "screen_width", &mut self.screen_width, |v| positive(v, d.screen_width));
        adjust("arcade", "screen_height", &mut self.screen_height, |v| positive(v, d.screen_height));
        adjust("arcade", "player_size_ratio", &mut self.player_size_ratio, |v| {
            positive(v, d.player_size_ratio)
        });
        adjust("arcade", "asteroid_size_ratio", &mut self.asteroid_size_ratio, |v| {
            positive(v, d.asteroid_size_ratio)
        });
        adjust("arcade", "pickup_size_ratio", &mut self.pickup_size_ratio, |v| {
            positive(v, d.pickup_size_ratio)
        });
        adjust("arcade", "max_hp", &mut self.max_hp, |v| v.max(1));
        let max_hp = self.max_hp;
        adjust("arcade", "starting_hp", &mut self.starting_hp, |v| v.clamp(1, max_hp));

        adjust("arcade", "fire_interval_ms", &mut self.fire_interval_ms, |v| {
            non_negative(v, d.fire_interval_ms)
        });
        adjust("arcade", "enemy_fire_interval_ms", &mut self.enemy_fire_interval_ms, |v| {
            non_negative(v, d.enemy_fire_interval_ms)
        });
        adjust("arcade", "pickup_interval_ms", &mut self.pickup_interval_ms, |v| {
            non_negative(v, d.pickup_interval_ms)
        });

        speed_range(
            "asteroid",
            &mut self.asteroid_min_speed,
            &mut self.asteroid_max_speed,
            (d.asteroid_min_speed, d.asteroid_max_speed),
        );
        speed_range(
            "pickup",
            &mut self.pickup_min_speed,
            &mut self.pickup_max_speed,
            (d.pickup_min_speed, d.pickup_max_speed),
        );

        adjust("arcade", "shooter_chance", &mut self.shooter_chance, |v| {
            probability(v, d.shooter_chance)
        });
        adjust("arcade", "asteroid_hits_to_kill", &mut self.asteroid_hits_to_kill, |v| v.max(1));
        adjust("arcade", "max_bullet_level", &mut self.max_bullet_level, |v| v.max(1));
        self
    }

    /// Shorter screen side (sizes scale from this)
    pub fn min_dimension(&self) -> f32 {
        self.screen_width.min(self.screen_height)
    }

    pub fn asteroid_size(&self) -> f32 {
        self.min_dimension() * self.asteroid_size_ratio
    }

    pub fn player_size(&self) -> f32 {
        self.min_dimension() * self.player_size_ratio
    }

    pub fn pickup_size(&self) -> f32 {
        self.screen_width * self.pickup_size_ratio
    }
}

/// Replace `value` with `fix(value)`, warning when that changes it
fn adjust<T: Copy + PartialEq + std::fmt::Debug>(
    section: &str,
    field: &str,
    value: &mut T,
    fix: impl FnOnce(T) -> T,
) {
    let fixed = fix(*value);
    // NaN never equals itself, so a NaN input is always reported
    if fixed != *value {
        log::warn!("Settings: {section}.{field} = {:?} is out of range, using {:?}", *value, fixed);
        *value = fixed;
    }
}

fn probability(value: f64, fallback: f64) -> f64 {
    if value.is_nan() { fallback } else { value.clamp(0.0, 1.0) }
}

fn positive(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 { value } else { fallback }
}

fn non_negative(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 { value } else { fallback }
}

/// Finite, non-negative speeds with min <= max
fn speed_range(name: &str, min: &mut f32, max: &mut f32, fallback: (f32, f32)) {
    let valid = |v: f32| v.is_finite() && v >= 0.0;
    if !valid(*min) || !valid(*max) {
        log::warn!("Settings: {name} speeds {}..{} are invalid, using defaults", *min, *max);
        (*min, *max) = fallback;
    } else if *min > *max {
        log::warn!("Settings: {name} speeds {}..{} are reversed, swapping", *min, *max);
        std::mem::swap(min, max);
    }
}

/// All tunables for both modes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub puzzle: PuzzleSettings,
    pub arcade: ArcadeSettings,
}

impl Settings {
    /// Parse settings from JSON (partial documents allowed); out-of-range
    /// values are pulled back into range
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn sanitized(self) -> Self {
        Self {
            puzzle: self.puzzle.sanitized(),
            arcade: self.arcade.sanitized(),
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
