//! Player health, shields and timed buffs
//!
//! Timers are absolute "until" timestamps on the world clock (ms), so the
//! state machine is deterministic and needs no wall clock.

use serde::{Deserialize, Serialize};

/// Result of a damage call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Invincibility window swallowed the hit
    Ignored,
    /// A shield charge was consumed
    Shielded,
    /// HP lost, grace window started
    Wounded,
    /// HP reached zero
    Dead,
}

impl DamageOutcome {
    pub fn is_dead(self) -> bool {
        self == DamageOutcome::Dead
    }
}

/// Session-long player state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub current_hp: i32,
    pub max_hp: i32,
    pub shield_count: u32,
    pub is_invincible: bool,
    pub invincible_until_ms: f64,
    pub bomb_mode: bool,
    pub bomb_mode_until_ms: f64,
    /// Fire pattern level, 1-5
    pub bullet_level: u8,
    pub coin_count: u32,
    pub kill_count: u32,
    pub score: u64,
    pub high_score: u64,
}

impl PlayerState {
    pub fn new(starting_hp: i32, max_hp: i32) -> Self {
        Self {
            current_hp: starting_hp.min(max_hp),
            max_hp,
            shield_count: 0,
            is_invincible: false,
            invincible_until_ms: 0.0,
            bomb_mode: false,
            bomb_mode_until_ms: 0.0,
            bullet_level: 1,
            coin_count: 0,
            kill_count: 0,
            score: 0,
            high_score: 0,
        }
    }

    /// Apply one hit. Invincibility beats shields, shields beat HP.
    pub fn take_damage(&mut self, now_ms: f64, invincible_ms: f64) -> DamageOutcome {
        if self.is_invincible {
            return DamageOutcome::Ignored;
        }

        if self.shield_count > 0 {
            self.shield_count -= 1;
            return DamageOutcome::Shielded;
        }

        self.current_hp -= 1;
        if self.current_hp <= 0 {
            return DamageOutcome::Dead;
        }

        self.is_invincible = true;
        self.invincible_until_ms = now_ms + invincible_ms;
        DamageOutcome::Wounded
    }

    pub fn activate_bomb_mode(&mut self, now_ms: f64, duration_ms: f64) {
        self.bomb_mode = true;
        self.bomb_mode_until_ms = now_ms + duration_ms;
    }

    /// Shields are set, not stacked
    pub fn activate_shield(&mut self, charges: u32) {
        self.shield_count = charges;
    }

    pub fn heal(&mut self, amount: i32) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    pub fn upgrade_bullets(&mut self, max_level: u8) {
        self.bullet_level = (self.bullet_level + 1).min(max_level);
    }

    pub fn add_coin(&mut self, amount: u32) {
        self.coin_count += amount;
    }

    pub fn is_shield_active(&self) -> bool {
        self.shield_count > 0
    }

    /// Award points; the high score follows live
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.high_score = self.high_score.max(self.score);
    }

    /// Expire timed buffs
    pub fn update(&mut self, now_ms: f64) {
        if self.bomb_mode && now_ms > self.bomb_mode_until_ms {
            self.bomb_mode = false;
        }
        if self.is_invincible && now_ms > self.invincible_until_ms {
            self.is_invincible = false;
        }
    }
}
