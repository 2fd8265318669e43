//! Arcade entity records
//!
//! One flat record per kind, each kept in its own collection on the world.
//! Positions are entity centers in screen pixels (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of asteroid sprites to pick from
pub const ASTEROID_VARIANTS: u8 = 3;

/// Axis-aligned box centered on `center`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    /// Square of side `size`
    pub fn square(center: Vec2, size: f32) -> Self {
        Self {
            center,
            half: Vec2::splat(size / 2.0),
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Standard AABB intersection (touching edges count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
    }
}

/// Player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub size: f32,
}

impl Ship {
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }
}

/// A falling rock. Recycled to the top instead of being destroyed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub size: f32,
    /// px/s downward
    pub speed: f32,
    /// Bullet hits absorbed since the last recycle
    pub hit_count: u32,
    pub can_shoot: bool,
    pub last_shot_ms: f64,
    /// Sprite variant in `0..ASTEROID_VARIANTS`
    pub variant: u8,
}

impl Asteroid {
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    /// Bottom edge y
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size / 2.0
    }

    /// Top edge y
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size / 2.0
    }
}

/// Player bullet (travels up)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub speed: f32,
    pub size: f32,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }
}

/// Shot from an asteroid (travels down a fixed step per tick)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub size: f32,
    pub step: f32,
}

impl EnemyBullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }
}

/// Short-lived beam covering the whole screen height
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    /// Beam center x (y is the firing point, cosmetic only)
    pub pos: Vec2,
    pub width: f32,
    pub spawn_ms: f64,
    pub duration_ms: f64,
}

impl Laser {
    /// Full-height strip for a screen of `height`
    pub fn strip(&self, height: f32) -> Aabb {
        Aabb {
            center: Vec2::new(self.pos.x, height / 2.0),
            half: Vec2::new(self.width / 2.0, height / 2.0),
        }
    }

    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.spawn_ms > self.duration_ms
    }
}

/// Bomb launched during bomb-mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub is_exploded: bool,
    pub explode_radius: f32,
    pub explode_ms: f64,
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupportKind {
    BulletUpgrade,
    BigBullet,
    Laser,
    Bomb,
    Heart,
    Shield,
    Coin,
}

impl SupportKind {
    pub const ALL: [SupportKind; 7] = [
        SupportKind::BulletUpgrade,
        SupportKind::BigBullet,
        SupportKind::Laser,
        SupportKind::Bomb,
        SupportKind::Heart,
        SupportKind::Shield,
        SupportKind::Coin,
    ];
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportItem {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub kind: SupportKind,
}

impl SupportItem {
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }
}

/// Horizontal bullet offsets for each fire level (1-5)
pub fn fan_offsets(level: u8) -> &'static [f32] {
    match level {
        0 | 1 => &[0.0],
        2 => &[-20.0, 20.0],
        3 => &[0.0, -30.0, 30.0],
        4 => &[-20.0, 20.0, -40.0, 40.0],
        _ => &[0.0, -30.0, 30.0, -60.0, 60.0],
    }
}
