//! Per-tick update pipeline
//!
//! Steps run in a fixed order; later steps observe what earlier ones did.

use super::collision;
use super::entities::EnemyBullet;
use super::state::{ArcadeWorld, recycle_asteroid};
use crate::audio::SoundEffect;
use crate::clamp_dt;

/// Advance the arcade world by `dt` seconds
pub fn tick(world: &mut ArcadeWorld, dt: f32) {
    if !world.is_playing() {
        return;
    }

    let dt = clamp_dt(dt);
    world.now_ms += dt as f64 * 1000.0;

    scroll_background(world, dt);
    update_bullets(world, dt);
    update_asteroids(world, dt);
    update_pickups(world, dt);
    update_lasers(world);
    update_bombs(world, dt);
    update_enemy_fire(world);

    let now = world.now_ms;
    world.player.update(now);

    collision::resolve(world);
}

/// Cosmetic scroll, wraps at the background height
pub fn scroll_background(world: &mut ArcadeWorld, dt: f32) {
    let height = world.settings.background_height;
    if height <= 0.0 {
        return;
    }
    world.background_offset =
        (world.background_offset + world.settings.background_scroll_speed * dt) % height;
}

/// Move bullets up, drop those off the top, then auto-fire on cadence
pub fn update_bullets(world: &mut ArcadeWorld, dt: f32) {
    for bullet in &mut world.bullets {
        bullet.pos.y -= bullet.speed * dt;
    }
    world.bullets.retain(|b| b.pos.y + b.size / 2.0 >= 0.0);

    if world.now_ms >= world.next_fire_ms {
        if world.player.bomb_mode {
            world.fire_bomb();
        } else {
            world.fire_pattern();
        }
        world.next_fire_ms = world.now_ms + world.settings.fire_interval_ms;
        world.sounds.push(SoundEffect::Shoot);
    }
}

/// Move asteroids down; anything fully below the screen is recycled
pub fn update_asteroids(world: &mut ArcadeWorld, dt: f32) {
    let (width, height) = (world.width(), world.height());
    for asteroid in &mut world.asteroids {
        asteroid.pos.y += asteroid.speed * dt;
        if asteroid.top() > height {
            recycle_asteroid(asteroid, &mut world.rng, width);
        }
    }
}

/// Move pickups down, drop those off the bottom, spawn on interval
pub fn update_pickups(world: &mut ArcadeWorld, dt: f32) {
    let height = world.height();
    for item in &mut world.pickups {
        item.pos.y += item.speed * dt;
    }
    world.pickups.retain(|p| p.pos.y <= height + p.size);

    if world.now_ms >= world.next_pickup_ms {
        world.spawn_pickup();
        world.next_pickup_ms = world.now_ms + world.settings.pickup_interval_ms;
    }
}

/// Expire laser beams
pub fn update_lasers(world: &mut ArcadeWorld) {
    let now = world.now_ms;
    world.lasers.retain(|l| !l.expired(now));
}

/// Fly bombs, detonate on asteroid proximity, clear lingering explosions
pub fn update_bombs(world: &mut ArcadeWorld, dt: f32) {
    let now = world.now_ms;
    let mut detonations = Vec::new();

    for bomb in world.bombs.iter_mut().filter(|b| !b.is_exploded) {
        bomb.pos.y -= bomb.speed * dt;

        let trigger = world.asteroids.iter().find(|a| {
            let reach = a.size / 2.0 + bomb.size / 2.0;
            a.pos.distance_squared(bomb.pos) <= reach * reach
        });
        if let Some(asteroid) = trigger {
            bomb.is_exploded = true;
            bomb.explode_ms = now;
            bomb.explode_radius = asteroid.size * 3.0;
            detonations.push((bomb.pos, bomb.explode_radius));
        }
    }

    for (center, radius) in detonations {
        let radius_sq = radius * radius;
        let mut destroyed = 0;
        for i in 0..world.asteroids.len() {
            if world.asteroids[i].pos.distance_squared(center) <= radius_sq {
                world.recycle(i);
                world.player.add_score(world.settings.asteroid_score);
                destroyed += 1;
            }
        }
        world.sounds.push(SoundEffect::Explosion);
        log::debug!("Bomb detonated at {:?}, {} asteroids caught", center, destroyed);
    }

    let linger = world.settings.bomb_linger_ms;
    world.bombs.retain(|b| {
        if b.is_exploded {
            now - b.explode_ms <= linger
        } else {
            b.pos.y + b.size / 2.0 >= 0.0
        }
    });
}

/// Shooter asteroids fire on their cadence; enemy bullets fall a fixed step
pub fn update_enemy_fire(world: &mut ArcadeWorld) {
    let now = world.now_ms;
    let interval = world.settings.enemy_fire_interval_ms;

    for asteroid in world.asteroids.iter_mut().filter(|a| a.can_shoot) {
        if now - asteroid.last_shot_ms > interval {
            world.enemy_bullets.push(EnemyBullet {
                pos: asteroid.pos,
                size: world.settings.enemy_bullet_size,
                step: world.settings.enemy_bullet_step,
            });
            asteroid.last_shot_ms = now;
        }
    }

    let height = world.height();
    for bullet in &mut world.enemy_bullets {
        bullet.pos.y += bullet.step;
    }
    world
        .enemy_bullets
        .retain(|b| b.pos.y - b.size / 2.0 <= height);
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::arcade::entities::{Asteroid, Bomb};
    use crate::arcade::state::ArcadePhase;
    use crate::consts::SIM_DT;
    use crate::settings::ArcadeSettings;

    fn world() -> ArcadeWorld {
        ArcadeWorld::empty(
            ArcadeSettings {
                screen_width: 800.0,
                screen_height: 1200.0,
                ..Default::default()
            },
            12345,
        )
    }

    fn asteroid_at(x: f32, y: f32) -> Asteroid {
        Asteroid {
            pos: Vec2::new(x, y),
            size: 100.0,
            speed: 0.0,
            hit_count: 0,
            can_shoot: false,
            last_shot_ms: 0.0,
            variant: 0,
        }
    }

    #[test]
    fn test_first_tick_fires_and_cadence_holds() {
        let mut world = world();
        world.player.bullet_level = 3;
        tick(&mut world, SIM_DT);
        assert_eq!(world.bullets.len(), 3);

        // No new volley until 500 ms have passed
        for _ in 0..20 {
            tick(&mut world, SIM_DT);
        }
        assert_eq!(world.bullets.len(), 3);
        for _ in 0..15 {
            tick(&mut world, SIM_DT);
        }
        assert_eq!(world.bullets.len(), 6);
    }

    #[test]
    fn test_bomb_mode_fires_bombs_instead() {
        let mut world = world();
        world.player.activate_bomb_mode(0.0, 10_000.0);
        update_bullets(&mut world, 0.0);
        assert!(world.bullets.is_empty());
        assert_eq!(world.bombs.len(), 1);
    }

    #[test]
    fn test_bullets_leave_through_top() {
        let mut world = world();
        world.next_fire_ms = f64::MAX;
        world.fire_pattern();
        world.bullets[0].pos.y = 5.0;
        update_bullets(&mut world, 0.1);
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn test_fall_through_recycles_instead_of_removing() {
        let mut world = world();
        let mut a = asteroid_at(300.0, 1200.0 + 49.0);
        a.speed = 100.0;
        a.hit_count = 2;
        world.asteroids.push(a);

        update_asteroids(&mut world, 0.05);
        assert_eq!(world.asteroids.len(), 1);
        let a = &world.asteroids[0];
        assert_eq!(a.pos.y, -50.0);
        assert_eq!(a.hit_count, 0);
        assert!(a.pos.x >= 50.0 && a.pos.x <= 750.0);
    }

    #[test]
    fn test_pickups_spawn_on_interval() {
        let mut world = world();
        world.now_ms = 2_999.0;
        update_pickups(&mut world, 0.0);
        assert!(world.pickups.is_empty());
        world.now_ms = 3_000.0;
        update_pickups(&mut world, 0.0);
        assert_eq!(world.pickups.len(), 1);
        assert_eq!(world.next_pickup_ms, 6_000.0);

        world.pickups[0].pos.y = 1200.0 + world.pickups[0].size + 1.0;
        update_pickups(&mut world, 0.0);
        assert!(world.pickups.is_empty());
    }

    #[test]
    fn test_laser_expires_after_duration() {
        let mut world = world();
        world.fire_laser();
        world.now_ms = 300.0;
        update_lasers(&mut world);
        assert_eq!(world.lasers.len(), 1);
        world.now_ms = 301.0;
        update_lasers(&mut world);
        assert!(world.lasers.is_empty());
    }

    #[test]
    fn test_bomb_detonates_and_clears_radius() {
        let mut world = world();
        // Trigger asteroid right above the bomb, one inside blast radius, one far away
        world.asteroids.push(asteroid_at(400.0, 600.0));
        world.asteroids.push(asteroid_at(600.0, 500.0));
        world.asteroids.push(asteroid_at(100.0, -1000.0));
        world.asteroids[1].hit_count = 2;
        world.bombs.push(Bomb {
            pos: Vec2::new(400.0, 680.0),
            size: 40.0,
            speed: 500.0,
            is_exploded: false,
            explode_radius: 0.0,
            explode_ms: 0.0,
        });

        update_bombs(&mut world, 0.02);

        let bomb = &world.bombs[0];
        assert!(bomb.is_exploded);
        assert_eq!(bomb.explode_radius, 300.0);
        assert_eq!(world.asteroids[0].pos.y, -50.0);
        assert_eq!(world.asteroids[1].pos.y, -50.0);
        assert_eq!(world.asteroids[1].hit_count, 0);
        assert_eq!(world.asteroids[2].pos, Vec2::new(100.0, -1000.0));
        assert!(world.sounds.contains(&SoundEffect::Explosion));

        // Frozen while lingering, then removed
        let pos = bomb.pos;
        world.now_ms += 400.0;
        update_bombs(&mut world, 0.02);
        assert_eq!(world.bombs[0].pos, pos);
        world.now_ms += 1.0;
        update_bombs(&mut world, 0.02);
        assert!(world.bombs.is_empty());
    }

    #[test]
    fn test_unexploded_bomb_leaves_through_top() {
        let mut world = world();
        world.bombs.push(Bomb {
            pos: Vec2::new(400.0, 10.0),
            size: 40.0,
            speed: 500.0,
            is_exploded: false,
            explode_radius: 0.0,
            explode_ms: 0.0,
        });
        update_bombs(&mut world, 0.1);
        assert!(world.bombs.is_empty());
    }

    #[test]
    fn test_enemy_fire_cadence_and_fall() {
        let mut world = world();
        let mut shooter = asteroid_at(200.0, 300.0);
        shooter.can_shoot = true;
        world.asteroids.push(shooter);
        world.asteroids.push(asteroid_at(600.0, 300.0));

        world.now_ms = 1_000.0;
        update_enemy_fire(&mut world);
        assert!(world.enemy_bullets.is_empty());

        world.now_ms = 1_001.0;
        update_enemy_fire(&mut world);
        assert_eq!(world.enemy_bullets.len(), 1);
        assert_eq!(world.enemy_bullets[0].pos, Vec2::new(200.0, 312.0));
        assert_eq!(world.asteroids[0].last_shot_ms, 1_001.0);

        world.enemy_bullets[0].pos.y = 1_205.0;
        update_enemy_fire(&mut world);
        assert!(world.enemy_bullets.is_empty());
    }

    #[test]
    fn test_background_wraps() {
        let mut world = world();
        world.background_offset = world.settings.background_height - 1.0;
        scroll_background(&mut world, 0.1);
        assert!((world.background_offset - 9.0).abs() < 0.001);
    }

    #[test]
    fn test_stalled_driver_is_clamped() {
        let mut world = world();
        tick(&mut world, 30.0);
        assert!((world.now_ms - 100.0).abs() < 0.01);
        tick(&mut world, -1.0);
        assert!((world.now_ms - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_game_over_freezes_world() {
        let mut world = world();
        world.phase = ArcadePhase::GameOver;
        tick(&mut world, SIM_DT);
        assert_eq!(world.now_ms, 0.0);
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = ArcadeWorld::new(ArcadeSettings::default(), 99999);
        let mut b = ArcadeWorld::new(ArcadeSettings::default(), 99999);
        for _ in 0..240 {
            tick(&mut a, SIM_DT);
            tick(&mut b, SIM_DT);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player.score, b.player.score);
        assert_eq!(a.asteroids.len(), b.asteroids.len());
        for (x, y) in a.asteroids.iter().zip(&b.asteroids) {
            assert_eq!(x.pos, y.pos);
        }
    }
}
