//! Collision detection and response
//!
//! Every entity is an axis-aligned box around its center. Pairs are found by
//! iteration, never stored handles, and removals rebuild the collections
//! after the pass so nothing is skipped or visited twice.

use super::player::DamageOutcome;
use super::state::{ArcadeWorld, recycle_asteroid};
use crate::audio::SoundEffect;

/// Resolve all overlaps for this tick, in priority order
pub fn resolve(world: &mut ArcadeWorld) {
    if player_vs_asteroids(world) {
        return;
    }
    if asteroid_breached(world) {
        return;
    }
    player_vs_pickups(world);
    lasers_vs_asteroids(world);
    bullets_vs_asteroids(world);
    player_vs_enemy_bullets(world);
}

/// Damage the player and report whether the run ended
fn hit_player(world: &mut ArcadeWorld) -> bool {
    let outcome = world
        .player
        .take_damage(world.now_ms, world.settings.invincible_ms);
    if outcome != DamageOutcome::Ignored {
        world.sounds.push(SoundEffect::PlayerHit);
    }
    if outcome.is_dead() {
        world.end_run();
        return true;
    }
    false
}

/// Body hits. The asteroid is recycled whatever the damage outcome.
pub fn player_vs_asteroids(world: &mut ArcadeWorld) -> bool {
    let ship = world.ship.bounds();
    for i in 0..world.asteroids.len() {
        if !ship.overlaps(&world.asteroids[i].bounds()) {
            continue;
        }
        world.recycle(i);
        if hit_player(world) {
            return true;
        }
    }
    false
}

/// An asteroid touching the bottom edge ends the run
pub fn asteroid_breached(world: &mut ArcadeWorld) -> bool {
    if !world.settings.asteroid_breach_ends_run {
        return false;
    }
    let height = world.height();
    if world.asteroids.iter().any(|a| a.bottom() >= height) {
        log::info!("Arcade: asteroid reached the bottom edge");
        world.end_run();
        return true;
    }
    false
}

pub fn player_vs_pickups(world: &mut ArcadeWorld) {
    let ship = world.ship.bounds();
    let (taken, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut world.pickups)
        .into_iter()
        .partition(|p| ship.overlaps(&p.bounds()));
    world.pickups = kept;

    for item in taken {
        world.apply_pickup(item.kind);
    }
}

/// Beams pierce: every asteroid in a strip is destroyed, once per tick
pub fn lasers_vs_asteroids(world: &mut ArcadeWorld) {
    let height = world.height();
    let strips: Vec<_> = world.lasers.iter().map(|l| l.strip(height)).collect();
    // A recycled asteroid re-enters touching y = 0, inside every strip
    let mut destroyed = vec![false; world.asteroids.len()];
    for strip in strips {
        for i in 0..world.asteroids.len() {
            if !destroyed[i] && strip.overlaps(&world.asteroids[i].bounds()) {
                destroyed[i] = true;
                world.recycle(i);
                world.award_destroy();
            }
        }
    }
}

/// Each bullet hits at most one asteroid and is consumed by it
pub fn bullets_vs_asteroids(world: &mut ArcadeWorld) {
    let width = world.width();
    let hits_to_kill = world.settings.asteroid_hits_to_kill;
    let mut spent = vec![false; world.bullets.len()];
    let mut kills = 0u32;

    for (bi, bullet) in world.bullets.iter().enumerate() {
        let bounds = bullet.bounds();
        let Some(asteroid) = world
            .asteroids
            .iter_mut()
            .find(|a| bounds.overlaps(&a.bounds()))
        else {
            continue;
        };

        spent[bi] = true;
        asteroid.hit_count += 1;
        if asteroid.hit_count >= hits_to_kill {
            recycle_asteroid(asteroid, &mut world.rng, width);
            kills += 1;
        }
    }

    let mut spent_iter = spent.into_iter();
    world
        .bullets
        .retain(|_| !spent_iter.next().unwrap_or(false));

    for _ in 0..kills {
        world.player.kill_count += 1;
        world.award_destroy();
    }
}

pub fn player_vs_enemy_bullets(world: &mut ArcadeWorld) {
    let ship = world.ship.bounds();
    let (hits, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut world.enemy_bullets)
        .into_iter()
        .partition(|b| ship.overlaps(&b.bounds()));
    world.enemy_bullets = kept;

    for _ in hits {
        if hit_player(world) {
            return;
        }
    }
}
