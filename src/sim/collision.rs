//! Collision detection and response
//!
//! Runs once per tick after movement, in a fixed priority:
//! 1. player bullets vs enemies
//! 2. player bullets vs orange enemy bullets
//! 3. enemy bullets vs the player
//!
//! Every collection is walked back to front so in-place removal never skips
//! the element that slides into the freed slot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particle::ParticleSystem;
use super::player::Player;
use super::rng::RandomSource;
use super::store::EntityStore;
use crate::tuning::Tuning;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Aabb {
    /// Zero-area box that never collides
    pub const EMPTY: Aabb = Aabb {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            left: center.x - half.x,
            right: center.x + half.x,
            top: center.y - half.y,
            bottom: center.y + half.y,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Circle-vs-box test. On overlap, returns the circle centre clamped into the box.
    pub fn circle_contact(&self, center: Vec2, radius: f32) -> Option<Vec2> {
        if self.is_empty() {
            return None;
        }
        let overlaps = center.x + radius > self.left
            && center.x - radius < self.right
            && center.y + radius > self.top
            && center.y - radius < self.bottom;
        if !overlaps {
            return None;
        }
        Some(Vec2::new(
            center.x.clamp(self.left, self.right),
            center.y.clamp(self.top, self.bottom),
        ))
    }
}

/// Circle-circle overlap (strict)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// What happened during one collision pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionReport {
    /// Enemies damaged but still alive
    pub enemies_hit: u32,
    /// Enemies destroyed (removed from the store)
    pub enemies_destroyed: u32,
    /// Orange enemy bullets shot down
    pub bullets_cancelled: u32,
    /// The player took a hit this tick
    pub player_hit: bool,
    /// Enemy bullets wiped by the shockwave
    pub shockwave_cleared: u32,
    /// Hit count reached the terminal threshold
    pub player_killed: bool,
}

/// Resolve all collisions for this tick
pub fn resolve(
    store: &mut EntityStore,
    player: &mut Player,
    now_ms: f64,
    tuning: &Tuning,
    effects: &ParticleSystem,
    rng: &mut dyn RandomSource,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    resolve_player_bullets(store, now_ms, tuning, effects, rng, &mut report);
    if player.alive {
        resolve_player_hits(store, player, tuning, effects, rng, &mut report);
    }
    report
}

fn resolve_player_bullets(
    store: &mut EntityStore,
    now_ms: f64,
    tuning: &Tuning,
    effects: &ParticleSystem,
    rng: &mut dyn RandomSource,
    report: &mut CollisionReport,
) {
    for i in (0..store.player_bullets.len()).rev() {
        let (pos, radius) = {
            let bullet = &store.player_bullets[i];
            (bullet.pos, bullet.radius)
        };
        let mut consumed = false;

        // First matching enemy wins
        for j in (0..store.enemies.len()).rev() {
            let Some(contact) = store.enemies[j].bounding_box(now_ms).circle_contact(pos, radius) else {
                continue;
            };
            let enemy = &mut store.enemies[j];
            if enemy.hit() {
                let id = enemy.id;
                let footprint = Vec2::new(enemy.width, enemy.height);
                effects.text_explosion(
                    &mut store.particles,
                    enemy.pos,
                    enemy.length,
                    footprint,
                    tuning.text_explosion_density,
                    enemy.color,
                    rng,
                );
                store.remove_enemy(id);
                report.enemies_destroyed += 1;
            } else {
                effects.small_explosion(&mut store.particles, contact, tuning.small_explosion_count, rng);
                report.enemies_hit += 1;
            }
            consumed = true;
            break;
        }

        // A bullet spent on an enemy cannot also cancel an enemy bullet
        if !consumed {
            for k in (0..store.enemy_bullets.len()).rev() {
                let other = &store.enemy_bullets[k];
                if !other.color.is_destructible() || !circles_overlap(pos, radius, other.pos, other.radius) {
                    continue;
                }
                let midpoint = (pos + other.pos) / 2.0;
                effects.small_explosion(&mut store.particles, midpoint, tuning.cancel_explosion_count, rng);
                store.enemy_bullets.remove(k);
                report.bullets_cancelled += 1;
                consumed = true;
                break;
            }
        }

        if consumed {
            store.player_bullets.remove(i);
        }
    }
}

fn resolve_player_hits(
    store: &mut EntityStore,
    player: &mut Player,
    tuning: &Tuning,
    effects: &ParticleSystem,
    rng: &mut dyn RandomSource,
    report: &mut CollisionReport,
) {
    let hit_pos = player.hit_position(tuning);
    let hit_radius = tuning.hit_radius(player.hit_count);

    // One hit per tick
    let Some(index) = (0..store.enemy_bullets.len()).rev().find(|&i| {
        let bullet = &store.enemy_bullets[i];
        circles_overlap(hit_pos, hit_radius, bullet.pos, bullet.radius)
    }) else {
        return;
    };

    let bullet = store.enemy_bullets.remove(index);
    player.hit_count += 1;
    player.arm_shake(tuning.player_shake_ticks, tuning.player_shake_intensity);
    effects.small_explosion(&mut store.particles, bullet.pos, tuning.impact_particle_count, rng);
    report.player_hit = true;
    log::debug!("Player hit ({}/{})", player.hit_count, tuning.max_hits);

    if tuning.shockwave {
        for i in (0..store.enemy_bullets.len()).rev() {
            let pos = store.enemy_bullets[i].pos;
            if pos.distance(hit_pos) <= tuning.shockwave_radius {
                store.enemy_bullets.remove(i);
                effects.small_explosion(&mut store.particles, pos, tuning.shockwave_particle_count, rng);
                report.shockwave_cleared += 1;
            }
        }
        if report.shockwave_cleared > 0 {
            log::debug!("Shockwave cleared {} bullets", report.shockwave_cleared);
        }
    }

    if player.hit_count >= tuning.max_hits {
        player.alive = false;
        report.player_killed = true;
    }
}
