//! Projectiles for both sides
//!
//! Bullets travel in a straight line at a fixed speed. Player bullets are
//! reclaimed once fully above the play area, enemy bullets once fully below
//! it. Nothing reclaims bullets leaving through the side edges: they simply
//! leave the level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::unit_vector;

/// Enemy bullet colour; only orange bullets can be shot down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletColor {
    Red,
    Orange,
}

impl BulletColor {
    /// Alternating red/orange assignment used by multi-arm patterns
    pub fn alternating(index: u32) -> Self {
        if index % 2 == 0 { BulletColor::Red } else { BulletColor::Orange }
    }

    pub fn is_destructible(self) -> bool {
        self == BulletColor::Orange
    }
}

/// A bullet fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBullet {
    pub id: u32,
    pub pos: Vec2,
    /// Heading (radians)
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
}

impl PlayerBullet {
    pub fn advance(&mut self) {
        self.pos += unit_vector(self.angle) * self.speed;
    }

    /// Fully above the top edge
    pub fn is_out_of_bounds(&self) -> bool {
        self.pos.y + self.radius < 0.0
    }
}

/// A bullet fired by an enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub id: u32,
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
    pub color: BulletColor,
}

impl EnemyBullet {
    pub fn advance(&mut self) {
        self.pos += unit_vector(self.angle) * self.speed;
    }

    /// Fully below the bottom edge
    pub fn is_out_of_bounds(&self, play_height: f32) -> bool {
        self.pos.y > play_height + self.radius
    }
}

/// Enemy bullet waiting to be committed to the store (id assigned on commit)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletRequest {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub color: BulletColor,
}

/// Capability to create bullets without knowing where they are stored
pub trait BulletSink {
    /// Fire a player bullet from `origin` along `angle`
    fn fire_player(&mut self, origin: Vec2, angle: f32);

    /// Fire an enemy bullet
    fn fire_enemy(&mut self, request: BulletRequest);
}

/// Advance all projectiles one tick and drop the ones that left the level.
/// Returns (player bullets removed, enemy bullets removed).
pub fn update_bullets(
    player_bullets: &mut Vec<PlayerBullet>,
    enemy_bullets: &mut Vec<EnemyBullet>,
    play_height: f32,
) -> (usize, usize) {
    let before = (player_bullets.len(), enemy_bullets.len());

    for bullet in player_bullets.iter_mut() {
        bullet.advance();
    }
    player_bullets.retain(|b| !b.is_out_of_bounds());

    for bullet in enemy_bullets.iter_mut() {
        bullet.advance();
    }
    enemy_bullets.retain(|b| !b.is_out_of_bounds(play_height));

    (before.0 - player_bullets.len(), before.1 - enemy_bullets.len())
}
