//! Live entity collections for one session

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::{BulletRequest, BulletSink, EnemyBullet, PlayerBullet};
use super::enemy::Enemy;
use super::particle::Particle;
use crate::tuning::Tuning;

/// Owns every enemy, bullet and particle in a session.
///
/// Collections stay in spawn order (ascending id). Other systems mutate them
/// in place during their phase of the tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<PlayerBullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    player_bullet_speed: f32,
    player_bullet_radius: f32,
    enemy_bullet_radius: f32,
    next_id: u32,
}

impl EntityStore {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            particles: Vec::new(),
            player_bullet_speed: tuning.player_bullet_speed,
            player_bullet_radius: tuning.player_bullet_radius,
            enemy_bullet_radius: tuning.enemy_bullet_radius,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn elite_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.elite).count()
    }

    pub fn non_elite_count(&self) -> usize {
        self.enemies.len() - self.elite_count()
    }

    /// Remove an enemy by id. Removing an id that is already gone is a no-op.
    pub fn remove_enemy(&mut self, id: u32) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    /// Drop every entity (session restart). Ids keep counting up.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.particles.clear();
    }

    /// Keep collections sorted by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.player_bullets.sort_by_key(|b| b.id);
        self.enemy_bullets.sort_by_key(|b| b.id);
    }
}

impl BulletSink for EntityStore {
    fn fire_player(&mut self, origin: Vec2, angle: f32) {
        let id = self.next_entity_id();
        self.player_bullets.push(PlayerBullet {
            id,
            pos: origin,
            angle,
            speed: self.player_bullet_speed,
            radius: self.player_bullet_radius,
        });
    }

    fn fire_enemy(&mut self, request: BulletRequest) {
        let id = self.next_entity_id();
        self.enemy_bullets.push(EnemyBullet {
            id,
            pos: request.pos,
            angle: request.angle,
            speed: request.speed,
            radius: self.enemy_bullet_radius,
            color: request.color,
        });
    }
}
