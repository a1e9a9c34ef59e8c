//! Visual-effect particles
//!
//! Particles never affect gameplay. They are spawned on request (explosions,
//! impacts), drift at a constant velocity and fade out as their life runs down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;

/// Default particle colour (white)
pub const PARTICLE_WHITE: u32 = 0xFFFFFF;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Remaining life, counts down to zero
    pub life: f32,
    /// Life at spawn, used for the alpha ramp
    pub max_life: f32,
    pub color: u32,
}

impl Particle {
    /// Spawn a particle with a random radius and scatter velocity
    pub fn scatter(pos: Vec2, life: f32, color: u32, rng: &mut dyn RandomSource) -> Self {
        let radius = rng.range(1.0, 1.8);
        let vel = Vec2::new(rng.range(-10.0, 12.0), rng.range(-10.0, 12.0));
        Self {
            pos,
            vel,
            radius,
            life,
            max_life: life,
            color,
        }
    }

    /// Opacity in [0, 1]
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

/// Spawns and ages particles, capped at `max_particles`
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub life: f32,
    pub decay: f32,
    pub max_particles: usize,
}

impl ParticleSystem {
    pub fn new(life: f32, decay: f32, max_particles: usize) -> Self {
        Self {
            life,
            decay,
            max_particles,
        }
    }

    /// Burst of `count` particles at a point
    pub fn small_explosion(
        &self,
        particles: &mut Vec<Particle>,
        at: Vec2,
        count: u32,
        rng: &mut dyn RandomSource,
    ) {
        for _ in 0..count {
            if particles.len() >= self.max_particles {
                break;
            }
            particles.push(Particle::scatter(at, self.life, PARTICLE_WHITE, rng));
        }
    }

    /// Burst scattered over a glyph run's footprint (`density` particles per glyph)
    #[allow(clippy::too_many_arguments)]
    pub fn text_explosion(
        &self,
        particles: &mut Vec<Particle>,
        center: Vec2,
        glyphs: u8,
        footprint: Vec2,
        density: u32,
        color: u32,
        rng: &mut dyn RandomSource,
    ) {
        let count = glyphs as u32 * density;
        let origin = center - footprint / 2.0;
        for _ in 0..count {
            if particles.len() >= self.max_particles {
                break;
            }
            let at = origin + Vec2::new(rng.unit() * footprint.x, rng.unit() * footprint.y);
            particles.push(Particle::scatter(at, self.life, color, rng));
        }
    }

    /// Move and fade every particle, dropping the expired ones
    pub fn update(&self, particles: &mut Vec<Particle>) {
        for particle in particles.iter_mut() {
            particle.pos += particle.vel;
            particle.life -= self.decay;
        }
        particles.retain(|p| p.life > 0.0);
    }
}
