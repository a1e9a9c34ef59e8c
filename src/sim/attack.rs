//! Enemy attack patterns
//!
//! Plain enemies occasionally fire a single orange bullet at the player.
//! Elites run a continuous emitter (radial burst from both ends of their
//! glyph run on a fixed interval) and, on the same random trigger, pick one
//! of the named patterns below.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::{BulletColor, BulletRequest, BulletSink};
use super::enemy::{Enemy, EnemyState};
use super::rng::RandomSource;
use crate::aim_angle;
use crate::tuning::Tuning;

/// Named multi-arm patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Evenly spaced arms, red/orange alternating
    Radial,
    /// Radial arms with a time-varying twist and per-emitter speed wobble
    Spiral,
    /// Radial arms rotated by a fixed offset
    RotatedRadial,
}

/// Emit one volley of `pattern` from every origin
pub fn fire_pattern(
    pattern: AttackPattern,
    origins: &[Vec2],
    time_ms: f64,
    tuning: &Tuning,
    sink: &mut dyn BulletSink,
) {
    let arms = tuning.pattern_arms;
    let t = (time_ms * tuning.spiral_time_factor as f64) as f32;

    for i in 0..arms {
        let base = i as f32 * TAU / arms as f32;
        let color = BulletColor::alternating(i);
        let angle = match pattern {
            AttackPattern::Radial => base,
            AttackPattern::RotatedRadial => base + tuning.rotated_offset,
            AttackPattern::Spiral => base + (i as f32 + t) * tuning.spiral_factor,
        };

        for (slot, &pos) in origins.iter().enumerate() {
            let speed = match pattern {
                AttackPattern::Spiral => {
                    // Left and right emitters wobble out of phase
                    let wobble = if slot % 2 == 0 { t.sin() } else { t.cos() };
                    tuning.spiral_speed + wobble * tuning.spiral_speed_jitter
                }
                _ => tuning.enemy_bullet_speed,
            };
            sink.fire_enemy(BulletRequest {
                pos,
                angle,
                speed,
                color,
            });
        }
    }
}

/// Single orange bullet aimed at `target`. Skipped if the target sits on the shooter.
pub fn fire_aimed(from: Vec2, target: Vec2, tuning: &Tuning, sink: &mut dyn BulletSink) -> bool {
    match aim_angle(from, target) {
        Some(angle) => {
            sink.fire_enemy(BulletRequest {
                pos: from,
                angle,
                speed: tuning.enemy_bullet_speed,
                color: BulletColor::Orange,
            });
            true
        }
        None => false,
    }
}

/// Run one tick of an enemy's attacks. Descending enemies hold fire.
///
/// Returns the number of volleys fired.
pub fn update_attacks(
    enemy: &mut Enemy,
    player_hit: Vec2,
    now_ms: f64,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
    sink: &mut dyn BulletSink,
) -> u32 {
    if enemy.state != EnemyState::Roaming {
        return 0;
    }
    let mut volleys = 0;

    // Continuous emitter
    if let Some(timer) = enemy.shoot_timer_ms.as_mut() {
        *timer += tuning.tick_ms as f32;
        if *timer >= tuning.elite_shoot_interval_ms {
            *timer = 0.0;
            fire_pattern(AttackPattern::Radial, &enemy.emission_points(), now_ms, tuning, sink);
            volleys += 1;
        }
    }

    if rng.chance(tuning.random_shot_chance) {
        if enemy.elite {
            let roll = rng.unit();
            if roll < 1.0 / 3.0 {
                fire_pattern(AttackPattern::Radial, &[enemy.pos], now_ms, tuning, sink);
            } else if roll < 2.0 / 3.0 {
                fire_pattern(AttackPattern::RotatedRadial, &[enemy.pos], now_ms, tuning, sink);
            } else {
                fire_pattern(AttackPattern::Spiral, &enemy.emission_points(), now_ms, tuning, sink);
            }
            volleys += 1;
        } else if fire_aimed(enemy.pos, player_hit, tuning, sink) {
            volleys += 1;
        }
    }

    volleys
}
