//! Enemy entities and their movement state machine
//!
//! An enemy is a run of 3..=10 glyphs. Runs of `elite_threshold` glyphs or
//! more are elite: they take `2 * length` hits and shoot attack patterns on a
//! timer. Every enemy starts out `Descending` toward a random target height,
//! then switches to `Roaming` for the rest of its life, drifting around while
//! fleeing from the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::rng::RandomSource;
use crate::consts::{MAX_GLYPHS, MIN_GLYPHS};
use crate::tuning::Tuning;
use crate::unit_vector;

/// Movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Dropping straight down toward `target_y`
    Descending,
    /// Free roaming (terminal)
    Roaming,
}

/// Health for a glyph run of the given length
pub fn health_for(length: u8, elite: bool) -> u32 {
    if elite { 2 * length as u32 } else { 1 }
}

/// An enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    /// Glyph-run length
    pub length: u8,
    pub elite: bool,
    pub health: u32,
    pub color: u32,
    pub state: EnemyState,
    pub target_y: f32,
    pub speed: f32,
    pub max_speed: f32,
    /// Roam heading (radians)
    pub direction: f32,
    /// Ticks until the next heading change
    pub direction_timer: u32,
    /// Milliseconds until the slow/fast toggle
    pub speed_switch_ms: f32,
    pub shake_ticks: u32,
    pub shake_intensity: f32,
    pub shake_offset: Vec2,
    pub spawned_at_ms: f64,
    /// Elite continuous-fire accumulator (None for non-elites)
    pub shoot_timer_ms: Option<f32>,
    /// Glyph-run footprint
    pub width: f32,
    pub height: f32,
    glyph_advance: f32,
    immunity_ms: f64,
    hit_shake_ticks: u32,
    hit_shake_intensity: f32,
}

impl Enemy {
    /// Spawn an enemy with a random glyph run at `pos`
    pub fn spawn(
        id: u32,
        pos: Vec2,
        now_ms: f64,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let length = rng.int_inclusive(MIN_GLYPHS as u32, MAX_GLYPHS as u32) as u8;
        let max_speed = if rng.unit() > 0.5 {
            tuning.slow_speed
        } else {
            tuning.fast_speed
        };
        let (band_lo, band_hi) = tuning.target_y_band;
        let target_y = tuning.play_height * rng.range(band_lo, band_hi);
        let (switch_lo, switch_hi) = tuning.speed_switch_ms;
        let speed_switch_ms = rng.range(switch_lo, switch_hi);

        let mut enemy = Self {
            id,
            pos,
            length,
            elite: false,
            health: 1,
            color: tuning.enemy_color,
            state: EnemyState::Descending,
            target_y,
            speed: 0.0,
            max_speed,
            direction: std::f32::consts::FRAC_PI_2,
            direction_timer: 0,
            speed_switch_ms,
            shake_ticks: 0,
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
            spawned_at_ms: now_ms,
            shoot_timer_ms: None,
            width: 0.0,
            height: tuning.glyph_size,
            glyph_advance: tuning.glyph_advance,
            immunity_ms: tuning.spawn_immunity_ms,
            hit_shake_ticks: tuning.hit_shake_ticks,
            hit_shake_intensity: tuning.hit_shake_intensity,
        };
        enemy.set_length(length, tuning);
        enemy
    }

    /// Re-derive everything that depends on the glyph-run length
    pub fn set_length(&mut self, length: u8, tuning: &Tuning) {
        self.length = length;
        self.elite = length >= tuning.elite_threshold;
        self.health = health_for(length, self.elite);
        self.color = if self.elite {
            tuning.elite_color
        } else {
            tuning.enemy_color
        };
        self.shoot_timer_ms = if self.elite { Some(0.0) } else { None };
        self.width = self.glyph_advance * length as f32;
    }

    /// Reroll as a plain enemy with a short glyph run
    pub fn demote(&mut self, tuning: &Tuning, rng: &mut dyn RandomSource) {
        let (lo, hi) = tuning.demoted_glyphs;
        let length = rng.int_inclusive(lo as u32, hi as u32) as u8;
        self.set_length(length, tuning);
        log::debug!("Enemy {} demoted to {} glyphs", self.id, length);
    }

    /// Take one point of damage and start shaking. Returns true if this killed it.
    pub fn hit(&mut self) -> bool {
        self.shake_ticks = self.hit_shake_ticks;
        self.shake_intensity = self.hit_shake_intensity;
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    /// Still inside the post-spawn grace period
    pub fn is_immune(&self, now_ms: f64) -> bool {
        now_ms - self.spawned_at_ms < self.immunity_ms
    }

    /// Collision box; empty while spawn immunity lasts
    pub fn bounding_box(&self, now_ms: f64) -> Aabb {
        if self.is_immune(now_ms) {
            return Aabb::EMPTY;
        }
        Aabb::from_center(self.pos, Vec2::new(self.width, self.height))
    }

    /// Centres of the first and last glyph
    pub fn emission_points(&self) -> [Vec2; 2] {
        let half_run = self.width / 2.0 - self.glyph_advance / 2.0;
        [
            Vec2::new(self.pos.x - half_run, self.pos.y),
            Vec2::new(self.pos.x + half_run, self.pos.y),
        ]
    }

    /// Advance movement and shake by one tick.
    ///
    /// `player_hit` is the player's render-space position, which roaming
    /// enemies steer away from.
    pub fn update(&mut self, player_hit: Vec2, tuning: &Tuning, rng: &mut dyn RandomSource) {
        match self.state {
            EnemyState::Descending => {
                self.pos.y += tuning.descent_speed;
                if self.pos.y >= self.target_y {
                    self.state = EnemyState::Roaming;
                    self.direction = rng.angle();
                }
            }
            EnemyState::Roaming => self.roam(player_hit, tuning, rng),
        }

        let margin = self.height;
        self.pos.x = self.pos.x.clamp(margin, (tuning.play_width - margin).max(margin));
        self.pos.y = self.pos.y.clamp(margin, (tuning.play_height - margin).max(margin));

        self.update_shake(rng);
    }

    fn roam(&mut self, player_hit: Vec2, tuning: &Tuning, rng: &mut dyn RandomSource) {
        self.speed_switch_ms -= tuning.tick_ms as f32;
        if self.speed_switch_ms <= 0.0 {
            self.max_speed = if self.max_speed == tuning.slow_speed {
                tuning.fast_speed
            } else {
                tuning.slow_speed
            };
            let (lo, hi) = tuning.speed_switch_ms;
            self.speed_switch_ms = rng.range(lo, hi);
        }

        self.direction_timer = self.direction_timer.saturating_sub(1);
        if self.direction_timer == 0 {
            let away = self.pos - player_hit;
            let distance = away.length();
            // No flee heading when sitting on the player; retry next tick
            if let Some(avoid) = crate::heading(away) {
                let random = rng.angle();
                let mix = (tuning.flee_distance / distance).min(1.0);
                self.direction = avoid * mix + random * (1.0 - mix);
                let (lo, hi) = tuning.direction_change_ticks;
                self.direction_timer = rng.int_inclusive(lo, hi);
            }
        }

        if self.speed < self.max_speed {
            self.speed = (self.speed + tuning.roam_accel).min(self.max_speed);
        } else if self.speed > self.max_speed {
            self.speed = (self.speed - tuning.roam_accel).max(self.max_speed);
        }

        let mut step = unit_vector(self.direction) * self.speed;
        let half_height = tuning.play_height * 0.5;
        if step.y > 0.0 && self.pos.y > half_height {
            step.y *= (-(self.pos.y - half_height) / tuning.descent_damping).exp();
        }
        self.pos += step;
    }

    fn update_shake(&mut self, rng: &mut dyn RandomSource) {
        if self.shake_ticks > 0 {
            self.shake_ticks -= 1;
            self.shake_intensity =
                self.hit_shake_intensity * self.shake_ticks as f32 / self.hit_shake_ticks.max(1) as f32;
            self.shake_offset =
                Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0)) * self.shake_intensity;
        } else {
            self.shake_intensity = 0.0;
            self.shake_offset = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{FixedRng, SimRng};

    fn enemy_with_length(length: u8) -> Enemy {
        let tuning = Tuning::default();
        let mut enemy = Enemy::spawn(1, Vec2::new(900.0, 100.0), 0.0, &tuning, &mut SimRng::new(5));
        enemy.set_length(length, &tuning);
        enemy
    }

    #[test]
    fn test_health_formula() {
        for length in 3..=10u8 {
            let enemy = enemy_with_length(length);
            let expected = if length >= 6 { 2 * length as u32 } else { 1 };
            assert_eq!(enemy.health, expected);
            assert_eq!(enemy.elite, length >= 6);
            assert_eq!(enemy.shoot_timer_ms.is_some(), enemy.elite);
        }
    }

    #[test]
    fn test_elite_takes_sixteen_hits() {
        let mut enemy = enemy_with_length(8);
        assert!(enemy.elite);
        assert_eq!(enemy.health, 16);

        for _ in 0..15 {
            enemy.shake_ticks = 0;
            assert!(!enemy.hit());
            assert_eq!(enemy.shake_ticks, 15);
            assert_eq!(enemy.shake_intensity, 5.0);
        }
        assert_eq!(enemy.health, 1);
        assert!(enemy.hit());
        assert_eq!(enemy.health, 0);
    }

    #[test]
    fn test_spawn_immunity_box() {
        let tuning = Tuning::default();
        let enemy = Enemy::spawn(1, Vec2::new(900.0, 300.0), 5000.0, &tuning, &mut SimRng::new(9));

        assert!(enemy.bounding_box(5000.0).is_empty());
        assert!(enemy.bounding_box(5999.0).is_empty());

        let aabb = enemy.bounding_box(6000.0);
        assert!(!aabb.is_empty());
        assert!((aabb.width() - enemy.length as f32 * 30.0).abs() < 1e-3);
        assert!((aabb.height() - 30.0).abs() < 1e-3);
        assert!((aabb.center() - enemy.pos).length() < 1e-3);
    }

    #[test]
    fn test_descends_then_roams() {
        let tuning = Tuning::default();
        let mut rng = FixedRng(0.25);
        let mut enemy = Enemy::spawn(1, Vec2::new(900.0, -30.0), 0.0, &tuning, &mut rng);
        // 1080 * (0.3 + 0.25 * 0.2)
        assert!((enemy.target_y - 378.0).abs() < 1e-3);

        let player = Vec2::new(0.0, 1000.0);
        let mut ticks = 0;
        while enemy.state == EnemyState::Descending {
            let before = enemy.pos.y;
            enemy.update(player, &tuning, &mut rng);
            assert!(enemy.pos.y >= before);
            ticks += 1;
            assert!(ticks < 200);
        }
        assert!(enemy.pos.y >= enemy.target_y);
        assert!((enemy.direction - 0.25 * std::f32::consts::TAU).abs() < 1e-5);
    }

    #[test]
    fn test_speed_eases_without_overshoot() {
        let tuning = Tuning::default();
        let mut rng = SimRng::new(11);
        let mut enemy = Enemy::spawn(1, Vec2::new(900.0, 400.0), 0.0, &tuning, &mut rng);
        enemy.state = EnemyState::Roaming;
        enemy.max_speed = tuning.fast_speed;
        enemy.speed_switch_ms = 1.0e9;

        for _ in 0..200 {
            enemy.update(Vec2::new(-5000.0, -5000.0), &tuning, &mut rng);
            assert!(enemy.speed <= tuning.fast_speed);
        }
        assert_eq!(enemy.speed, tuning.fast_speed);

        enemy.max_speed = tuning.slow_speed;
        for _ in 0..200 {
            enemy.update(Vec2::new(-5000.0, -5000.0), &tuning, &mut rng);
            assert!(enemy.speed >= tuning.slow_speed);
        }
        assert_eq!(enemy.speed, tuning.slow_speed);
    }

    #[test]
    fn test_speed_toggles_after_switch_window() {
        let tuning = Tuning::default();
        let mut rng = FixedRng(0.9);
        let mut enemy = Enemy::spawn(1, Vec2::new(900.0, 400.0), 0.0, &tuning, &mut rng);
        enemy.state = EnemyState::Roaming;
        assert_eq!(enemy.max_speed, tuning.slow_speed);

        enemy.speed_switch_ms = 10.0;
        enemy.update(Vec2::new(100.0, 100.0), &tuning, &mut rng);
        assert_eq!(enemy.max_speed, tuning.fast_speed);
        assert!(enemy.speed_switch_ms >= 2000.0 && enemy.speed_switch_ms < 5000.0);
    }

    #[test]
    fn test_close_player_forces_flee_heading() {
        let tuning = Tuning::default();
        let mut rng = SimRng::new(2);
        let mut enemy = Enemy::spawn(1, Vec2::new(900.0, 400.0), 0.0, &tuning, &mut rng);
        enemy.state = EnemyState::Roaming;
        enemy.direction_timer = 1;

        // Player 50 units to the left: mix = 1, heading points straight right
        enemy.update(Vec2::new(850.0, 400.0), &tuning, &mut rng);
        assert!(enemy.direction.abs() < 1e-5);
        assert!((30..=60).contains(&enemy.direction_timer));
    }

    #[test]
    fn test_distant_player_blends_random_and_flee_heading() {
        let tuning = Tuning::default();
        let mut enemy = Enemy::spawn(1, Vec2::new(900.0, 400.0), 0.0, &tuning, &mut SimRng::new(2));
        enemy.state = EnemyState::Roaming;
        enemy.direction_timer = 1;

        // Player 400 units straight above: away heading is +90 degrees, mix = 200/400
        let mut rng = FixedRng(0.5);
        enemy.update(Vec2::new(900.0, 0.0), &tuning, &mut rng);

        let avoid = std::f32::consts::FRAC_PI_2;
        let random = 0.5 * std::f32::consts::TAU;
        let expected = avoid * 0.5 + random * 0.5;
        assert!((enemy.direction - expected).abs() < 1e-5);
        assert!((30..=60).contains(&enemy.direction_timer));
    }

    #[test]
    fn test_degenerate_flee_skips_heading_change() {
        let tuning = Tuning::default();
        let mut rng = SimRng::new(2);
        let mut enemy = Enemy::spawn(1, Vec2::new(900.0, 400.0), 0.0, &tuning, &mut rng);
        enemy.state = EnemyState::Roaming;
        enemy.direction = 1.0;
        enemy.direction_timer = 1;
        enemy.max_speed = 0.0;

        let on_enemy = enemy.pos;
        enemy.update(on_enemy, &tuning, &mut rng);
        assert_eq!(enemy.direction, 1.0);
        assert!(enemy.direction.is_finite());
        assert_eq!(enemy.direction_timer, 0);
    }

    #[test]
    fn test_downward_drift_damped_low_on_screen() {
        let tuning = Tuning::default();
        let mut rng = SimRng::new(4);
        let mut enemy = Enemy::spawn(1, Vec2::new(900.0, 840.0), 0.0, &tuning, &mut rng);
        enemy.state = EnemyState::Roaming;
        enemy.direction = std::f32::consts::FRAC_PI_2;
        enemy.direction_timer = 1000;
        enemy.speed = 7.0;
        enemy.max_speed = 7.0;
        enemy.speed_switch_ms = 1.0e9;

        enemy.update(Vec2::new(-5000.0, -5000.0), &tuning, &mut rng);
        // 300 below the midline: exp(-3) * 7
        let expected = 840.0 + 7.0 * (-3.0f32).exp();
        assert!((enemy.pos.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_clamped_to_play_area() {
        let tuning = Tuning::default();
        let mut rng = SimRng::new(4);
        let mut enemy = Enemy::spawn(1, Vec2::new(-500.0, -500.0), 0.0, &tuning, &mut rng);
        enemy.update(Vec2::ZERO, &tuning, &mut rng);
        assert_eq!(enemy.pos.x, 30.0);
        assert!(enemy.pos.y >= 30.0);
    }

    #[test]
    fn test_emission_points_first_and_last_glyph() {
        let mut enemy = enemy_with_length(6);
        enemy.pos = Vec2::new(1000.0, 200.0);
        let [left, right] = enemy.emission_points();
        // 6 glyphs * 30 wide: first glyph centre at -75, last at +75
        assert!((left.x - 925.0).abs() < 1e-3);
        assert!((right.x - 1075.0).abs() < 1e-3);
        assert_eq!(left.y, 200.0);
    }
}
