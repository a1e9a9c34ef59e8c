//! Player movement integration and fire control

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::BulletSink;
use crate::tuning::Tuning;
use crate::{aim_angle, render_point};

/// Held movement keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Acceleration direction per axis (-1, 0 or 1)
    fn axes(&self) -> (f32, f32) {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        (x, y)
    }
}

/// Velocity update for one axis: accelerate while held, otherwise friction toward zero
fn integrate_axis(vel: f32, dir: f32, accel: f32, friction: f32, max_speed: f32) -> f32 {
    let vel = if dir != 0.0 {
        vel + dir * accel
    } else if vel > 0.0 {
        (vel - friction).max(0.0)
    } else if vel < 0.0 {
        (vel + friction).min(0.0)
    } else {
        0.0
    };
    vel.clamp(-max_speed, max_speed)
}

/// The controlled unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Logical position (before render scaling)
    pub pos: Vec2,
    pub vel: Vec2,
    /// Last known aim target in play-area coordinates
    pub aim: Vec2,
    /// Damage stage, only ever increases until the session resets
    pub hit_count: u32,
    pub alive: bool,
    /// Visual shake after being hit
    pub shake_ticks: u32,
    pub shake_intensity: f32,
    pub shake_offset: Vec2,
    fire_held: bool,
    fire_ticks: u32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let (x, y) = tuning.player_start;
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            aim: Vec2::ZERO,
            hit_count: 0,
            alive: true,
            shake_ticks: 0,
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
            fire_held: false,
            fire_ticks: 0,
        }
    }

    /// Render-space hull centre, used for hits and as the bullet emission point
    pub fn hit_position(&self, tuning: &Tuning) -> Vec2 {
        render_point(self.pos, tuning.render_scale, tuning.render_offset_y)
    }

    /// Apply movement input, friction and speed limit, then integrate position
    pub fn integrate(&mut self, intent: &MoveIntent, tuning: &Tuning) {
        let (ax, ay) = intent.axes();
        let accel = tuning.player_accel;
        let friction = tuning.player_friction;
        let max = tuning.player_max_speed;

        self.vel.x = integrate_axis(self.vel.x, ax, accel, friction, max);
        self.vel.y = integrate_axis(self.vel.y, ay, accel, friction, max);
        self.pos += self.vel;

        let max_x = tuning.play_width * tuning.roam_margin;
        let max_y = (tuning.play_height * tuning.roam_margin - tuning.roam_bottom_inset).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
        self.pos.y = self.pos.y.clamp(0.0, max_y);
    }

    /// Whether the fire button is currently held
    pub fn is_firing(&self) -> bool {
        self.fire_held
    }

    /// Process fire edges and the hold cadence. Returns true if a shot was fired.
    ///
    /// A press fires immediately; while held, another shot fires every
    /// `fire_cadence_ticks` ticks. A release stops the cadence.
    pub fn update_fire(
        &mut self,
        pressed: bool,
        released: bool,
        tuning: &Tuning,
        sink: &mut dyn BulletSink,
    ) -> bool {
        let mut fire = false;

        if pressed {
            self.fire_held = true;
            self.fire_ticks = 0;
            fire = true;
        } else if self.fire_held {
            self.fire_ticks += 1;
            if tuning.fire_cadence_ticks > 0 && self.fire_ticks % tuning.fire_cadence_ticks == 0 {
                fire = true;
            }
        }

        if released {
            self.fire_held = false;
            self.fire_ticks = 0;
        }

        fire && self.shoot(tuning, sink)
    }

    /// Fire one bullet toward the aim target. Skipped if the target sits on the emitter.
    fn shoot(&self, tuning: &Tuning, sink: &mut dyn BulletSink) -> bool {
        let origin = self.hit_position(tuning);
        match aim_angle(origin, self.aim) {
            Some(angle) => {
                sink.fire_player(origin, angle);
                true
            }
            None => false,
        }
    }

    /// Arm the hit shake
    pub fn arm_shake(&mut self, ticks: u32, intensity: f32) {
        self.shake_ticks = ticks;
        self.shake_intensity = intensity;
    }

    /// Count down the hit shake, with a fresh jitter offset while active
    pub fn update_shake(&mut self, jitter: Vec2) {
        if self.shake_ticks > 0 {
            self.shake_ticks -= 1;
            self.shake_offset = jitter * self.shake_intensity;
        } else {
            self.shake_offset = Vec2::ZERO;
        }
    }
}
