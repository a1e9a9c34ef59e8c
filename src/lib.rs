//! Glyph Raid - simulation core for a glyph-enemy arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, enemy AI, waves, collisions)
//! - `tuning`: Data-driven game balance and rule-set presets
//!
//! Rendering, audio and input capture live outside this crate. The core
//! consumes primitive input signals through [`sim::TickInput`] and exposes
//! read-only state through [`sim::Snapshot`].

pub mod sim;
pub mod tuning;

pub use tuning::{RuleSet, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock gap fed to the scheduler (stalls beyond this are dropped)
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Play area dimensions (base resolution)
    pub const PLAY_WIDTH: f32 = 1920.0;
    pub const PLAY_HEIGHT: f32 = 1080.0;

    /// Player position -> render position scale
    pub const RENDER_SCALE: f32 = 0.7;
    /// Vertical offset from the player's logical origin to its hull centre
    pub const RENDER_OFFSET_Y: f32 = 62.0;

    /// Glyph-run length bounds for enemies
    pub const MIN_GLYPHS: u8 = 3;
    pub const MAX_GLYPHS: u8 = 10;
}

/// Distance below which a direction vector is treated as degenerate
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// Heading angle of a direction vector, or `None` if it has no direction
#[inline]
pub fn heading(dir: Vec2) -> Option<f32> {
    if dir.length_squared() < DIRECTION_EPSILON * DIRECTION_EPSILON {
        None
    } else {
        Some(dir.y.atan2(dir.x))
    }
}

/// Angle pointing from `from` toward `to`
#[inline]
pub fn aim_angle(from: Vec2, to: Vec2) -> Option<f32> {
    heading(to - from)
}

/// Unit vector for a heading angle
#[inline]
pub fn unit_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Map a logical player position to its render-space hull centre
#[inline]
pub fn render_point(pos: Vec2, scale: f32, offset_y: f32) -> Vec2 {
    Vec2::new(pos.x * scale, (pos.y + offset_y) * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_heading_degenerate() {
        assert!(heading(Vec2::ZERO).is_none());
        assert!(aim_angle(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_heading_straight_up() {
        let angle = heading(Vec2::new(0.0, -10.0)).unwrap();
        assert!((angle + FRAC_PI_2).abs() < 1e-6);
        let dir = unit_vector(angle);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_render_point() {
        let p = render_point(Vec2::new(100.0, 38.0), 0.7, 62.0);
        assert!((p.x - 70.0).abs() < 1e-4);
        assert!((p.y - 70.0).abs() < 1e-4);
    }
}
