//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`] so sessions can be rebalanced
//! from a JSON file without touching the simulation code. Missing fields fall
//! back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rule-set presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RuleSet {
    /// Shrinking player hitbox, shockwave on hit, elite dual-pattern fire
    #[default]
    Full,
    /// Fixed player hitbox, no shockwave
    Classic,
}

impl RuleSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSet::Full => "Full",
            RuleSet::Classic => "Classic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "full" => Some(RuleSet::Full),
            "classic" | "simple" => Some(RuleSet::Classic),
            _ => None,
        }
    }
}

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game balance values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub rule_set: RuleSet,

    // === Play area ===
    pub play_width: f32,
    pub play_height: f32,
    pub render_scale: f32,
    pub render_offset_y: f32,
    pub tick_ms: f64,

    // === Player ===
    pub player_start: (f32, f32),
    pub player_accel: f32,
    pub player_friction: f32,
    pub player_max_speed: f32,
    /// Roam area as a multiple of the visible play area
    pub roam_margin: f32,
    /// Height reserved at the bottom of the roam area for the hull
    pub roam_bottom_inset: f32,
    /// Ticks between shots while fire is held
    pub fire_cadence_ticks: u32,
    /// Player hit radius per damage stage (index = hit count, last entry sticks)
    pub player_hit_radii: Vec<f32>,
    pub max_hits: u32,
    pub player_shake_ticks: u32,
    pub player_shake_intensity: f32,
    pub screen_shake_ms: f64,
    pub shockwave: bool,
    pub shockwave_radius: f32,

    // === Bullets ===
    pub player_bullet_speed: f32,
    pub player_bullet_radius: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_radius: f32,

    // === Enemies ===
    pub glyph_size: f32,
    pub glyph_advance: f32,
    pub elite_threshold: u8,
    pub descent_speed: f32,
    pub slow_speed: f32,
    pub fast_speed: f32,
    pub roam_accel: f32,
    pub speed_switch_ms: (f32, f32),
    pub direction_change_ticks: (u32, u32),
    pub flee_distance: f32,
    pub descent_damping: f32,
    /// Target descent height as fractions of the play height
    pub target_y_band: (f32, f32),
    pub spawn_immunity_ms: f64,
    pub hit_shake_ticks: u32,
    pub hit_shake_intensity: f32,
    pub enemy_color: u32,
    pub elite_color: u32,

    // === Attacks ===
    pub random_shot_chance: f32,
    pub elite_shoot_interval_ms: f32,
    pub pattern_arms: u32,
    pub spiral_factor: f32,
    pub spiral_time_factor: f32,
    pub spiral_speed: f32,
    pub spiral_speed_jitter: f32,
    pub rotated_offset: f32,

    // === Waves ===
    pub wave_size: (u32, u32),
    pub elite_cap: u32,
    pub demoted_glyphs: (u8, u8),
    pub wave_cooldown_ms: f64,
    /// Horizontal spawn band as fractions of the play width
    pub spawn_band: (f32, f32),
    pub spawn_spacing: f32,
    pub spawn_jitter: f32,
    /// Non-elite survivors tolerated before the next wave may start
    pub straggler_limit: usize,

    // === Particles ===
    pub text_explosion_density: u32,
    pub small_explosion_count: u32,
    pub cancel_explosion_count: u32,
    pub impact_particle_count: u32,
    pub shockwave_particle_count: u32,
    pub particle_life: f32,
    pub particle_decay: f32,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            rule_set: RuleSet::Full,

            play_width: PLAY_WIDTH,
            play_height: PLAY_HEIGHT,
            render_scale: RENDER_SCALE,
            render_offset_y: RENDER_OFFSET_Y,
            tick_ms: TICK_MS,

            player_start: (50.0, 50.0),
            player_accel: 1.0,
            player_friction: 0.5,
            player_max_speed: 10.0,
            roam_margin: 1.4,
            roam_bottom_inset: 100.0,
            fire_cadence_ticks: 6,
            player_hit_radii: vec![20.0, 14.0, 9.0],
            max_hits: 3,
            player_shake_ticks: 30,
            player_shake_intensity: 5.0,
            screen_shake_ms: 500.0,
            shockwave: true,
            shockwave_radius: 220.0,

            player_bullet_speed: 25.0,
            player_bullet_radius: 9.0,
            enemy_bullet_speed: 4.0,
            enemy_bullet_radius: 23.0,

            glyph_size: 30.0,
            glyph_advance: 30.0,
            elite_threshold: 6,
            descent_speed: 5.0,
            slow_speed: 1.0,
            fast_speed: 7.0,
            roam_accel: 0.1,
            speed_switch_ms: (2000.0, 5000.0),
            direction_change_ticks: (30, 60),
            flee_distance: 200.0,
            descent_damping: 100.0,
            target_y_band: (0.3, 0.5),
            spawn_immunity_ms: 1000.0,
            hit_shake_ticks: 15,
            hit_shake_intensity: 5.0,
            enemy_color: 0xFFFFFF,
            elite_color: 0xFFFFFF,

            random_shot_chance: 0.01,
            elite_shoot_interval_ms: 700.0,
            pattern_arms: 6,
            spiral_factor: 0.2,
            spiral_time_factor: 0.001,
            spiral_speed: 3.0,
            spiral_speed_jitter: 0.5,
            rotated_offset: std::f32::consts::PI / 12.0,

            wave_size: (4, 8),
            elite_cap: 2,
            demoted_glyphs: (3, 5),
            wave_cooldown_ms: 3000.0,
            spawn_band: (0.3, 0.7),
            spawn_spacing: 50.0,
            spawn_jitter: 20.0,
            straggler_limit: 2,

            text_explosion_density: 50,
            small_explosion_count: 10,
            cancel_explosion_count: 15,
            impact_particle_count: 50,
            shockwave_particle_count: 8,
            particle_life: 100.0,
            particle_decay: 3.0,
            max_particles: 4096,
        }
    }
}

impl Tuning {
    /// Create tuning from a rule-set preset (applies preset defaults)
    pub fn from_rule_set(rule_set: RuleSet) -> Self {
        let mut tuning = Self::default();
        tuning.apply_rule_set(rule_set);
        tuning
    }

    /// Apply a rule-set preset (updates rule-dependent values)
    pub fn apply_rule_set(&mut self, rule_set: RuleSet) {
        self.rule_set = rule_set;
        match rule_set {
            RuleSet::Full => {
                self.player_hit_radii = vec![20.0, 14.0, 9.0];
                self.shockwave = true;
            }
            RuleSet::Classic => {
                self.player_hit_radii = vec![20.0];
                self.shockwave = false;
            }
        }
    }

    /// Player hit radius for the given damage stage
    pub fn hit_radius(&self, hit_count: u32) -> f32 {
        let last = self.player_hit_radii.len().saturating_sub(1);
        let stage = (hit_count as usize).min(last);
        self.player_hit_radii.get(stage).copied().unwrap_or(0.0)
    }

    /// Parse and validate tuning from JSON.
    ///
    /// The file's `rule_set` preset fills in every rule-dependent value the
    /// file does not set itself.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let explicit_radii = value.get("player_hit_radii").is_some();
        let explicit_shockwave = value.get("shockwave").is_some();

        let mut tuning: Tuning = serde_json::from_value(value)?;
        let preset = Self::from_rule_set(tuning.rule_set);
        if !explicit_radii {
            tuning.player_hit_radii = preset.player_hit_radii;
        }
        if !explicit_shockwave {
            tuning.shockwave = preset.shockwave;
        }
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {} ({})", path.as_ref().display(), tuning.rule_set.as_str());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid { field, reason: reason.into() }
        }

        if self.play_width <= 0.0 || self.play_height <= 0.0 {
            return Err(invalid("play_width/play_height", "play area must be positive"));
        }
        if self.tick_ms <= 0.0 {
            return Err(invalid("tick_ms", "tick length must be positive"));
        }
        if self.player_bullet_speed <= 0.0 || self.enemy_bullet_speed <= 0.0 {
            return Err(invalid("bullet speed", "bullet speeds must be positive"));
        }
        if self.player_bullet_radius <= 0.0 || self.enemy_bullet_radius <= 0.0 {
            return Err(invalid("bullet radius", "bullet radii must be positive"));
        }
        if self.player_hit_radii.is_empty() {
            return Err(invalid("player_hit_radii", "at least one damage stage is required"));
        }
        if self.max_hits == 0 {
            return Err(invalid("max_hits", "must allow at least one hit"));
        }
        if !(MIN_GLYPHS..=MAX_GLYPHS).contains(&self.elite_threshold) {
            return Err(invalid(
                "elite_threshold",
                format!("must lie in {MIN_GLYPHS}..={MAX_GLYPHS}, got {}", self.elite_threshold),
            ));
        }
        let (lo, hi) = self.demoted_glyphs;
        if lo < MIN_GLYPHS || hi < lo || hi >= self.elite_threshold {
            return Err(invalid("demoted_glyphs", "range must sit below the elite threshold"));
        }
        if self.player_max_speed <= 0.0 {
            return Err(invalid("player_max_speed", "must be positive"));
        }
        if self.roam_margin <= 0.0 {
            return Err(invalid("roam_margin", "must be positive"));
        }
        if self.glyph_size <= 0.0 || self.glyph_advance <= 0.0 {
            return Err(invalid("glyph_size/glyph_advance", "glyph metrics must be positive"));
        }
        if self.descent_damping <= 0.0 {
            return Err(invalid("descent_damping", "must be positive"));
        }
        let (lo, hi) = self.wave_size;
        if lo == 0 || hi < lo {
            return Err(invalid("wave_size", format!("empty range {lo}..={hi}")));
        }
        let (lo, hi) = self.direction_change_ticks;
        if hi < lo {
            return Err(invalid("direction_change_ticks", "max below min"));
        }
        if self.pattern_arms == 0 {
            return Err(invalid("pattern_arms", "patterns need at least one arm"));
        }
        Ok(())
    }
}
