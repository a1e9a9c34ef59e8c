//! Session state and render snapshots
//!
//! A [`GameState`] is one play session: the player, the entity store, wave
//! pacing, the seeded RNG and the simulated clock. Everything the renderer
//! needs is exposed through [`GameState::snapshot`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::BulletColor;
use super::enemy::EnemyState;
use super::particle::ParticleSystem;
use super::player::Player;
use super::rng::SimRng;
use super::store::EntityStore;
use super::wave::WaveSpawner;
use crate::aim_angle;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Hit count reached the terminal threshold; only the menu runs
    GameOver,
}

/// Decision taken on the game-over menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverChoice {
    /// Start a fresh session
    Restart,
    /// Stay on the game-over screen
    Quit,
}

/// Complete session state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    #[serde(skip)]
    pub rng: SimRng,
    /// Simulated clock, advanced by exactly one tick length per tick
    pub time_ms: f64,
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Last decision taken on the game-over menu
    pub pending_choice: Option<GameOverChoice>,
    pub player: Player,
    pub store: EntityStore,
    pub waves: WaveSpawner,
    /// Remaining screen shake after a player hit
    pub screen_shake_ms: f64,
    #[serde(skip)]
    pub effects: ParticleSystem,
}

impl GameState {
    /// Create a new session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new session with the given tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let effects = ParticleSystem::new(tuning.particle_life, tuning.particle_decay, tuning.max_particles);
        Self {
            seed,
            rng: SimRng::new(seed),
            time_ms: 0.0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            pending_choice: None,
            player: Player::new(&tuning),
            store: EntityStore::new(&tuning),
            waves: WaveSpawner::new(0.0),
            screen_shake_ms: 0.0,
            effects,
            tuning,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Apply the game-over menu decision
    pub fn resolve_game_over(&mut self, choice: GameOverChoice) {
        if self.phase != GamePhase::GameOver {
            return;
        }
        self.pending_choice = Some(choice);
        match choice {
            GameOverChoice::Restart => self.restart(),
            GameOverChoice::Quit => log::info!("Session ended after wave {}", self.waves.wave),
        }
    }

    /// Reset the session in place. The clock keeps running so the wave
    /// cooldown restarts from now.
    pub fn restart(&mut self) {
        log::info!("Restarting session (reached wave {})", self.waves.wave);
        self.player = Player::new(&self.tuning);
        self.store.clear();
        self.waves = WaveSpawner::new(self.time_ms);
        self.phase = GamePhase::Playing;
        self.pending_choice = None;
        self.screen_shake_ms = 0.0;
    }

    /// Counters for persistence/debug overlays
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            wave: self.waves.wave,
            wave_cooldown_remaining_ms: self.waves.cooldown_remaining(self.time_ms, &self.tuning),
            hit_count: self.player.hit_count,
            game_over: self.is_game_over(),
            enemies: self.store.enemies.len(),
            elites: self.store.elite_count(),
            player_bullets: self.store.player_bullets.len(),
            enemy_bullets: self.store.enemy_bullets.len(),
            particles: self.store.particles.len(),
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        let tuning = &self.tuning;
        let hit_pos = self.player.hit_position(tuning);

        let player = PlayerView {
            pos: self.player.pos,
            hit_pos,
            aim_angle: aim_angle(hit_pos, self.player.aim),
            hit_count: self.player.hit_count,
            hit_radius: tuning.hit_radius(self.player.hit_count),
            shake_offset: self.player.shake_offset,
            alive: self.player.alive,
        };

        let enemies = self
            .store
            .enemies
            .iter()
            .map(|e| EnemyView {
                id: e.id,
                pos: e.pos,
                length: e.length,
                elite: e.elite,
                health: e.health,
                color: e.color,
                shake_offset: e.shake_offset,
                state: e.state,
                immune: e.is_immune(self.time_ms),
            })
            .collect();

        let player_bullets = self
            .store
            .player_bullets
            .iter()
            .map(|b| BulletView {
                id: b.id,
                pos: b.pos,
                angle: b.angle,
                radius: b.radius,
                color: None,
            })
            .collect();

        let enemy_bullets = self
            .store
            .enemy_bullets
            .iter()
            .map(|b| BulletView {
                id: b.id,
                pos: b.pos,
                angle: b.angle,
                radius: b.radius,
                color: Some(b.color),
            })
            .collect();

        let particles = self
            .store
            .particles
            .iter()
            .map(|p| ParticleView {
                pos: p.pos,
                radius: p.radius,
                alpha: p.alpha(),
                color: p.color,
            })
            .collect();

        Snapshot {
            tick: self.time_ticks,
            time_ms: self.time_ms,
            wave: self.waves.wave,
            player,
            enemies,
            player_bullets,
            enemy_bullets,
            particles,
            screen_shake: self.screen_shake_ms > 0.0,
            game_over: self.is_game_over(),
            pending_choice: self.pending_choice,
        }
    }
}

/// Session counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub wave: u32,
    pub wave_cooldown_remaining_ms: f64,
    pub hit_count: u32,
    pub game_over: bool,
    pub enemies: usize,
    pub elites: usize,
    pub player_bullets: usize,
    pub enemy_bullets: usize,
    pub particles: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    /// Render-space hull centre
    pub hit_pos: Vec2,
    pub aim_angle: Option<f32>,
    pub hit_count: u32,
    pub hit_radius: f32,
    pub shake_offset: Vec2,
    pub alive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub length: u8,
    pub elite: bool,
    pub health: u32,
    pub color: u32,
    pub shake_offset: Vec2,
    pub state: EnemyState,
    pub immune: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub id: u32,
    pub pos: Vec2,
    pub angle: f32,
    pub radius: f32,
    /// Enemy bullets only
    pub color: Option<BulletColor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub color: u32,
}

/// Everything a renderer draws for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time_ms: f64,
    pub wave: u32,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub player_bullets: Vec<BulletView>,
    pub enemy_bullets: Vec<BulletView>,
    pub particles: Vec<ParticleView>,
    pub screen_shake: bool,
    pub game_over: bool,
    pub pending_choice: Option<GameOverChoice>,
}
