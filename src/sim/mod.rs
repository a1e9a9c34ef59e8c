//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod attack;
pub mod bullet;
pub mod clock;
pub mod collision;
pub mod enemy;
pub mod particle;
pub mod player;
pub mod rng;
pub mod state;
pub mod store;
pub mod tick;
pub mod wave;

pub use attack::{AttackPattern, fire_aimed, fire_pattern, update_attacks};
pub use bullet::{BulletColor, BulletRequest, BulletSink, EnemyBullet, PlayerBullet, update_bullets};
pub use clock::{Clock, FrameScheduler, MonotonicClock};
pub use collision::{Aabb, CollisionReport, circles_overlap, resolve};
pub use enemy::{Enemy, EnemyState, health_for};
pub use particle::{Particle, ParticleSystem};
pub use player::{MoveIntent, Player};
pub use rng::{RandomSource, SimRng};
pub use state::{
    BulletView, EnemyView, GameOverChoice, GamePhase, GameState, ParticleView, PlayerView,
    SessionStats, Snapshot,
};
pub use store::EntityStore;
pub use tick::{TickInput, TickReport, tick};
pub use wave::{WaveReport, WaveSpawner};
