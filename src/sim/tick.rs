//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::attack::update_attacks;
use super::bullet::update_bullets;
use super::collision::{self, CollisionReport};
use super::player::MoveIntent;
use super::rng::RandomSource;
use super::state::{GameOverChoice, GamePhase, GameState};
use super::wave::WaveReport;

/// Input signals for a single tick (deterministic)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Held movement directions
    pub movement: MoveIntent,
    /// Aim target in play-area coordinates, if the pointer moved
    pub aim: Option<Vec2>,
    /// Fire button went down this tick
    pub fire_pressed: bool,
    /// Fire button went up this tick
    pub fire_released: bool,
    /// Game-over menu decision, ignored while playing
    pub menu_choice: Option<GameOverChoice>,
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub player_fired: bool,
    pub wave: Option<WaveReport>,
    /// Enemy volleys fired this tick
    pub volleys: u32,
    pub player_bullets_expired: usize,
    pub enemy_bullets_expired: usize,
    pub collisions: CollisionReport,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();

    // Only the menu runs after game over
    if state.phase == GamePhase::GameOver {
        if let Some(choice) = input.menu_choice {
            state.resolve_game_over(choice);
        }
        return report;
    }

    state.time_ticks += 1;
    state.time_ms += state.tuning.tick_ms;
    state.screen_shake_ms = (state.screen_shake_ms - state.tuning.tick_ms).max(0.0);
    let now = state.time_ms;

    let GameState {
        tuning,
        rng,
        player,
        store,
        waves,
        effects,
        ..
    } = state;

    // 1. Player
    if let Some(aim) = input.aim {
        player.aim = aim;
    }
    player.integrate(&input.movement, tuning);
    report.player_fired = player.update_fire(input.fire_pressed, input.fire_released, tuning, store);
    let jitter = if player.shake_ticks > 0 {
        Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0))
    } else {
        Vec2::ZERO
    };
    player.update_shake(jitter);

    // 2. Waves
    report.wave = waves.maybe_spawn(store, now, tuning, rng);

    // 3. Enemy AI. Enemies are taken out so the store can collect their bullets.
    let player_hit = player.hit_position(tuning);
    let mut enemies = std::mem::take(&mut store.enemies);
    for enemy in enemies.iter_mut() {
        enemy.update(player_hit, tuning, rng);
        report.volleys += update_attacks(enemy, player_hit, now, tuning, rng, store);
    }
    store.enemies = enemies;

    // 4. Bullets
    let (player_expired, enemy_expired) =
        update_bullets(&mut store.player_bullets, &mut store.enemy_bullets, tuning.play_height);
    report.player_bullets_expired = player_expired;
    report.enemy_bullets_expired = enemy_expired;

    // 5. Collisions
    report.collisions = collision::resolve(store, player, now, tuning, effects, rng);

    // 6. Particles
    effects.update(&mut store.particles);

    store.normalize_order();

    if report.collisions.player_hit {
        state.screen_shake_ms = state.tuning.screen_shake_ms;
    }
    if report.collisions.player_killed {
        state.phase = GamePhase::GameOver;
        state.pending_choice = None;
        log::info!(
            "Game over at wave {} after {} ticks",
            state.waves.wave,
            state.time_ticks
        );
    }

    report
}
