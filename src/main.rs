//! Glyph Raid headless driver
//!
//! Runs a session with an autopilot at a synthetic display rate and prints
//! the final session counters as JSON.
//!
//! Usage: `glyph-raid [SEED] [TICKS] [TUNING_JSON]`
//! The `GLYPH_RAID_RULES` environment variable selects a rule-set preset
//! (`full` or `classic`).

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use glam::Vec2;
    use serde::Serialize;

    use glyph_raid::consts::{MAX_FRAME_MS, MAX_SUBSTEPS};
    use glyph_raid::sim::{
        Clock, FrameScheduler, GameOverChoice, GameState, MonotonicClock, MoveIntent, SessionStats,
        TickInput, tick,
    };
    use glyph_raid::{RuleSet, Tuning};

    const DEFAULT_TICKS: u64 = 60 * 60;
    /// Synthetic display refresh rate fed to the scheduler
    const DISPLAY_HZ: f64 = 144.0;
    /// Ticks between autopilot strafe reversals
    const STRAFE_TICKS: u64 = 90;

    #[derive(Debug, Default, Serialize)]
    struct RunSummary {
        seed: u64,
        ticks: u64,
        frames: u64,
        restarts: u32,
        waves_spawned: u32,
        enemies_destroyed: u32,
        player_hits: u32,
        wall_ms: f64,
        final_stats: Option<SessionStats>,
    }

    fn load_tuning(path: Option<&str>) -> Tuning {
        let mut tuning = match path {
            Some(path) => match Tuning::load(path) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Failed to load tuning from {}: {}", path, e);
                    Tuning::default()
                }
            },
            None => Tuning::default(),
        };

        if let Ok(name) = std::env::var("GLYPH_RAID_RULES") {
            match RuleSet::from_str(&name) {
                Some(rule_set) => tuning.apply_rule_set(rule_set),
                None => log::warn!("Unknown rule set '{}', keeping {}", name, tuning.rule_set.as_str()),
            }
        }
        tuning
    }

    /// Aim at the nearest enemy, keep fire held and strafe sideways
    fn autopilot(state: &GameState) -> TickInput {
        let hit_pos = state.player.hit_position(&state.tuning);
        let target = state
            .store
            .enemies
            .iter()
            .map(|e| e.pos)
            .min_by(|a, b| a.distance_squared(hit_pos).total_cmp(&b.distance_squared(hit_pos)));

        let strafe_right = (state.time_ticks / STRAFE_TICKS) % 2 == 0;
        TickInput {
            movement: MoveIntent {
                left: !strafe_right,
                right: strafe_right,
                ..Default::default()
            },
            aim: Some(target.unwrap_or(Vec2::new(hit_pos.x, 0.0))),
            fire_pressed: !state.player.is_firing(),
            menu_choice: state.is_game_over().then_some(GameOverChoice::Restart),
            ..Default::default()
        }
    }

    pub fn run() {
        env_logger::init();

        let args: Vec<String> = std::env::args().collect();
        let seed = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(12345);
        let ticks = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_TICKS);
        let tuning = load_tuning(args.get(3).map(String::as_str));

        log::info!("Glyph Raid (headless) starting with seed {}", seed);

        let tick_ms = tuning.tick_ms;
        let mut state = GameState::with_tuning(seed, tuning);
        let mut scheduler = FrameScheduler::new(tick_ms, MAX_SUBSTEPS, MAX_FRAME_MS);
        let clock = MonotonicClock::new();
        let mut summary = RunSummary {
            seed,
            ..Default::default()
        };

        let mut frame_time = 0.0;
        scheduler.advance(frame_time);
        while summary.ticks < ticks {
            frame_time += 1000.0 / DISPLAY_HZ;
            summary.frames += 1;

            for _ in 0..scheduler.advance(frame_time) {
                let was_over = state.is_game_over();
                let input = autopilot(&state);
                let report = tick(&mut state, &input);

                if was_over && !state.is_game_over() {
                    summary.restarts += 1;
                }
                if report.wave.is_some() {
                    summary.waves_spawned += 1;
                }
                summary.enemies_destroyed += report.collisions.enemies_destroyed;
                summary.player_hits += u32::from(report.collisions.player_hit);
                summary.ticks += 1;
            }
        }

        summary.wall_ms = clock.now_ms();
        summary.final_stats = Some(state.stats());
        log::info!(
            "Simulated {} ticks in {:.1}ms ({} restarts)",
            summary.ticks,
            summary.wall_ms,
            summary.restarts
        );

        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize summary: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless driver is native only; embedders drive `sim::tick` directly
}
