//! End-to-end session tests driven through the public tick API

use glam::Vec2;
use glyph_raid::sim::{
    BulletColor, BulletRequest, BulletSink, EnemyState, FrameScheduler, GameOverChoice, GamePhase,
    GameState, MoveIntent, TickInput, tick,
};
use glyph_raid::{RuleSet, Tuning, TuningError};

fn idle() -> TickInput {
    TickInput::default()
}

fn run_until_wave(state: &mut GameState) {
    for _ in 0..400 {
        if state.waves.wave > 0 {
            return;
        }
        tick(state, &idle());
    }
    panic!("no wave spawned within 400 ticks");
}

/// Drop a motionless enemy bullet onto the player's hull
fn bullet_on_player(state: &mut GameState, offset: Vec2) {
    let at = state.player.hit_position(&state.tuning) + offset;
    state.store.fire_enemy(BulletRequest {
        pos: at,
        angle: 0.0,
        speed: 0.0,
        color: BulletColor::Red,
    });
}

fn firing_input(state: &GameState) -> TickInput {
    let target = state
        .store
        .enemies
        .first()
        .map(|e| e.pos)
        .unwrap_or(Vec2::new(960.0, 0.0));
    TickInput {
        movement: MoveIntent {
            right: state.time_ticks % 200 < 100,
            left: state.time_ticks % 200 >= 100,
            ..Default::default()
        },
        aim: Some(target),
        fire_pressed: !state.player.is_firing(),
        menu_choice: Some(GameOverChoice::Restart),
        ..Default::default()
    }
}

#[test]
fn test_first_wave_descends_then_roams() {
    let mut state = GameState::new(2024);
    run_until_wave(&mut state);

    // Spawn happens only once the 3000ms cooldown has strictly elapsed
    assert!(state.time_ms > 3000.0);
    let stats = state.stats();
    assert!((4..=8).contains(&stats.enemies));
    assert!(stats.elites <= 2);
    assert!(state.store.enemies.iter().all(|e| e.state == EnemyState::Descending));

    // Target band tops out at half the play height: 5px per tick gets there in ~110 ticks
    for _ in 0..150 {
        tick(&mut state, &idle());
    }
    assert!(state.store.enemies.iter().all(|e| e.state == EnemyState::Roaming));
    for enemy in &state.store.enemies {
        assert!(enemy.pos.x >= enemy.height && enemy.pos.x <= state.tuning.play_width - enemy.height);
        assert!(enemy.pos.y >= enemy.height && enemy.pos.y <= state.tuning.play_height - enemy.height);
    }
}

#[test]
fn test_spawn_immunity_window() {
    let mut state = GameState::new(7);
    run_until_wave(&mut state);
    assert!(state.snapshot().enemies.iter().all(|e| e.immune));

    // 1000ms is 60 ticks at 60 Hz
    for _ in 0..61 {
        tick(&mut state, &idle());
    }
    if !state.is_game_over() {
        assert!(state.snapshot().enemies.iter().all(|e| !e.immune));
    }
}

#[test]
fn test_same_seed_same_session() {
    let mut a = GameState::new(99);
    let mut b = GameState::new(99);
    for _ in 0..1500 {
        let input = firing_input(&a);
        tick(&mut a, &input);
        let input = firing_input(&b);
        tick(&mut b, &input);
    }

    assert_eq!(a.stats(), b.stats());
    assert_eq!(
        serde_json::to_string(&a.snapshot()).unwrap(),
        serde_json::to_string(&b.snapshot()).unwrap()
    );
}

#[test]
fn test_different_seeds_diverge() {
    let mut a = GameState::new(1);
    let mut b = GameState::new(2);
    for _ in 0..300 {
        tick(&mut a, &idle());
        tick(&mut b, &idle());
    }
    assert_ne!(
        serde_json::to_string(&a.snapshot().enemies).unwrap(),
        serde_json::to_string(&b.snapshot().enemies).unwrap()
    );
}

#[test]
fn test_three_hits_end_session_then_restart() {
    let mut state = GameState::new(5);
    let radii: Vec<f32> = (0..3).map(|n| state.tuning.hit_radius(n)).collect();
    assert_eq!(radii, vec![20.0, 14.0, 9.0]);

    for expected in 1..=3 {
        bullet_on_player(&mut state, Vec2::ZERO);
        let report = tick(&mut state, &idle());
        assert!(report.collisions.player_hit);
        assert_eq!(state.player.hit_count, expected);
    }
    assert_eq!(state.phase, GamePhase::GameOver);
    let snapshot = state.snapshot();
    assert!(snapshot.game_over);
    assert!(snapshot.screen_shake);
    assert!(!snapshot.player.alive);

    // Frozen: further bullets and ticks change nothing
    let frozen_at = state.time_ms;
    tick(&mut state, &idle());
    assert_eq!(state.time_ms, frozen_at);

    tick(
        &mut state,
        &TickInput {
            menu_choice: Some(GameOverChoice::Restart),
            ..Default::default()
        },
    );
    let stats = state.stats();
    assert!(!stats.game_over);
    assert_eq!(stats.hit_count, 0);
    assert_eq!(stats.wave, 0);
    assert_eq!(stats.enemy_bullets, 0);
    assert_eq!(stats.wave_cooldown_remaining_ms, 3000.0);
}

#[test]
fn test_shockwave_depends_on_rule_set() {
    // A second bullet 100px below the hull: outside the hit radius, inside the shockwave
    let below = Vec2::new(0.0, 100.0);

    let mut full = GameState::new(3);
    bullet_on_player(&mut full, Vec2::ZERO);
    bullet_on_player(&mut full, below);
    let report = tick(&mut full, &idle());
    assert!(report.collisions.player_hit);
    assert_eq!(report.collisions.shockwave_cleared, 1);
    assert!(full.store.enemy_bullets.is_empty());
    assert_eq!(full.snapshot().player.hit_radius, 14.0);

    let mut classic = GameState::with_tuning(3, Tuning::from_rule_set(RuleSet::Classic));
    bullet_on_player(&mut classic, Vec2::ZERO);
    bullet_on_player(&mut classic, below);
    let report = tick(&mut classic, &idle());
    assert!(report.collisions.player_hit);
    assert_eq!(report.collisions.shockwave_cleared, 0);
    assert_eq!(classic.store.enemy_bullets.len(), 1);
    assert_eq!(classic.snapshot().player.hit_radius, 20.0);
}

#[test]
fn test_scheduler_drives_ticks_independent_of_frame_rate() {
    let tick_ms = Tuning::default().tick_ms;
    let mut slow = GameState::new(11);
    let mut fast = GameState::new(11);

    for (state, hz) in [(&mut slow, 30.0), (&mut fast, 240.0)] {
        let mut scheduler = FrameScheduler::new(tick_ms, 8, 250.0);
        scheduler.advance(0.0);
        let mut t = 0.0;
        while state.time_ticks < 300 {
            t += 1000.0 / hz;
            for _ in 0..scheduler.advance(t) {
                if state.time_ticks < 300 {
                    tick(state, &idle());
                }
            }
        }
    }

    assert_eq!(slow.time_ticks, fast.time_ticks);
    assert_eq!(
        serde_json::to_string(&slow.snapshot()).unwrap(),
        serde_json::to_string(&fast.snapshot()).unwrap()
    );
}

#[test]
fn test_tuning_file_errors() {
    let dir = std::env::temp_dir();

    let good = dir.join(format!("glyph-raid-tuning-{}.json", std::process::id()));
    std::fs::write(&good, r#"{ "max_hits": 4, "wave_cooldown_ms": 1500.0 }"#).unwrap();
    let tuning = Tuning::load(&good).unwrap();
    assert_eq!(tuning.max_hits, 4);
    assert_eq!(tuning.wave_cooldown_ms, 1500.0);
    std::fs::remove_file(&good).unwrap();

    let bad = dir.join(format!("glyph-raid-bad-{}.json", std::process::id()));
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(matches!(Tuning::load(&bad), Err(TuningError::Parse(_))));
    std::fs::remove_file(&bad).unwrap();

    let missing = dir.join("glyph-raid-does-not-exist.json");
    assert!(matches!(Tuning::load(&missing), Err(TuningError::Io(_))));

    assert!(matches!(
        Tuning::from_json(r#"{ "max_hits": 0 }"#),
        Err(TuningError::Invalid { field: "max_hits", .. })
    ));
}
