//! Wave lifecycle
//!
//! A wave is one batch of 4..=8 enemies followed by a cooldown. The next
//! batch may spawn once the field is (nearly) clear and the cooldown since
//! the previous spawn has elapsed. At most `elite_cap` elites per batch:
//! surplus elites are demoted to short plain enemies as they are created.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::rng::RandomSource;
use super::store::EntityStore;
use crate::tuning::Tuning;

/// Wave pacing state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveSpawner {
    /// Waves spawned so far this session
    pub wave: u32,
    /// Sim time of the last completed spawn
    pub last_wave_ms: f64,
    /// Set while a batch is being created
    pub spawning: bool,
}

/// Summary of one spawned batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveReport {
    pub wave: u32,
    pub spawned: u32,
    pub elites: u32,
    pub demoted: u32,
}

impl WaveSpawner {
    pub fn new(now_ms: f64) -> Self {
        Self {
            wave: 0,
            last_wave_ms: now_ms,
            spawning: false,
        }
    }

    /// True when the field is clear enough for the next batch
    pub fn is_wave_cleared(&self, store: &EntityStore, tuning: &Tuning) -> bool {
        if self.spawning {
            return false;
        }
        let no_elites = store.elite_count() == 0;
        (no_elites && store.non_elite_count() <= tuning.straggler_limit) || store.enemies.is_empty()
    }

    /// Cooldown left before another batch may spawn
    pub fn cooldown_remaining(&self, now_ms: f64, tuning: &Tuning) -> f64 {
        (tuning.wave_cooldown_ms - (now_ms - self.last_wave_ms)).max(0.0)
    }

    /// Spawn a batch if the field is clear and the cooldown has elapsed
    pub fn maybe_spawn(
        &mut self,
        store: &mut EntityStore,
        now_ms: f64,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
    ) -> Option<WaveReport> {
        if !self.is_wave_cleared(store, tuning) || now_ms - self.last_wave_ms <= tuning.wave_cooldown_ms {
            return None;
        }
        Some(self.spawn_wave(store, now_ms, tuning, rng))
    }

    /// Create a new batch of enemies staggered above the visible area
    pub fn spawn_wave(
        &mut self,
        store: &mut EntityStore,
        now_ms: f64,
        tuning: &Tuning,
        rng: &mut dyn RandomSource,
    ) -> WaveReport {
        self.spawning = true;
        self.wave += 1;

        let (min_count, max_count) = tuning.wave_size;
        let count = rng.int_inclusive(min_count, max_count);
        let (band_lo, band_hi) = tuning.spawn_band;
        let mut report = WaveReport {
            wave: self.wave,
            spawned: count,
            elites: 0,
            demoted: 0,
        };

        for i in 0..count {
            let x = tuning.play_width * rng.range(band_lo, band_hi);
            let jitter = rng.range(-tuning.spawn_jitter, tuning.spawn_jitter);
            let y = -tuning.glyph_size - i as f32 * tuning.spawn_spacing + jitter;

            let id = store.next_entity_id();
            let mut enemy = Enemy::spawn(id, Vec2::new(x, y), now_ms, tuning, rng);
            if enemy.elite {
                if report.elites >= tuning.elite_cap {
                    enemy.demote(tuning, rng);
                    report.demoted += 1;
                } else {
                    report.elites += 1;
                }
            }
            store.enemies.push(enemy);
        }

        self.spawning = false;
        self.last_wave_ms = now_ms;
        log::info!(
            "Wave {}: {} enemies ({} elite, {} demoted)",
            report.wave,
            report.spawned,
            report.elites,
            report.demoted
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{FixedRng, SimRng};
    use proptest::prelude::*;

    fn push_enemy(store: &mut EntityStore, length: u8, tuning: &Tuning) {
        let id = store.next_entity_id();
        let mut enemy = Enemy::spawn(id, Vec2::new(900.0, 100.0), 0.0, tuning, &mut SimRng::new(id as u64));
        enemy.set_length(length, tuning);
        store.enemies.push(enemy);
    }

    #[test]
    fn test_max_draw_wave() {
        let tuning = Tuning::default();
        let mut store = EntityStore::new(&tuning);
        let mut spawner = WaveSpawner::new(0.0);

        let report = spawner.spawn_wave(&mut store, 4000.0, &tuning, &mut FixedRng::max());
        assert_eq!(report.spawned, 8);
        assert_eq!(store.enemies.len(), 8);
        assert_eq!(report.elites, 2);
        assert_eq!(report.demoted, 6);

        // Every draw rolls a 10-glyph elite; from the 3rd on they are demoted
        for (i, enemy) in store.enemies.iter().enumerate() {
            if i < 2 {
                assert!(enemy.elite);
                assert_eq!(enemy.length, 10);
                assert_eq!(enemy.health, 20);
            } else {
                assert!(!enemy.elite);
                assert_eq!(enemy.length, 5);
                assert_eq!(enemy.health, 1);
                assert!(enemy.shoot_timer_ms.is_none());
            }
        }
        assert_eq!(spawner.wave, 1);
        assert_eq!(spawner.last_wave_ms, 4000.0);
        assert!(!spawner.spawning);
    }

    #[test]
    fn test_spawn_positions() {
        let tuning = Tuning::default();
        let mut store = EntityStore::new(&tuning);
        let mut spawner = WaveSpawner::new(0.0);
        spawner.spawn_wave(&mut store, 4000.0, &tuning, &mut SimRng::new(77));

        for (i, enemy) in store.enemies.iter().enumerate() {
            assert!(enemy.pos.x >= 1920.0 * 0.3 && enemy.pos.x <= 1920.0 * 0.7);
            let nominal = -30.0 - i as f32 * 50.0;
            assert!((enemy.pos.y - nominal).abs() <= 20.0);
            assert_eq!(enemy.spawned_at_ms, 4000.0);
        }
    }

    #[test]
    fn test_wave_cleared_conditions() {
        let tuning = Tuning::default();
        let mut store = EntityStore::new(&tuning);
        let mut spawner = WaveSpawner::new(0.0);
        assert!(spawner.is_wave_cleared(&store, &tuning));

        push_enemy(&mut store, 3, &tuning);
        push_enemy(&mut store, 4, &tuning);
        assert!(spawner.is_wave_cleared(&store, &tuning));

        push_enemy(&mut store, 5, &tuning);
        assert!(!spawner.is_wave_cleared(&store, &tuning));

        store.enemies.clear();
        push_enemy(&mut store, 8, &tuning);
        assert!(!spawner.is_wave_cleared(&store, &tuning));

        store.enemies.clear();
        spawner.spawning = true;
        assert!(!spawner.is_wave_cleared(&store, &tuning));
    }

    #[test]
    fn test_cooldown_gates_spawn() {
        let tuning = Tuning::default();
        let mut store = EntityStore::new(&tuning);
        let mut spawner = WaveSpawner::new(0.0);
        let mut rng = SimRng::new(5);

        assert!(spawner.maybe_spawn(&mut store, 3000.0, &tuning, &mut rng).is_none());
        assert_eq!(spawner.cooldown_remaining(2000.0, &tuning), 1000.0);
        let report = spawner.maybe_spawn(&mut store, 3001.0, &tuning, &mut rng).unwrap();
        assert_eq!(report.wave, 1);

        // Field is full now; no second wave even after the cooldown
        assert!(spawner.maybe_spawn(&mut store, 10_000.0, &tuning, &mut rng).is_none());

        store.enemies.clear();
        assert!(spawner.maybe_spawn(&mut store, 6001.0, &tuning, &mut rng).is_none());
        assert!(spawner.maybe_spawn(&mut store, 6002.0, &tuning, &mut rng).is_some());
        assert_eq!(spawner.wave, 2);
    }

    proptest! {
        #[test]
        fn prop_elite_cap_and_health(seed in any::<u64>()) {
            let tuning = Tuning::default();
            let mut store = EntityStore::new(&tuning);
            let mut spawner = WaveSpawner::new(0.0);
            let report = spawner.spawn_wave(&mut store, 0.0, &tuning, &mut SimRng::new(seed));

            prop_assert!((4..=8).contains(&report.spawned));
            prop_assert!(store.elite_count() <= 2);
            for enemy in &store.enemies {
                prop_assert!((3..=10).contains(&enemy.length));
                let expected = if enemy.length >= 6 { 2 * enemy.length as u32 } else { 1 };
                prop_assert_eq!(enemy.health, expected);
                prop_assert_eq!(enemy.elite, enemy.length >= 6);
            }
        }
    }
}
