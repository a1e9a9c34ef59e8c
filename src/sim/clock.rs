//! Wall-clock to fixed-tick scheduling
//!
//! The simulation advances in fixed `TICK_MS` steps. A frame driver feeds
//! monotonic wall-clock readings into [`FrameScheduler`], which answers how
//! many whole ticks to run this frame. Rendering cadence never changes what
//! the simulation computes.

use std::time::Instant;

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// `Instant`-backed clock, zeroed at construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    tick_ms: f64,
    max_substeps: u32,
    max_frame_ms: f64,
    accumulator: f64,
    last_ms: Option<f64>,
}

impl FrameScheduler {
    pub fn new(tick_ms: f64, max_substeps: u32, max_frame_ms: f64) -> Self {
        Self {
            tick_ms,
            max_substeps,
            max_frame_ms,
            accumulator: 0.0,
            last_ms: None,
        }
    }

    /// Number of ticks to run for a frame observed at `now_ms`.
    ///
    /// The first call only primes the scheduler. Gaps longer than
    /// `max_frame_ms` are clamped, and at most `max_substeps` ticks run per
    /// frame; any backlog beyond that is dropped rather than carried.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 0;
        };
        let elapsed = (now_ms - last).clamp(0.0, self.max_frame_ms);
        self.accumulator += elapsed;

        let mut ticks = 0;
        while self.accumulator >= self.tick_ms && ticks < self.max_substeps {
            self.accumulator -= self.tick_ms;
            ticks += 1;
        }
        if ticks == self.max_substeps {
            self.accumulator %= self.tick_ms;
        }
        ticks
    }

    /// Fraction of a tick left in the accumulator (for render interpolation)
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.tick_ms
    }
}
