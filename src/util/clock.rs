//! Time sources.
//!
//! The manager reads time for the stop debounce, tweens, click timing and
//! raycast throttling. Hosts use [`SystemClock`]; tests drive a
//! [`ManualClock`] by hand.

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by `web_time::Instant` (performance.now() on WASM).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Clock frozen at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Frame-delta timer with a smoothed FPS readout.
pub struct FrameTimer {
    /// Last frame timestamp
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f64,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f64,
    /// Upper bound for a single frame delta, so a stalled tab does not
    /// produce one giant step
    max_delta: Duration,
}

impl FrameTimer {
    /// Timer starting now.
    #[must_use]
    pub fn new(clock: &dyn Clock) -> Self {
        Self {
            last_frame: clock.now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
            max_delta: Duration::from_millis(250),
        }
    }

    /// Seconds since the previous call, capped.
    pub fn tick(&mut self, clock: &dyn Clock) -> f64 {
        let now = clock.now();
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;

        let frame_time = elapsed.as_secs_f64();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        elapsed.min(self.max_delta).as_secs_f64()
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = clock.now();
        other.advance(Duration::from_millis(40));
        assert_eq!(clock.now() - start, Duration::from_millis(40));
    }

    #[test]
    fn frame_timer_reports_and_caps_delta() {
        let clock = ManualClock::new();
        let mut timer = FrameTimer::new(&clock);
        clock.advance(Duration::from_millis(20));
        assert!((timer.tick(&clock) - 0.02).abs() < 1e-9);
        clock.advance(Duration::from_secs(5));
        assert!((timer.tick(&clock) - 0.25).abs() < 1e-9);
        assert!(timer.fps() > 0.0);
    }
}
