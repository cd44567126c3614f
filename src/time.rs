//! Frame timing

use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    pub now: Instant,
    pub frame_index: u64,
}

/// Monotonic clock producing per-frame delta times.
///
/// Delta time is clamped so that a stall (window drag, debugger pause)
/// does not translate into one huge camera step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the baseline, e.g. after the window regains focus.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to an explicit instant.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let frame = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        frame
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_reports_elapsed_time() {
        let mut clock = FrameClock::new();
        let start = clock.last;
        let frame = clock.tick_at(start + Duration::from_millis(16));
        assert!((frame.dt - 0.016).abs() < 1e-6);
        assert_eq!(frame.frame_index, 0);
        assert_eq!(clock.tick_at(start + Duration::from_millis(32)).frame_index, 1);
    }

    #[test]
    fn test_tick_clamps_stalls() {
        let mut clock = FrameClock::new();
        let start = clock.last;
        let frame = clock.tick_at(start + Duration::from_secs(5));
        assert!((frame.dt - 0.25).abs() < 1e-6);

        // Same instant again: clamped up to the minimum
        let frame = clock.tick_at(start + Duration::from_secs(5));
        assert!(frame.dt > 0.0);
    }
}
