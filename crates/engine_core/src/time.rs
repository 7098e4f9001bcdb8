//! Time management for the frame loop.
//!
//! The clock never samples a wall clock on its own: the host hands it the delta
//! of every frame, so anything reading it stays deterministic under test.

use std::time::Duration;

/// Accumulates per-frame deltas into a session-local timeline.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since the clock was created.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of length `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get total elapsed time as Duration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (from the last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

/// Nominal display refresh step (60 Hz).
pub fn frame_step_60hz() -> Duration {
    Duration::from_secs_f64(1.0 / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_accumulates_deltas() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(20));
        assert_eq!(clock.elapsed(), Duration::from_millis(36));
        assert_eq!(clock.delta(), Duration::from_millis(20));
        assert_eq!(clock.frame_count(), 2);
        assert!((clock.fps() - 50.0).abs() < 0.01);
    }

    #[test]
    fn fresh_clock_reports_zero_fps() {
        let clock = FrameClock::new();
        assert_eq!(clock.fps(), 0.0);
        assert_eq!(clock.elapsed_seconds(), 0.0);
    }
}
