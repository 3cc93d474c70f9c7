use std::time::{Duration, Instant};

/// Delta time reported for the very first frame, before any interval exists.
pub const FIRST_FRAME_DT: f32 = 1.0 / 60.0;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick; [`FIRST_FRAME_DT`] on the first tick.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Monotonic clock producing per-frame delta time.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// hand the GUI a multi-second step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: None,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Forgets the previous tick; the next one reports [`FIRST_FRAME_DT`].
    ///
    /// Useful after a device reset or when resuming from suspension.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = match self.last {
            None => FIRST_FRAME_DT,
            Some(last) => now
                .saturating_duration_since(last)
                .clamp(self.dt_min, self.dt_max)
                .as_secs_f32(),
        };

        self.last = Some(now);

        let ft = FrameTime {
            dt,
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
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
    fn first_tick_reports_nominal_frame() {
        let mut clock = FrameClock::new();
        let ft = clock.tick();
        assert_eq!(ft.dt, FIRST_FRAME_DT);
        assert_eq!(ft.frame_index, 0);
    }

    #[test]
    fn subsequent_ticks_measure_elapsed_time() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_millis(20));
        assert!((ft.dt - 0.020).abs() < 1e-6);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reset_restarts_from_nominal_dt() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.reset();
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(40)).dt, FIRST_FRAME_DT);
    }
}
