use std::time::Instant;

/// Timing for a single frame, handed to [crate::CoreGlut::display].
#[derive(Debug, Clone, Copy)]
pub struct FrameTime {
    /// Seconds since the previous tick.
    pub dt: f32,
}

/// Per-loop clock. The event loop owns one and ticks it once per frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        FrameTime { dt }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
