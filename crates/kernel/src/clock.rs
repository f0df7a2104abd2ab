use std::time::Instant;

/// Turns display-refresh timestamps into frame deltas.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick; zero on the first tick, when no
    /// interval is known yet. A timestamp earlier than the previous one
    /// also yields zero.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        dt
    }

    pub fn last_tick(&self) -> Option<Instant> {
        self.last
    }
}
