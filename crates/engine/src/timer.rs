/// Accumulated-time countdown. All waiting in the simulation is a timer that
/// is not yet done, checked on the next tick; nothing blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    elapsed: f32,
    duration: f32,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self::starting_at(duration, 0.0)
    }

    pub fn starting_at(duration: f32, start_at: f32) -> Self {
        Self {
            elapsed: start_at,
            duration,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Time by which the timer has overrun its duration. Carried into the
    /// next timer cycle to avoid frame-rate-dependent drift.
    pub fn excess(&self) -> f32 {
        self.elapsed - self.duration
    }

    /// Fraction complete, unclamped: may exceed 1.0 once the timer is done.
    /// Undefined for a zero-duration timer; callers interpolating with this
    /// value must clamp it and must not construct zero-duration timers they
    /// intend to query.
    pub fn percent_done(&self) -> f32 {
        self.elapsed / self.duration
    }

    /// Zeroes elapsed time, keeping the current duration.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Installs a new duration and starts from `start_at` (typically a
    /// carried [`Timer::excess`]).
    pub fn reset_carrying(&mut self, duration: f32, start_at: f32) {
        self.elapsed = start_at;
        self.duration = duration;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}
