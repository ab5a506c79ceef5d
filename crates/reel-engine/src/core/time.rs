/// Duration of one display frame at 60 Hz, in milliseconds.
/// Reel speeds are expressed in pixels per frame of this length.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Fixed timestep accumulator, in milliseconds.
/// Feeds the machine at a consistent rate regardless of the host's frame time.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// The fixed delta time per step.
    dt_ms: f64,
    /// Accumulated time from variable frame deltas.
    accumulator_ms: f64,
    /// Upper bound on steps produced by a single frame.
    max_steps: u32,
}

impl FixedTimestep {
    pub fn new(dt_ms: f64) -> Self {
        Self {
            dt_ms,
            accumulator_ms: 0.0,
            max_steps: 10,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt_ms: f64) -> u32 {
        self.accumulator_ms += frame_dt_ms.max(0.0);
        // A backgrounded tab can hand us seconds at once; never replay more than max_steps.
        self.accumulator_ms = self.accumulator_ms.min(self.dt_ms * self.max_steps as f64);
        let steps = (self.accumulator_ms / self.dt_ms) as u32;
        self.accumulator_ms -= steps as f64 * self.dt_ms;
        steps
    }

    /// The fixed delta time in milliseconds.
    pub fn dt_ms(&self) -> f64 {
        self.dt_ms
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(FRAME_MS)
    }
}
