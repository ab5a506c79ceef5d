// extensions/tween.rs
//
// Single-value tween used for reel deceleration.
// Decoupled from Reel internals: it only knows a start, an end, a duration and a curve.
//
// Usage:
//   let mut tween = PositionTween::new(current_y, target_y, 800.0, Easing::CubicOut);
//   let y = tween.tick(dt_ms);   // eased position
//   if tween.is_complete() { /* y == target_y exactly */ }

use super::easing::{ease, Easing};

/// An eased transition of one coordinate, timed in milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionTween {
    from: f64,
    to: f64,
    /// Duration in milliseconds.
    duration_ms: f64,
    /// Elapsed time in milliseconds.
    elapsed_ms: f64,
    easing: Easing,
}

impl PositionTween {
    pub fn new(from: f64, to: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
        }
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Current value. Once complete this is exactly `to`, never the eased
    /// approximation, so repeated stops cannot accumulate drift.
    pub fn value(&self) -> f64 {
        if self.is_complete() {
            self.to
        } else {
            ease(self.from, self.to, self.progress(), self.easing)
        }
    }

    /// Advance by `dt_ms` and return the new value.
    pub fn tick(&mut self, dt_ms: f64) -> f64 {
        self.elapsed_ms += dt_ms.max(0.0);
        self.value()
    }
}
