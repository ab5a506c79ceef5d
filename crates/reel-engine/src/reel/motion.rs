// reel/motion.rs
//
// Per-reel animation state: spin-up ramp, cruise, and targeted deceleration.
// The reel owns one unbounded virtual position; everything the renderer sees
// is that position folded into [-total_height, 0).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::TimingConfig;
use crate::core::time::FRAME_MS;
use crate::extensions::{Easing, PositionTween};

use super::target::{normalize_offset, Resolution, Row, StopTarget};

/// Direction the virtual position travels while spinning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Position decreases.
    #[default]
    Normal,
    /// Position increases.
    Reverse,
}

impl Rotation {
    pub fn from_reverse_flag(reverse: bool) -> Self {
        if reverse { Rotation::Reverse } else { Rotation::Normal }
    }

    /// +1.0 when the position increases, -1.0 when it decreases.
    pub fn sign(self) -> f64 {
        match self {
            Rotation::Normal => -1.0,
            Rotation::Reverse => 1.0,
        }
    }
}

/// Observable phase of a reel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReelPhase {
    Idle,
    Accelerating,
    Cruising,
    Decelerating,
}

#[derive(Debug, Clone)]
enum Motion {
    Idle,
    Spinning { elapsed_ms: f64 },
    Decelerating { tween: PositionTween, resolution: Resolution },
}

/// One independently animated column of symbols.
#[derive(Debug, Clone)]
pub struct Reel {
    strip: Arc<[String]>,
    symbol_height: f64,
    total_height: f64,
    position: f64,
    rotation: Rotation,
    timing: TimingConfig,
    motion: Motion,
    last_stop: Option<Resolution>,
}

impl Reel {
    /// Create a reel resting with strip index 0 on the top row.
    pub fn new(strip: Arc<[String]>, symbol_height: f64, rotation: Rotation, timing: TimingConfig) -> Self {
        let total_height = strip.len() as f64 * symbol_height;
        Self {
            strip,
            symbol_height,
            total_height,
            position: 0.0,
            rotation,
            timing,
            motion: Motion::Idle,
            last_stop: None,
        }
    }

    /// Rest the reel with `index` on the top row. Out-of-range indices log and
    /// fall back to index 0.
    pub fn place_at_index(&mut self, index: usize) {
        let index = if index < self.strip.len() {
            index
        } else {
            log::warn!(
                "initial index {index} out of range for a {}-symbol reel, using 0",
                self.strip.len()
            );
            0
        };
        self.position = -(index as f64) * self.symbol_height;
    }

    /// Overwrite the virtual position. Only meaningful while idle.
    pub fn set_position(&mut self, position: f64) {
        self.position = position;
    }

    pub fn strip(&self) -> &[String] {
        &self.strip
    }

    pub fn symbol_count(&self) -> usize {
        self.strip.len()
    }

    pub fn symbol_height(&self) -> f64 {
        self.symbol_height
    }

    /// Height of one full strip cycle (`symbol_count * symbol_height`).
    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    /// Unbounded virtual position.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        !matches!(self.motion, Motion::Idle)
    }

    pub fn phase(&self) -> ReelPhase {
        match &self.motion {
            Motion::Idle => ReelPhase::Idle,
            Motion::Spinning { elapsed_ms } if *elapsed_ms < self.timing.acceleration_ms => {
                ReelPhase::Accelerating
            }
            Motion::Spinning { .. } => ReelPhase::Cruising,
            Motion::Decelerating { .. } => ReelPhase::Decelerating,
        }
    }

    /// Resolution of the stop in progress, or of the last completed stop.
    pub fn stop_resolution(&self) -> Option<&Resolution> {
        match &self.motion {
            Motion::Decelerating { resolution, .. } => Some(resolution),
            _ => self.last_stop.as_ref(),
        }
    }

    /// Offset to paint this tick, always in [-total_height, 0).
    pub fn visible_offset(&self) -> f64 {
        normalize_offset(self.position, self.total_height)
    }

    /// Strip index currently nearest the top edge.
    pub fn top_index(&self) -> usize {
        let steps = (-self.position / self.symbol_height).round() as i64;
        steps.rem_euclid(self.strip.len() as i64) as usize
    }

    /// Symbols on the top, middle and bottom rows.
    pub fn visible_symbols(&self) -> [String; 3] {
        let top = self.top_index();
        let count = self.strip.len();
        Row::ALL.map(|row| self.strip[(top + row.offset()) % count].clone())
    }

    /// Speed in pixels per 60 Hz frame. Follows a cubic ramp during
    /// acceleration, then holds at the cruise speed.
    pub fn current_speed(&self) -> f64 {
        match &self.motion {
            Motion::Spinning { elapsed_ms } => self.speed_at(*elapsed_ms),
            _ => 0.0,
        }
    }

    fn speed_at(&self, elapsed_ms: f64) -> f64 {
        let progress = if self.timing.acceleration_ms > 0.0 {
            elapsed_ms / self.timing.acceleration_ms
        } else {
            1.0
        };
        if progress >= 1.0 {
            self.timing.spin_speed
        } else {
            self.timing.spin_speed * Easing::CubicIn.apply(progress)
        }
    }

    /// Begin spinning. Returns false if the reel is already moving.
    pub fn start_spin(&mut self) -> bool {
        if self.is_spinning() {
            return false;
        }
        self.last_stop = None;
        self.motion = Motion::Spinning { elapsed_ms: 0.0 };
        true
    }

    /// Deceleration time for a trip of `distance` pixels starting at `speed`
    /// pixels per frame, clamped to the configured bounds and raised to
    /// `floor_ms` when given.
    pub fn stop_duration(&self, distance: f64, speed: f64, floor_ms: Option<f64>) -> f64 {
        let speed = if speed > 0.0 { speed } else { self.timing.spin_speed };
        let raw = distance / speed * FRAME_MS * self.timing.stop_easing.derivative_at_zero();
        let raw = if raw.is_finite() { raw } else { self.timing.max_stop_ms };
        let clamped = raw.max(self.timing.min_stop_ms).min(self.timing.max_stop_ms);
        match floor_ms {
            Some(floor) => clamped.max(floor),
            None => clamped,
        }
    }

    /// Switch a spinning reel into deceleration towards `target`.
    ///
    /// Returns `None` and changes nothing if the reel is idle or already
    /// stopping. `floor_ms` is the automatic-mode minimum deceleration time.
    pub fn request_stop(&mut self, target: Option<&StopTarget>, floor_ms: Option<f64>) -> Option<Resolution> {
        if !matches!(self.motion, Motion::Spinning { .. }) {
            return None;
        }
        // Speed and position are read under the spin formula before the phase changes.
        let speed = self.current_speed();
        let resolution = self.resolve_target(target);
        let duration = self.stop_duration(resolution.distance, speed, floor_ms);
        log::debug!(
            "stop: y={:.1} -> {:.1} (top {}, row {:?}, {:.0} ms{})",
            self.position,
            resolution.target_y,
            resolution.top_index,
            resolution.row,
            duration,
            if resolution.fallback { ", fallback" } else { "" }
        );
        let tween = PositionTween::new(self.position, resolution.target_y, duration, self.timing.stop_easing);
        self.motion = Motion::Decelerating { tween, resolution: resolution.clone() };
        Some(resolution)
    }

    /// Advance the animation by `dt_ms`. Returns true on the tick the reel comes to rest.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        let dt_ms = dt_ms.max(0.0);
        match &mut self.motion {
            Motion::Idle => false,
            Motion::Spinning { elapsed_ms } => {
                *elapsed_ms += dt_ms;
                let elapsed = *elapsed_ms;
                let step = self.speed_at(elapsed) * (dt_ms / FRAME_MS);
                self.position += self.rotation.sign() * step;
                false
            }
            Motion::Decelerating { tween, .. } => {
                self.position = tween.tick(dt_ms);
                if !tween.is_complete() {
                    return false;
                }
                if let Motion::Decelerating { resolution, .. } =
                    std::mem::replace(&mut self.motion, Motion::Idle)
                {
                    self.position = resolution.target_y;
                    self.last_stop = Some(resolution);
                }
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> TimingConfig {
        TimingConfig {
            spin_speed: 20.0,
            acceleration_ms: 300.0,
            min_stop_ms: 100.0,
            max_stop_ms: 2000.0,
            base_deceleration_ms: 500.0,
            stop_easing: Easing::CubicOut,
        }
    }

    fn reel(len: usize, rotation: Rotation) -> Reel {
        let strip: Arc<[String]> = (0..len).map(|i| format!("s{i}")).collect::<Vec<_>>().into();
        Reel::new(strip, 80.0, rotation, timing())
    }

    fn run_until_idle(reel: &mut Reel) -> usize {
        let mut frames = 0;
        while reel.is_spinning() {
            reel.advance(FRAME_MS);
            frames += 1;
            assert!(frames < 10_000, "reel never settled");
        }
        frames
    }

    #[test]
    fn accelerates_then_cruises() {
        let mut reel = reel(12, Rotation::Reverse);
        assert!(reel.start_spin());
        reel.advance(150.0);
        assert_eq!(reel.phase(), ReelPhase::Accelerating);
        // halfway through the ramp: 20 * 0.5^3
        assert!((reel.current_speed() - 2.5).abs() < 1e-9);
        reel.advance(200.0);
        assert_eq!(reel.phase(), ReelPhase::Cruising);
        assert_eq!(reel.current_speed(), 20.0);
    }

    #[test]
    fn position_is_monotonic_while_spinning() {
        for rotation in [Rotation::Normal, Rotation::Reverse] {
            let mut reel = reel(12, rotation);
            reel.start_spin();
            let mut last = reel.position();
            for _ in 0..120 {
                reel.advance(FRAME_MS);
                let delta = (reel.position() - last) * rotation.sign();
                assert!(delta >= 0.0);
                last = reel.position();
            }
            reel.request_stop(Some(&StopTarget::index(0, 7, Some(Row::Middle))), None);
            while reel.is_spinning() {
                reel.advance(FRAME_MS);
                let delta = (reel.position() - last) * rotation.sign();
                assert!(delta >= -1e-9, "moved backwards during deceleration");
                last = reel.position();
            }
        }
    }

    #[test]
    fn lands_exactly_on_target() {
        let mut reel = reel(21, Rotation::Reverse);
        reel.start_spin();
        for _ in 0..50 {
            reel.advance(FRAME_MS);
        }
        let r = reel
            .request_stop(Some(&StopTarget::index(0, 19, Some(Row::Bottom))), None)
            .unwrap();
        run_until_idle(&mut reel);
        assert_eq!(reel.position(), r.target_y);
        assert_eq!(reel.top_index(), 17);
        assert!((reel.visible_offset() - -17.0 * 80.0).abs() < 1e-9);
        assert_eq!(reel.visible_symbols(), ["s17".to_string(), "s18".into(), "s19".into()]);
    }

    #[test]
    fn visible_offset_always_in_range() {
        let mut reel = reel(12, Rotation::Normal);
        reel.start_spin();
        for i in 0..600 {
            reel.advance(FRAME_MS * 1.3);
            if i == 400 {
                reel.request_stop(None, None);
            }
            let offset = reel.visible_offset();
            assert!((-reel.total_height()..0.0).contains(&offset), "offset {offset}");
        }
        assert!(!reel.is_spinning());
    }

    #[test]
    fn stop_ignored_when_idle_or_stopping() {
        let mut reel = reel(12, Rotation::Reverse);
        assert!(reel.request_stop(None, None).is_none());
        reel.start_spin();
        reel.advance(400.0);
        let first = reel.request_stop(Some(&StopTarget::index(0, 3, None)), None);
        assert!(first.is_some());
        let second = reel.request_stop(Some(&StopTarget::index(0, 9, None)), None);
        assert!(second.is_none());
        assert_eq!(reel.stop_resolution(), first.as_ref());
    }

    #[test]
    fn start_spin_rejected_while_moving() {
        let mut reel = reel(12, Rotation::Reverse);
        assert!(reel.start_spin());
        assert!(!reel.start_spin());
    }

    #[test]
    fn stop_duration_formula_and_clamps() {
        let reel = reel(12, Rotation::Reverse);
        // 200px at 20px/frame = 10 frames, cubic-out slope 3 -> 500 ms
        let d = reel.stop_duration(200.0, 20.0, None);
        assert!((d - 10.0 * FRAME_MS * 3.0).abs() < 1e-9);
        assert_eq!(reel.stop_duration(0.0, 20.0, None), 100.0);
        assert_eq!(reel.stop_duration(1.0e6, 20.0, None), 2000.0);
        assert_eq!(reel.stop_duration(0.0, 20.0, Some(500.0)), 500.0);
        // zero speed falls back to cruise speed rather than dividing by zero
        assert!((reel.stop_duration(200.0, 0.0, None) - d).abs() < 1e-9);
    }

    #[test]
    fn place_at_index_out_of_range_uses_zero() {
        let mut reel = reel(12, Rotation::Reverse);
        reel.place_at_index(4);
        assert_eq!(reel.top_index(), 4);
        reel.place_at_index(40);
        assert_eq!(reel.position(), 0.0);
    }

    #[test]
    fn stop_during_acceleration_still_lands() {
        let mut reel = reel(12, Rotation::Normal);
        reel.start_spin();
        reel.advance(FRAME_MS);
        let r = reel
            .request_stop(Some(&StopTarget::symbol(0, "s6", Some(Row::Top))), None)
            .unwrap();
        run_until_idle(&mut reel);
        assert_eq!(reel.position(), r.target_y);
        assert_eq!(reel.visible_symbols()[0], "s6");
    }
}
