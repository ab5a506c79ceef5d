// reel/mod.rs
//
// Reel motion model: continuous position, wrap-around display, and
// forward-only stop targeting.

pub mod motion;
pub mod target;

pub use motion::{Reel, ReelPhase, Rotation};
pub use target::{normalize_offset, Resolution, Row, StopTarget, TargetKind};
