// extensions/mod.rs
//
// Animation math shared by the reels.
// Decoupled from Reel/SlotMachine: pure functions and a value tween.

pub mod easing;
pub mod tween;

pub use easing::{Easing, lerp, ease};
pub use tween::PositionTween;
